use crate::date::{parse_bound, parse_utc_offset};
use crate::keywords::{KeywordSet, Preset};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use time::macros::datetime;
use time::{PrimitiveDateTime, UtcOffset};

/// Inclusive local-time window used by the date gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

impl DateRange {
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Result<Self> {
        if start > end {
            bail!("date range start {start} is after end {end}");
        }
        Ok(Self { start, end })
    }

    /// Parse bounds as accepted by [`parse_bound`]: a bare end date covers its whole day.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_bound(start, false)?, parse_bound(end, true)?)
    }

    #[inline]
    pub fn contains(&self, dt: PrimitiveDateTime) -> bool {
        self.start <= dt && dt <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: datetime!(2012-01-01 0:00:00),
            end: datetime!(2022-12-31 23:59:59),
        }
    }
}

/// One run's configuration. Built once, then handed to the driver by value;
/// nothing downstream mutates it.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub input: PathBuf,          // NDJSON, or zstd-compressed NDJSON when it ends in `.zst`
    pub table_out: PathBuf,      // retained-records TSV (overwritten)
    pub report_out: PathBuf,     // monthly counts TSV (overwritten)
    pub keywords: KeywordSet,
    pub date_range: DateRange,   // inclusive on both ends
    pub date_filter: bool,       // apply `date_range`; default true
    pub utc_offset: UtcOffset,   // wall-clock offset for timestamps and month buckets
    pub progress: bool,          // byte progress bar on stderr; off unless asked for
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        let data = PathBuf::from("./data");
        Self {
            input: data.join("json").join("comments.json"),
            table_out: data.join("tsv").join("comments.tsv"),
            report_out: data.join("monthly_count").join("comments_count.txt"),
            keywords: KeywordSet::default(),
            date_range: DateRange::default(),
            date_filter: true,
            utc_offset: UtcOffset::UTC,
            progress: false,
            progress_label: None,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl ExtractOptions {
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }
    pub fn with_table_out(mut self, path: impl AsRef<Path>) -> Self {
        self.table_out = path.as_ref().to_path_buf();
        self
    }
    pub fn with_report_out(mut self, path: impl AsRef<Path>) -> Self {
        self.report_out = path.as_ref().to_path_buf();
        self
    }
    /// Replace the keyword list.
    pub fn with_keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = KeywordSet::new(words);
        self
    }
    /// Append a preset's keywords after the ones already configured.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.keywords.extend(preset.words());
        self
    }
    pub fn with_keyword_set(mut self, set: KeywordSet) -> Self {
        self.keywords = set;
        self
    }
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }
    pub fn with_date_filter(mut self, yes: bool) -> Self {
        self.date_filter = yes;
        self
    }
    pub fn with_utc_offset(mut self, offset: UtcOffset) -> Self {
        self.utc_offset = offset;
        self
    }
    /// Same as [`with_utc_offset`](Self::with_utc_offset) from `UTC`, `+HH:MM` or `-HH:MM`.
    pub fn with_utc_offset_str(self, s: &str) -> Result<Self> {
        Ok(self.with_utc_offset(parse_utc_offset(s)?))
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffers tuning
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }

    /// The date window to enforce, or `None` when the gate is switched off.
    pub fn active_range(&self) -> Option<&DateRange> {
        self.date_filter.then_some(&self.date_range)
    }
}
