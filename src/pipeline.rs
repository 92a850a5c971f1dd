use crate::config::{DateRange, ExtractOptions};
use crate::date::{iso_local, YearMonth};
use crate::filters::{check_record, Rejection};
use crate::keywords::{KeywordSet, Preset};
use crate::ndjson::NdjsonReader;
use crate::normalize::normalize_text;
use crate::progress::ProgressScope;
use crate::record::{Comment, RecordError};
use crate::report::MonthlyCounts;
use crate::tsv::{write_table, OutputRow};
use crate::util::init_tracing_once;
use ahash::AHashSet;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use time::UtcOffset;

/// Builder facade over [`ExtractOptions`] and the entry point of a run.
#[derive(Clone)]
pub struct Extractor {
    pub(crate) opts: ExtractOptions,
}

impl Default for Extractor {
    fn default() -> Self { Self::new() }
}

/// What happened to one input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineOutcome {
    ParseFailed,
    ValueFailed,
    Duplicate,
    NoKeyword,
    OutOfRange,
    Emitted,
}

/// Counters for one run plus the monthly table that was written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub lines_read: u64,
    /// Lines that do not decode to a JSON object, blank lines included.
    pub parse_errors: u64,
    pub value_errors: u64,
    pub duplicates: u64,
    pub keyword_misses: u64,
    pub out_of_range: u64,
    pub retained: u64,
    pub monthly: MonthlyCounts,
}

impl ExtractSummary {
    fn record(&mut self, outcome: LineOutcome) {
        self.lines_read += 1;
        match outcome {
            LineOutcome::ParseFailed => self.parse_errors += 1,
            LineOutcome::ValueFailed => self.value_errors += 1,
            LineOutcome::Duplicate => self.duplicates += 1,
            LineOutcome::NoKeyword => self.keyword_misses += 1,
            LineOutcome::OutOfRange => self.out_of_range += 1,
            LineOutcome::Emitted => self.retained += 1,
        }
    }

    /// Console echo: the monthly counts followed by the retained total.
    pub fn write_console<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.monthly.write_console(out)?;
        writeln!(out, "Number of filtered records: {}", self.retained)
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self { opts: ExtractOptions::default() }
    }
    pub fn from_options(opts: ExtractOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn input(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input(path); self }
    pub fn table_output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_table_out(path); self }
    pub fn report_output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_report_out(path); self }
    pub fn keywords<I, S>(mut self, words: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> { self.opts = self.opts.with_keywords(words); self }
    pub fn keyword_set(mut self, set: KeywordSet) -> Self { self.opts = self.opts.with_keyword_set(set); self }
    pub fn preset(mut self, preset: Preset) -> Self { self.opts = self.opts.with_preset(preset); self }
    pub fn date_range(mut self, range: DateRange) -> Self { self.opts = self.opts.with_date_range(range); self }
    pub fn date_filter(mut self, yes: bool) -> Self { self.opts = self.opts.with_date_filter(yes); self }
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self { self.opts = self.opts.with_utc_offset(offset); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn options(&self) -> &ExtractOptions { &self.opts }

    /// Stream the input, filter it, then overwrite the table and the report.
    /// Row-level problems are logged and skipped; only I/O failures end the run.
    pub fn run(self) -> Result<ExtractSummary> {
        init_tracing_once();
        let opts = &self.opts;
        tracing::debug!(
            input = %opts.input.display(),
            keywords = opts.keywords.len(),
            date_filter = opts.date_filter,
            start = %opts.date_range.start,
            end = %opts.date_range.end,
            utc_offset = %opts.utc_offset,
            "starting extract"
        );
        if opts.keywords.is_empty() {
            tracing::warn!("No keywords configured; no records will be retained.");
        }

        let (rows, summary) = collect_rows(opts)?;

        write_table(&opts.table_out, &rows, opts.write_buffer_bytes)
            .with_context(|| format!("writing table {}", opts.table_out.display()))?;
        summary.monthly.write_tsv(&opts.report_out, opts.write_buffer_bytes)
            .with_context(|| format!("writing report {}", opts.report_out.display()))?;

        tracing::info!(
            lines = summary.lines_read,
            retained = summary.retained,
            duplicates = summary.duplicates,
            keyword_misses = summary.keyword_misses,
            out_of_range = summary.out_of_range,
            parse_errors = summary.parse_errors,
            value_errors = summary.value_errors,
            "extract finished"
        );
        Ok(summary)
    }
}

/// Per-run state carried across lines.
struct RunState<'a> {
    opts: &'a ExtractOptions,
    range: Option<&'a DateRange>,
    seen: AHashSet<String>,
    rows: Vec<OutputRow>,
    summary: ExtractSummary,
}

impl<'a> RunState<'a> {
    fn new(opts: &'a ExtractOptions) -> Self {
        Self {
            opts,
            range: opts.active_range(),
            seen: AHashSet::with_capacity(64_000),
            rows: Vec::new(),
            summary: ExtractSummary::default(),
        }
    }

    fn process_line(&mut self, line: &[u8], line_no: u64) -> LineOutcome {
        let comment = match Comment::from_line(line, self.opts.utc_offset) {
            Ok(c) => c,
            Err(e @ RecordError::Parse(_)) => {
                tracing::warn!(line = line_no, error = %e, "skipping line");
                return LineOutcome::ParseFailed;
            }
            Err(e @ RecordError::Field { .. }) => {
                tracing::warn!(line = line_no, error = %e, "skipping line");
                return LineOutcome::ValueFailed;
            }
        };

        let body = normalize_text(&comment.body);
        if self.seen.contains(&body) {
            return LineOutcome::Duplicate;
        }
        // Marked seen before filtering: a non-matching body still blocks its later copies.
        self.seen.insert(body.clone());

        match check_record(&body, comment.created, &self.opts.keywords, self.range) {
            Err(Rejection::NoKeyword) => return LineOutcome::NoKeyword,
            Err(Rejection::OutOfRange) => return LineOutcome::OutOfRange,
            Ok(()) => {}
        }

        let created_date = match iso_local(comment.created) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping line: cannot format created_utc");
                return LineOutcome::ValueFailed;
            }
        };
        let month = YearMonth::of(comment.created);
        self.summary.monthly.increment(month);
        self.rows.push(OutputRow {
            created_date,
            month,
            subreddit_id: comment.subreddit_id,
            id: comment.id,
            author: comment.author,
            parent_id: comment.parent_id,
            body,
            score: comment.score,
        });
        LineOutcome::Emitted
    }
}

/// Reading phase: returns the retained rows in input order plus the counters.
/// The input handle is closed before this returns.
fn collect_rows(opts: &ExtractOptions) -> Result<(Vec<OutputRow>, ExtractSummary)> {
    let mut rdr = NdjsonReader::open(&opts.input, opts.read_buffer_bytes)?;
    let pb = ProgressScope::for_file(&opts.input, opts.progress_label.as_deref(), opts.progress);
    let mut state = RunState::new(opts);

    let mut buf = Vec::with_capacity(16 * 1024);
    loop {
        let n = rdr.read_line(&mut buf)
            .with_context(|| format!("reading {}", opts.input.display()))?;
        if n == 0 {
            break;
        }
        let outcome = state.process_line(&buf, rdr.line_number());
        state.summary.record(outcome);
        pb.set_position(rdr.bytes_consumed());
    }
    pb.finish("done");

    Ok((state.rows, state.summary))
}
