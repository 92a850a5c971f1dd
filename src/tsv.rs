use crate::date::YearMonth;
use crate::record::clean_column;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column order of the retained-records table.
pub const TABLE_HEADER: [&str; 7] = ["created_date", "subreddit_id", "id", "author", "parent_id", "body", "score"];

/// One retained record, ready to print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    pub created_date: String, // YYYY-MM-DDTHH:MM:SS, local to the configured offset
    pub month: YearMonth,
    pub subreddit_id: String,
    pub id: String,
    pub author: String,
    pub parent_id: String,
    pub body: String,         // normalized
    pub score: i64,
}

/// Buffered tab-separated writer. The file is created (truncated) on `create`,
/// and closed when the writer is dropped, including on an early `?` return.
pub struct TsvWriter {
    path: PathBuf,
    w: BufWriter<File>,
}

impl TsvWriter {
    pub fn create(path: &Path, buf_bytes: usize) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
        }
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), f) })
    }

    /// Write `fields` joined by tabs plus a newline. Callers pass fields that are
    /// already free of tabs and line breaks.
    pub fn write_fields<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        for (i, f) in fields.iter().enumerate() {
            if i > 0 {
                self.w.write_all(b"\t")
                    .with_context(|| format!("write {}", self.path.display()))?;
            }
            self.w.write_all(f.as_ref().as_bytes())
                .with_context(|| format!("write {}", self.path.display()))?;
        }
        self.w.write_all(b"\n").with_context(|| format!("write {}", self.path.display()))
    }

    pub fn finish(mut self) -> Result<()> {
        self.w.flush().with_context(|| format!("flush {}", self.path.display()))
    }
}

impl OutputRow {
    /// The seven columns in header order, metadata fields made tab-safe.
    pub fn columns(&self) -> [String; 7] {
        [
            self.created_date.clone(),
            clean_column(&self.subreddit_id).into_owned(),
            clean_column(&self.id).into_owned(),
            clean_column(&self.author).into_owned(),
            clean_column(&self.parent_id).into_owned(),
            self.body.clone(),
            self.score.to_string(),
        ]
    }
}

/// Overwrite `path` with the header followed by `rows` in order.
pub fn write_table(path: &Path, rows: &[OutputRow], buf_bytes: usize) -> Result<()> {
    let mut w = TsvWriter::create(path, buf_bytes)?;
    w.write_fields(&TABLE_HEADER)?;
    for row in rows {
        w.write_fields(&row.columns())?;
    }
    w.finish()
}
