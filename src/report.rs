//! Monthly count table: accumulation during the pass, the `Month\tCount` report
//! file, and the console echo.

use crate::date::YearMonth;
use crate::tsv::TsvWriter;
use anyhow::Result;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

pub const REPORT_HEADER: [&str; 2] = ["Month", "Count"];

/// Retained-record counts keyed by calendar month; iteration is always ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthlyCounts {
    counts: BTreeMap<YearMonth, u64>,
}

impl MonthlyCounts {
    pub fn increment(&mut self, ym: YearMonth) {
        *self.counts.entry(ym).or_insert(0) += 1;
    }

    pub fn get(&self, ym: YearMonth) -> Option<u64> {
        self.counts.get(&ym).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize { self.counts.len() }
    pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Overwrite `path` with the header and one `YYYY-MM\tN` line per month.
    pub fn write_tsv(&self, path: &Path, buf_bytes: usize) -> Result<()> {
        let mut w = TsvWriter::create(path, buf_bytes)?;
        w.write_fields(&REPORT_HEADER)?;
        for (ym, n) in self.iter() {
            w.write_fields(&[ym.to_string(), n.to_string()])?;
        }
        w.finish()
    }

    /// Human-readable echo: a blank line, a title, then `YYYY-MM  N` per month.
    pub fn write_console<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Monthly record counts:")?;
        for (ym, n) in self.iter() {
            writeln!(out, "{ym}  {n}")?;
        }
        Ok(())
    }
}
