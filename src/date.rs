//! Calendar helpers: the `YYYY-MM` bucket key, epoch → local-calendar conversion
//! under an explicit UTC offset, and the ISO-8601 formats used in the extract.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;
use time::format_description::FormatItem;
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// `YYYY-MM-DDTHH:MM:SS`, no offset suffix.
const ISO_LOCAL: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const OFFSET_HM: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");
const OFFSET_H: &[FormatItem<'static>] = format_description!("[offset_hour sign:mandatory]");

/// Simple "YYYY-MM" key with chronological ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u8, // 1..=12
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Self {
        assert!((1..=12).contains(&month), "Month must be 1..=12");
        Self { year, month }
    }

    /// Calendar month of a local timestamp.
    pub fn of(dt: PrimitiveDateTime) -> Self {
        Self { year: dt.year(), month: dt.month() as u8 }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s.split_once('-').ok_or("expected YYYY-MM")?;
        let year: i32 = y.parse().map_err(|_| "invalid year")?;
        let month: u8 = m.parse().map_err(|_| "invalid month")?;
        if !(1..=12).contains(&month) {
            return Err("month must be 01..12".into());
        }
        Ok(Self { year, month })
    }
}

/// Convert UNIX seconds into the wall-clock time observed at `offset`.
/// Returns `None` when the instant falls outside the supported calendar range.
pub fn local_from_epoch(ts: i64, offset: UtcOffset) -> Option<PrimitiveDateTime> {
    // Shift first, then read the UTC calendar: avoids the panicking `to_offset`
    // path at the edges of the range.
    let shifted = ts.checked_add(i64::from(offset.whole_seconds()))?;
    let dt = OffsetDateTime::from_unix_timestamp(shifted).ok()?;
    Some(PrimitiveDateTime::new(dt.date(), dt.time()))
}

/// ISO-8601 local timestamp, second resolution.
pub fn iso_local(dt: PrimitiveDateTime) -> Result<String, time::error::Format> {
    dt.format(ISO_LOCAL)
}

/// Parse a range bound: `YYYY-MM-DDTHH:MM:SS`, or a bare `YYYY-MM-DD` which
/// expands to the first second of the day (`end_of_day == false`) or the last.
pub fn parse_bound(s: &str, end_of_day: bool) -> Result<PrimitiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = PrimitiveDateTime::parse(s, ISO_LOCAL) {
        return Ok(dt);
    }
    let date = Date::parse(s, ISO_DATE)
        .map_err(|e| anyhow!("invalid date bound {s:?} (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS): {e}"))?;
    Ok(if end_of_day { date.with_time(time!(23:59:59)) } else { date.midnight() })
}

/// Parse `UTC`, `Z`, `+HH:MM` or `+HH` into a fixed offset.
pub fn parse_utc_offset(s: &str) -> Result<UtcOffset> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(s, OFFSET_HM)
        .or_else(|_| UtcOffset::parse(s, OFFSET_H))
        .map_err(|e| anyhow!("invalid UTC offset {s:?} (expected UTC, +HH:MM or -HH:MM): {e}"))
}
