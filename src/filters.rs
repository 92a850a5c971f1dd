//! Record-level gates applied after deduplication: keyword presence and the
//! optional inclusive date window.

use crate::config::DateRange;
use crate::keywords::KeywordSet;
use time::PrimitiveDateTime;

/// Why a record that got past dedup was not retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NoKeyword,
    OutOfRange,
}

pub fn matches_keywords(text: &str, keywords: &KeywordSet) -> bool {
    keywords.matches(text)
}

/// `None` means the gate is disabled and every timestamp passes.
pub fn within_range(created: PrimitiveDateTime, range: Option<&DateRange>) -> bool {
    range.map_or(true, |r| r.contains(created))
}

/// Keyword check first, then the date window.
pub fn check_record(
    text: &str,
    created: PrimitiveDateTime,
    keywords: &KeywordSet,
    range: Option<&DateRange>,
) -> Result<(), Rejection> {
    if !matches_keywords(text, keywords) {
        return Err(Rejection::NoKeyword);
    }
    if !within_range(created, range) {
        return Err(Rejection::OutOfRange);
    }
    Ok(())
}
