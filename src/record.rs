//! Field extraction for one comment line. Only the fields the extract needs are
//! read; unknown fields are ignored and missing ones take their defaults.

use crate::date::local_from_epoch;
use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;
use time::{PrimitiveDateTime, UtcOffset};

/// Row-level failures. Both kinds skip the line; neither aborts the run.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line is not a JSON object.
    #[error("JSON decode error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field is present but cannot be converted to its expected type.
    #[error("Value error: `{field}`: {reason}")]
    Field { field: &'static str, reason: String },
}

impl RecordError {
    fn field(field: &'static str, reason: impl Into<String>) -> Self {
        RecordError::Field { field, reason: reason.into() }
    }
}

/// A decoded comment with defaults applied. `body` is still the raw text;
/// normalization happens in the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub created: PrimitiveDateTime,
    pub subreddit_id: String,
    pub id: String,
    pub author: String,
    pub parent_id: String,
    pub body: String,
    pub score: i64,
}

impl Comment {
    /// Decode one line (without its terminator) and convert `created_utc` to
    /// wall-clock time at `offset`.
    pub fn from_line(line: &[u8], offset: UtcOffset) -> Result<Self, RecordError> {
        let map: Map<String, Value> = serde_json::from_slice(line)?;
        Self::from_map(&map, offset)
    }

    pub fn from_map(map: &Map<String, Value>, offset: UtcOffset) -> Result<Self, RecordError> {
        let ts = integer_like("created_utc", map.get("created_utc"), 0)?;
        let created = local_from_epoch(ts, offset)
            .ok_or_else(|| RecordError::field("created_utc", format!("timestamp {ts} out of range")))?;

        Ok(Self {
            created,
            subreddit_id: text_field("subreddit_id", map.get("subreddit_id"))?,
            id: text_field("id", map.get("id"))?,
            author: text_field("author", map.get("author"))?,
            parent_id: text_field("parent_id", map.get("parent_id"))?,
            body: body_field(map.get("body"))?,
            score: score_field(map.get("score")),
        })
    }
}

/// Accepts integers, floats (truncated toward zero) and decimal-integer strings.
/// Only an absent field yields `default`; an explicit `null` is a value error.
pub fn integer_like(field: &'static str, v: Option<&Value>, default: i64) -> Result<i64, RecordError> {
    match v {
        None => Ok(default),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(RecordError::field(field, format!("{n} does not fit in i64")))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.is_finite() && f.trunc() >= i64::MIN as f64 && f.trunc() < i64::MAX as f64 {
                    Ok(f.trunc() as i64)
                } else {
                    Err(RecordError::field(field, format!("{n} is not a representable integer")))
                }
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| RecordError::field(field, format!("invalid literal for integer: {s:?}"))),
        Some(other) => Err(RecordError::field(field, format!("expected integer, got {}", kind_of(other)))),
    }
}

/// `score` is carried through, never checked: absent, `null` and unconvertible
/// values all become 0 and the record is kept.
pub fn score_field(v: Option<&Value>) -> i64 {
    match v {
        None | Some(Value::Null) => 0,
        Some(_) => integer_like("score", v, 0).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "score defaulted to 0");
            0
        }),
    }
}

/// String fields: strings verbatim, scalars rendered as JSON text, absent/`null` empty.
pub fn text_field(field: &'static str, v: Option<&Value>) -> Result<String, RecordError> {
    match v {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(other) => Err(RecordError::field(field, format!("expected string, got {}", kind_of(other)))),
    }
}

fn body_field(v: Option<&Value>) -> Result<String, RecordError> {
    match v {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RecordError::field("body", format!("expected string, got {}", kind_of(other)))),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Make a metadata field safe for a tab-separated column: each tab, CR or LF
/// becomes a space. Body text never needs this (normalization already
/// collapsed its whitespace).
pub fn clean_column(s: &str) -> Cow<'_, str> {
    if s.contains(['\t', '\n', '\r']) {
        Cow::Owned(s.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(s)
    }
}
