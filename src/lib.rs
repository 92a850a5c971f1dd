mod config;
mod date;
mod keywords;
mod normalize;
mod filters;
mod record;

mod ndjson;
mod progress;
mod tsv;
mod report;
mod util;
mod pipeline;

pub use crate::config::{DateRange, ExtractOptions};
pub use crate::date::{iso_local, local_from_epoch, parse_bound, parse_utc_offset, YearMonth};
pub use crate::pipeline::{ExtractSummary, Extractor};

// Text normalization and keyword matching, usable on their own.
pub use crate::normalize::{collapse_whitespace, decode_entities, normalize_text};
pub use crate::keywords::{KeywordSet, Preset};
pub use crate::filters::{check_record, matches_keywords, within_range, Rejection};

// Record decoding and row-level error kinds.
pub use crate::record::{clean_column, integer_like, score_field, text_field, Comment, RecordError};

// Readers/writers for the input and the two outputs.
pub use crate::ndjson::{is_zstd_path, NdjsonReader};
pub use crate::tsv::{write_table, OutputRow, TsvWriter, TABLE_HEADER};
pub use crate::report::{MonthlyCounts, REPORT_HEADER};

pub use crate::progress::ProgressScope;
pub use crate::util::{init_tracing_once, init_tracing_with};
