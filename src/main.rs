use anyhow::{Context, Result};
use clap::Parser;
use kwextract::{init_tracing_with, parse_utc_offset, DateRange, ExtractOptions, Extractor, KeywordSet, Preset};
use std::io::{self, Write};
use std::path::PathBuf;

/// Filter a Reddit comment dump (NDJSON, optionally .zst) by keyword and date,
/// dropping repeated bodies, and write a TSV extract plus monthly counts.
#[derive(Parser, Debug)]
#[command(name = "kwextract", version, about)]
struct Cli {
    /// Input NDJSON file; `.zst` files are decompressed on the fly.
    #[arg(short, long, env = "KWX_INPUT")]
    input: PathBuf,

    /// Retained-records table (overwritten).
    #[arg(short, long, env = "KWX_TABLE")]
    table: PathBuf,

    /// Monthly counts report (overwritten).
    #[arg(short, long, env = "KWX_REPORT")]
    report: PathBuf,

    /// Keyword to match (case-sensitive substring). Repeatable or comma-separated.
    #[arg(short = 'k', long = "keyword", env = "KWX_KEYWORDS", value_delimiter = ',')]
    keywords: Vec<String>,

    /// File with one keyword per line (`#` comments allowed).
    #[arg(long)]
    keywords_file: Option<PathBuf>,

    /// Built-in keyword list: english, english-extended, greek, hungarian. Repeatable.
    #[arg(long = "preset")]
    presets: Vec<Preset>,

    /// First instant kept by the date gate (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS).
    #[arg(long, default_value = "2012-01-01")]
    start: String,

    /// Last instant kept by the date gate; a bare date covers the whole day.
    #[arg(long, default_value = "2022-12-31")]
    end: String,

    /// Keep records regardless of date.
    #[arg(long)]
    no_date_filter: bool,

    /// Offset used for timestamps and month buckets (UTC, +HH:MM, -HH:MM).
    #[arg(long, env = "KWX_UTC_OFFSET", default_value = "UTC", allow_hyphen_values = true)]
    utc_offset: String,

    /// Hide the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_with(if cli.verbose { "debug" } else { "info" });

    let mut keywords = KeywordSet::new(cli.keywords);
    if let Some(path) = &cli.keywords_file {
        keywords.extend(KeywordSet::from_file(path)?.as_slice().iter().cloned());
    }
    for preset in cli.presets {
        keywords.extend(preset.words());
    }

    let opts = ExtractOptions::default()
        .with_input(&cli.input)
        .with_table_out(&cli.table)
        .with_report_out(&cli.report)
        .with_keyword_set(keywords)
        .with_date_range(DateRange::parse(&cli.start, &cli.end)?)
        .with_date_filter(!cli.no_date_filter)
        .with_utc_offset(parse_utc_offset(&cli.utc_offset)?)
        .with_progress(!cli.no_progress)
        .with_progress_label("Filtering comments");

    let summary = Extractor::from_options(opts).run()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    summary.write_console(&mut out).context("writing summary to stdout")?;
    out.flush()?;
    Ok(())
}
