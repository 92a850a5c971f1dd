#![allow(dead_code)]

use kwextract::Extractor;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Scratch directory that lives for the whole test binary run.
pub fn scratch_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Write raw lines (each followed by `\n`) to a plain NDJSON file.
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write the same lines into a zstd-compressed `.zst` file.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Read a text file line-by-line, keeping empty lines.
pub fn read_all_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    BufReader::new(f).lines().map(|l| l.unwrap()).collect()
}

/// Data rows of a TSV file (header dropped), split into columns.
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    read_all_lines(path)
        .into_iter()
        .skip(1)
        .map(|l| l.split('\t').map(str::to_string).collect())
        .collect()
}

/// A comment line with the usual fields filled in.
pub fn comment(id: &str, created_utc: i64, body: &str) -> String {
    json!({
        "created_utc": created_utc,
        "subreddit_id": "t5_2qh4j",
        "id": id,
        "author": format!("user_{id}"),
        "parent_id": "t3_abc",
        "body": body,
        "score": 3,
        "controversiality": 0,
        "stickied": false
    })
    .to_string()
}

pub fn line(v: Value) -> String {
    v.to_string()
}

/// Extractor pointed at `dir/{input.jsonl,out.tsv,counts.txt}` with progress off.
pub fn extractor_in(dir: &Path, input_name: &str) -> Extractor {
    Extractor::new()
        .input(dir.join(input_name))
        .table_output(dir.join("out").join("out.tsv"))
        .report_output(dir.join("out").join("counts.txt"))
        .progress(false)
}

pub fn table_path(dir: &Path) -> PathBuf {
    dir.join("out").join("out.tsv")
}

pub fn report_path(dir: &Path) -> PathBuf {
    dir.join("out").join("counts.txt")
}

// Handy epoch seconds (UTC).
pub const JAN_1_2020: i64 = 1_577_836_800;
pub const JUN_1_2015: i64 = 1_433_116_800;
pub const JUN_1_2016: i64 = 1_464_739_200;
pub const MAR_15_2021: i64 = 1_615_766_400;
