#[path = "common/mod.rs"]
mod common;

use common::*;
use kwextract::{
    clean_column, integer_like, local_from_epoch, parse_bound, parse_utc_offset, score_field, Comment,
    DateRange, ExtractOptions, Extractor, RecordError, YearMonth,
};
use serde_json::{json, Value};
use time::macros::{datetime, offset};
use time::UtcOffset;

/// `created_utc` accepts integers, floats (truncated) and numeric strings;
/// anything else fails the record as a value error.
#[test]
fn integer_like_conversions() {
    let v = |x: Value| integer_like("created_utc", Some(&x), 0);
    assert_eq!(v(json!(1577836800)).unwrap(), 1577836800);
    assert_eq!(v(json!(1577836800.9)).unwrap(), 1577836800);
    assert_eq!(v(json!(-1.5)).unwrap(), -1);
    assert_eq!(v(json!("1577836800")).unwrap(), 1577836800);
    assert_eq!(v(json!(" 42 ")).unwrap(), 42);
    assert_eq!(integer_like("created_utc", None, 0).unwrap(), 0);

    for bad in [json!("soon"), json!("12.5"), json!(null), json!(true), json!([1]), json!({"a": 1}), json!(u64::MAX)] {
        match v(bad.clone()) {
            Err(RecordError::Field { field, .. }) => assert_eq!(field, "created_utc"),
            other => panic!("expected value error for {bad}, got {other:?}"),
        }
    }
}

/// Defaults for absent fields, JSON text for scalar metadata, empty for null.
#[test]
fn comment_field_defaults() {
    let c = Comment::from_line(br#"{"body": "x"}"#, UtcOffset::UTC).unwrap();
    assert_eq!(c.created, datetime!(1970-01-01 0:00:00));
    assert_eq!((c.subreddit_id.as_str(), c.id.as_str(), c.author.as_str(), c.parent_id.as_str()), ("", "", "", ""));
    assert_eq!(c.score, 0);

    let c = Comment::from_line(
        br#"{"created_utc": "1577836800", "id": 123, "author": null, "score": "7", "extra": [1,2]}"#,
        UtcOffset::UTC,
    )
    .unwrap();
    assert_eq!(c.id, "123");
    assert_eq!(c.author, "");
    assert_eq!(c.score, 7);
    assert_eq!(c.body, "");

    assert!(matches!(
        Comment::from_line(br#"{"body": ["not", "text"]}"#, UtcOffset::UTC),
        Err(RecordError::Field { field: "body", .. })
    ));
    assert!(matches!(Comment::from_line(b"{oops", UtcOffset::UTC), Err(RecordError::Parse(_))));
}

/// A bad timestamp skips the line as a value error; a bad score never does,
/// it is written as 0.
#[test]
fn value_errors_skip_lines() {
    let dir = scratch_dir();
    write_lines(&dir.join("in.jsonl"), &[
        line(json!({"created_utc": "yesterday", "body": "price"})),
        line(json!({"created_utc": JAN_1_2020, "body": "price tag", "score": "lots"})),
        line(json!({"created_utc": JAN_1_2020, "body": "price list", "score": 12})),
        line(json!({"created_utc": JAN_1_2020, "body": "price cap", "score": null})),
        line(json!({"created_utc": JAN_1_2020, "body": "price war", "score": [1]})),
    ]);
    let summary = extractor_in(&dir, "in.jsonl").keywords(["price"]).date_filter(false).run().unwrap();
    assert_eq!(summary.value_errors, 1);
    assert_eq!(summary.retained, 4);
    let scores: Vec<String> = read_rows(&table_path(&dir)).into_iter().map(|r| r[6].clone()).collect();
    assert_eq!(scores, ["0", "12", "0", "0"]);
}

#[test]
fn score_defaults_instead_of_failing() {
    assert_eq!(score_field(None), 0);
    assert_eq!(score_field(Some(&json!(null))), 0);
    assert_eq!(score_field(Some(&json!("lots"))), 0);
    assert_eq!(score_field(Some(&json!({"up": 3}))), 0);
    assert_eq!(score_field(Some(&json!(-4))), -4);
    assert_eq!(score_field(Some(&json!("17"))), 17);
    assert_eq!(score_field(Some(&json!(2.9))), 2);

    let c = Comment::from_line(br#"{"body": "x", "score": null}"#, UtcOffset::UTC).unwrap();
    assert_eq!(c.score, 0);
}

/// Tabs and newlines in metadata never break the seven-column layout.
#[test]
fn metadata_fields_are_tab_safe() {
    assert_eq!(clean_column("plain"), "plain");
    assert_eq!(clean_column("a\tb\nc\rd"), "a b c d");

    let dir = scratch_dir();
    write_lines(&dir.join("in.jsonl"), &[line(json!({
        "created_utc": JAN_1_2020,
        "author": "tab\tby\nname",
        "subreddit_id": "t5\tx",
        "body": "price\twith\ttabs",
    }))]);
    extractor_in(&dir, "in.jsonl").keywords(["price"]).date_filter(false).run().unwrap();

    let rows = read_rows(&table_path(&dir));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 7);
    assert_eq!(rows[0][1], "t5 x");
    assert_eq!(rows[0][3], "tab by name");
    assert_eq!(rows[0][5], "price with tabs");
}

/// The UTC offset moves both the printed timestamp and the month bucket.
#[test]
fn utc_offset_shifts_timestamp_and_month() {
    let dir = scratch_dir();
    // 2019-12-31T20:00:00Z
    write_lines(&dir.join("in.jsonl"), &[comment("c1", JAN_1_2020 - 4 * 3600, "price")]);

    let summary = extractor_in(&dir, "in.jsonl").keywords(["price"]).date_filter(false).run().unwrap();
    assert_eq!(summary.monthly.get(YearMonth::new(2019, 12)), Some(1));
    assert_eq!(read_rows(&table_path(&dir))[0][0], "2019-12-31T20:00:00");

    let summary = extractor_in(&dir, "in.jsonl")
        .keywords(["price"])
        .date_filter(false)
        .utc_offset(parse_utc_offset("+09:00").unwrap())
        .run()
        .unwrap();
    assert_eq!(summary.monthly.get(YearMonth::new(2020, 1)), Some(1));
    assert_eq!(read_rows(&table_path(&dir))[0][0], "2020-01-01T05:00:00");
}

#[test]
fn offset_and_bound_parsing() {
    assert_eq!(parse_utc_offset("UTC").unwrap(), UtcOffset::UTC);
    assert_eq!(parse_utc_offset("z").unwrap(), UtcOffset::UTC);
    assert_eq!(parse_utc_offset("+09:00").unwrap(), offset!(+9));
    assert_eq!(parse_utc_offset("-05:30").unwrap(), offset!(-5:30));
    assert_eq!(parse_utc_offset("+02").unwrap(), offset!(+2));
    assert!(parse_utc_offset("Europe/Budapest").is_err());

    assert_eq!(parse_bound("2016-01-01", false).unwrap(), datetime!(2016-01-01 0:00:00));
    assert_eq!(parse_bound("2022-12-31", true).unwrap(), datetime!(2022-12-31 23:59:59));
    assert_eq!(parse_bound("2020-05-06T07:08:09", true).unwrap(), datetime!(2020-05-06 7:08:09));
    assert!(parse_bound("31/12/2022", false).is_err());

    assert!(DateRange::parse("2022-01-01", "2021-01-01").is_err());
    let r = DateRange::default();
    assert_eq!(r.start, datetime!(2012-01-01 0:00:00));
    assert_eq!(r.end, datetime!(2022-12-31 23:59:59));
}

/// Library callers get no progress bar unless they ask for one.
#[test]
fn progress_is_off_by_default() {
    assert!(!ExtractOptions::default().progress);
    assert!(!Extractor::new().options().progress);
    assert!(Extractor::new().progress(true).options().progress);
}

#[test]
fn epoch_conversion_and_month_keys() {
    let dt = local_from_epoch(JAN_1_2020, UtcOffset::UTC).unwrap();
    assert_eq!(dt, datetime!(2020-01-01 0:00:00));
    assert_eq!(YearMonth::of(dt).to_string(), "2020-01");
    assert_eq!(local_from_epoch(-1, UtcOffset::UTC).unwrap(), datetime!(1969-12-31 23:59:59));
    assert!(local_from_epoch(i64::MAX, UtcOffset::UTC).is_none());

    assert_eq!("2021-03".parse::<YearMonth>().unwrap(), YearMonth::new(2021, 3));
    assert!("2021-13".parse::<YearMonth>().is_err());
    assert!(YearMonth::new(2020, 12) < YearMonth::new(2021, 1));
}
