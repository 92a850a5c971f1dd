//! Body text normalization: entity decoding and whitespace collapse.
//! The result is both the dedup key and the keyword match target.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

static WS_RUN: OnceLock<Regex> = OnceLock::new();
static CHAR_REF: OnceLock<Regex> = OnceLock::new();

/// Unicode whitespace plus the ASCII information separators (FS, GS, RS, US),
/// which some dumps carry inside bodies and which split lines in other tools.
fn ws_run() -> &'static Regex {
    WS_RUN.get_or_init(|| Regex::new(r"[\s\x1C-\x1F]+").unwrap())
}

/// HTML5 character reference: decimal, hex, or a name of up to 32 characters.
/// The trailing `;` is optional in all three forms.
fn char_ref() -> &'static Regex {
    CHAR_REF.get_or_init(|| {
        Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)").unwrap()
    })
}

/// Windows-1252 meanings of the C1 range, which HTML5 applies to `&#128;`..`&#159;`.
/// Positions with no cp1252 character keep the C1 code point.
const CP1252_C1: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

/// Entity names HTML5 also recognises without the closing `;`, sorted for binary search.
const LEGACY_ENTITIES: &[(&str, &str)] = &[
    ("AElig", "\u{c6}"),
    ("AMP", "&"),
    ("Aacute", "\u{c1}"),
    ("Acirc", "\u{c2}"),
    ("Agrave", "\u{c0}"),
    ("Aring", "\u{c5}"),
    ("Atilde", "\u{c3}"),
    ("Auml", "\u{c4}"),
    ("COPY", "\u{a9}"),
    ("Ccedil", "\u{c7}"),
    ("ETH", "\u{d0}"),
    ("Eacute", "\u{c9}"),
    ("Ecirc", "\u{ca}"),
    ("Egrave", "\u{c8}"),
    ("Euml", "\u{cb}"),
    ("GT", ">"),
    ("Iacute", "\u{cd}"),
    ("Icirc", "\u{ce}"),
    ("Igrave", "\u{cc}"),
    ("Iuml", "\u{cf}"),
    ("LT", "<"),
    ("Ntilde", "\u{d1}"),
    ("Oacute", "\u{d3}"),
    ("Ocirc", "\u{d4}"),
    ("Ograve", "\u{d2}"),
    ("Oslash", "\u{d8}"),
    ("Otilde", "\u{d5}"),
    ("Ouml", "\u{d6}"),
    ("QUOT", "\u{22}"),
    ("REG", "\u{ae}"),
    ("THORN", "\u{de}"),
    ("Uacute", "\u{da}"),
    ("Ucirc", "\u{db}"),
    ("Ugrave", "\u{d9}"),
    ("Uuml", "\u{dc}"),
    ("Yacute", "\u{dd}"),
    ("aacute", "\u{e1}"),
    ("acirc", "\u{e2}"),
    ("acute", "\u{b4}"),
    ("aelig", "\u{e6}"),
    ("agrave", "\u{e0}"),
    ("amp", "&"),
    ("aring", "\u{e5}"),
    ("atilde", "\u{e3}"),
    ("auml", "\u{e4}"),
    ("brvbar", "\u{a6}"),
    ("ccedil", "\u{e7}"),
    ("cedil", "\u{b8}"),
    ("cent", "\u{a2}"),
    ("copy", "\u{a9}"),
    ("curren", "\u{a4}"),
    ("deg", "\u{b0}"),
    ("divide", "\u{f7}"),
    ("eacute", "\u{e9}"),
    ("ecirc", "\u{ea}"),
    ("egrave", "\u{e8}"),
    ("eth", "\u{f0}"),
    ("euml", "\u{eb}"),
    ("frac12", "\u{bd}"),
    ("frac14", "\u{bc}"),
    ("frac34", "\u{be}"),
    ("gt", ">"),
    ("iacute", "\u{ed}"),
    ("icirc", "\u{ee}"),
    ("iexcl", "\u{a1}"),
    ("igrave", "\u{ec}"),
    ("iquest", "\u{bf}"),
    ("iuml", "\u{ef}"),
    ("laquo", "\u{ab}"),
    ("lt", "<"),
    ("macr", "\u{af}"),
    ("micro", "\u{b5}"),
    ("middot", "\u{b7}"),
    ("nbsp", "\u{a0}"),
    ("not", "\u{ac}"),
    ("ntilde", "\u{f1}"),
    ("oacute", "\u{f3}"),
    ("ocirc", "\u{f4}"),
    ("ograve", "\u{f2}"),
    ("ordf", "\u{aa}"),
    ("ordm", "\u{ba}"),
    ("oslash", "\u{f8}"),
    ("otilde", "\u{f5}"),
    ("ouml", "\u{f6}"),
    ("para", "\u{b6}"),
    ("plusmn", "\u{b1}"),
    ("pound", "\u{a3}"),
    ("quot", "\u{22}"),
    ("raquo", "\u{bb}"),
    ("reg", "\u{ae}"),
    ("sect", "\u{a7}"),
    ("shy", "\u{ad}"),
    ("sup1", "\u{b9}"),
    ("sup2", "\u{b2}"),
    ("sup3", "\u{b3}"),
    ("szlig", "\u{df}"),
    ("thorn", "\u{fe}"),
    ("times", "\u{d7}"),
    ("uacute", "\u{fa}"),
    ("ucirc", "\u{fb}"),
    ("ugrave", "\u{f9}"),
    ("uml", "\u{a8}"),
    ("uuml", "\u{fc}"),
    ("yacute", "\u{fd}"),
    ("yen", "\u{a5}"),
    ("yuml", "\u{ff}"),
];

fn legacy_entity(name: &str) -> Option<&'static str> {
    LEGACY_ENTITIES
        .binary_search_by(|(k, _)| (*k).cmp(name))
        .ok()
        .map(|i| LEGACY_ENTITIES[i].1)
}

/// Code points a numeric reference may not produce; they decode to nothing.
fn is_dropped_code_point(cp: u32) -> bool {
    matches!(cp, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || (cp & 0xFFFE) == 0xFFFE
}

fn numeric_ref(digits: &str, radix: u32) -> String {
    // Overlong references saturate and land in the replacement branch.
    let cp = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
    match cp {
        0x00 => '\u{FFFD}'.to_string(),
        0x0D => '\r'.to_string(),
        0x80..=0x9F => CP1252_C1[(cp - 0x80) as usize].to_string(),
        0xD800..=0xDFFF => '\u{FFFD}'.to_string(),
        _ if cp > 0x10FFFF => '\u{FFFD}'.to_string(),
        _ if is_dropped_code_point(cp) => String::new(),
        _ => char::from_u32(cp).map(String::from).unwrap_or_else(|| '\u{FFFD}'.to_string()),
    }
}

fn named_ref(name: &str) -> String {
    if name.ends_with(';') {
        let whole = format!("&{name}");
        if let Cow::Owned(decoded) = html_escape::decode_html_entities(&whole) {
            if decoded != whole {
                return decoded;
            }
        }
    } else if let Some(v) = legacy_entity(name) {
        return v.to_string();
    }
    // Longest legacy name that prefixes the reference; the rest is kept as text.
    for end in (2..name.len()).rev() {
        if !name.is_char_boundary(end) {
            continue;
        }
        if let Some(v) = legacy_entity(&name[..end]) {
            return format!("{v}{}", &name[end..]);
        }
    }
    format!("&{name}")
}

fn replace_ref(caps: &Captures<'_>) -> String {
    let body = &caps[1];
    if let Some(num) = body.strip_prefix('#') {
        let num = num.trim_end_matches(';');
        match num.strip_prefix(['x', 'X']) {
            Some(hex) => numeric_ref(hex, 16),
            None => numeric_ref(num, 10),
        }
    } else {
        named_ref(body)
    }
}

/// One pass of HTML5 character reference decoding.
fn unescape_once(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    char_ref().replace_all(text, replace_ref)
}

/// Decode HTML character references with the HTML5 rules until the text stops
/// changing. Dumps frequently double-escape (`&amp;gt;`), and a single
/// pass would leave output that a second normalization changes again.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    let mut current = match unescape_once(text) {
        Cow::Borrowed(_) => return Cow::Borrowed(text),
        Cow::Owned(s) => s,
    };
    // A decoded reference has fewer characters than its source, so this terminates.
    loop {
        let next = match unescape_once(&current) {
            Cow::Borrowed(_) => break,
            Cow::Owned(s) => s,
        };
        if next == current {
            break;
        }
        current = next;
    }
    Cow::Owned(current)
}

/// Collapse each whitespace run to one ASCII space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    ws_run().replace_all(text, " ").trim_matches(' ').to_string()
}

/// Full normalization: decode entities, then collapse whitespace.
/// Idempotent: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(text: &str) -> String {
    collapse_whitespace(&decode_entities(text))
}
