//! Value primitives shared by the executor and the rule library.
//!
//! Form rules measure and compare scalars through their string form, so most
//! helpers here convert a [`Value`] the way a submitted form field would read.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

// ─── string form ────────────────────────────────────────────────────────────

/// String form of a value.
///
/// Strings are verbatim, integers and integral floats print without a
/// fraction, `true` is `"1"`, `false` and null are `""`. Collections read as
/// `"Array"`.
pub fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                        format!("{}", f as i64)
                    }
                    Some(f) => format!("{}", f),
                    None => n.to_string(),
                }
            }
        }
        Value::Array(_) | Value::Object(_) => "Array".to_string(),
    }
}

/// Characters stripped by [`form_trim`].
pub const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Trims ASCII whitespace and NUL from both ends.
pub fn form_trim(s: &str) -> &str {
    s.trim_matches(TRIM_CHARS)
}

// ─── emptiness ──────────────────────────────────────────────────────────────

/// Null, `""`, or an empty array/object. Non-callback rules outside the
/// exempt set are skipped for such values.
pub fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// The broader "empty" test: also `false`, `0`, `0.0` and `"0"`.
pub fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        other => is_blank(other),
    }
}

pub fn is_collection(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

// ─── numbers ────────────────────────────────────────────────────────────────

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$")
        .unwrap()
});

/// Numeric strings allow surrounding whitespace, a sign, a fraction and an
/// exponent (`" 1.5e3 "`).
pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC_RE.is_match(s)
}

/// A JSON number, or a string that reads as one.
pub fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ─── equality ───────────────────────────────────────────────────────────────

/// Strict equality: same kind and same value.
///
/// Integers and floats are distinct kinds (`1` is not `1.0`); object key
/// order is irrelevant.
pub fn values_strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| values_strict_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return false;
            }
            a.iter()
                .all(|(k, v)| b.get(k).is_some_and(|bv| values_strict_equal(v, bv)))
        }
        _ => false,
    }
}

// ─── keyed collections ──────────────────────────────────────────────────────

/// Original shape of a collection taken apart by [`into_entries`].
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Object,
    Array,
    Scalar(Value),
}

/// Views any value as string-keyed entries. Array elements are keyed by
/// their decimal index; scalars have no entries.
pub fn into_entries(v: Value) -> (Map<String, Value>, Shape) {
    match v {
        Value::Object(map) => (map, Shape::Object),
        Value::Array(items) => (
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Shape::Array,
        ),
        other => (Map::new(), Shape::Scalar(other)),
    }
}

/// Rebuilds a value from entries.
///
/// Entries that came from an array become an array again, in index order,
/// when their keys are exactly `0..n`; otherwise they stay an object. A
/// scalar with no entries added is returned unchanged.
pub fn from_entries(entries: Map<String, Value>, shape: Shape) -> Value {
    match shape {
        Shape::Object => Value::Object(entries),
        Shape::Array => entries_to_array(entries),
        Shape::Scalar(original) if entries.is_empty() => original,
        Shape::Scalar(_) => Value::Object(entries),
    }
}

/// An array in index order when the keys are exactly `0..n`, else an object.
pub fn entries_to_array(entries: Map<String, Value>) -> Value {
    let n = entries.len();
    let mut slots: Vec<Option<Value>> = vec![None; n];
    let mut sequential = true;
    for key in entries.keys() {
        match crate::path::parse_index(key) {
            Some(i) if i < n => {}
            _ => {
                sequential = false;
                break;
            }
        }
    }
    if !sequential {
        return Value::Object(entries);
    }
    for (key, value) in entries {
        if let Some(i) = crate::path::parse_index(&key) {
            slots[i] = Some(value);
        }
    }
    Value::Array(slots.into_iter().flatten().collect())
}

// ─── dates ──────────────────────────────────────────────────────────────────

static DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})(?:[-/](\d{1,2})(?:[-/](\d{1,2}))?)?(?:[ T](\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
    )
    .unwrap()
});

/// Maps `/`, `.`, `年`, `月` to `-`, drops `日`, and trims dashes:
/// `2020年5月1日` → `2020-5-1`.
pub fn normalize_date_separators(s: &str) -> String {
    let mapped: String = s
        .chars()
        .filter_map(|c| match c {
            '/' | '.' | '年' | '月' => Some('-'),
            '日' => None,
            c => Some(c),
        })
        .collect();
    mapped.trim_matches('-').to_string()
}

/// Parses a date or date-time.
///
/// Accepts `now`, `today`, `midnight`, `tomorrow`, `yesterday`, `@<unix>`,
/// and `YYYY[-M[-D]][ H:MM[:SS]]` with `-` or `/` separators. A missing month
/// or day defaults to 1.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let s = form_trim(input);
    let today = Local::now().date_naive();
    match s.to_ascii_lowercase().as_str() {
        "" => return None,
        "now" => return Some(Local::now().naive_local()),
        "today" | "midnight" => return today.and_hms_opt(0, 0, 0),
        "tomorrow" => return (today + Duration::days(1)).and_hms_opt(0, 0, 0),
        "yesterday" => return (today - Duration::days(1)).and_hms_opt(0, 0, 0),
        _ => {}
    }

    if let Some(ts) = s.strip_prefix('@') {
        let secs: i64 = ts.parse().ok()?;
        return chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }

    let caps = DATETIME_RE.captures(s)?;
    let num = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };
    let year: i32 = caps[1].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2, 1)?, num(3, 1)?)?;
    let time = NaiveTime::from_hms_opt(num(4, 0)?, num(5, 0)?, num(6, 0)?)?;
    Some(date.and_time(time))
}
