//! Host function namespace.
//!
//! Generic single-argument value transforms a rule chain may name after the
//! built-in registry (`trim`, `strtolower`, `intval`, ...). A host function
//! returning a boolean acts as a check; anything else replaces the value.

use crate::primitives::{TRIM_CHARS, as_number, is_collection, is_empty_value, value_to_string};
use crate::rules::html_escape;
use crate::types::Outcome;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// A host function: `(value, optional raw parameter) -> outcome`.
pub type HostFn = Arc<dyn Fn(&Value, Option<&str>) -> Outcome + Send + Sync>;

/// Registry of host functions, keyed by name.
#[derive(Clone, Default)]
pub struct HostFunctions {
    functions: HashMap<String, HostFn>,
}

impl HostFunctions {
    /// An empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard string and scalar transforms.
    pub fn standard() -> Self {
        let mut ns = Self::new();
        ns.register("trim", |v, p| string_transform(v, |s| trim_with(s, p, Ends::Both)));
        ns.register("ltrim", |v, p| string_transform(v, |s| trim_with(s, p, Ends::Start)));
        ns.register("rtrim", |v, p| string_transform(v, |s| trim_with(s, p, Ends::End)));
        ns.register("strtolower", |v, _| string_transform(v, |s| s.to_lowercase()));
        ns.register("strtoupper", |v, _| string_transform(v, |s| s.to_uppercase()));
        ns.register("ucfirst", |v, _| string_transform(v, ucfirst));
        ns.register("lcfirst", |v, _| string_transform(v, lcfirst));
        ns.register("htmlspecialchars", |v, _| string_transform(v, html_escape));
        ns.register("strip_tags", |v, _| string_transform(v, strip_tags));
        ns.register("intval", |v, _| Outcome::Replace(intval(v)));
        ns.register("floatval", |v, _| Outcome::Replace(floatval(v)));
        ns.register("strval", |v, _| string_transform(v, str::to_string));
        ns.register("boolval", |v, _| boolval(v));
        ns
    }

    /// Registers (or replaces) a function.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Value, Option<&str>) -> Outcome + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<&HostFn> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for HostFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("HostFunctions").field("functions", &names).finish()
    }
}

/// Applies a string transform to a scalar's string form. Collections fail.
fn string_transform(v: &Value, f: impl Fn(&str) -> String) -> Outcome {
    if is_collection(v) {
        return Outcome::Fail;
    }
    Outcome::Replace(Value::String(f(&value_to_string(v))))
}

enum Ends {
    Both,
    Start,
    End,
}

/// Trims the default whitespace set, or the characters listed in `param`.
/// `a..z` style ranges in the list expand to every character in between.
fn trim_with(s: &str, param: Option<&str>, ends: Ends) -> String {
    let chars: Vec<char> = match param {
        Some(list) => expand_char_list(list),
        None => TRIM_CHARS.to_vec(),
    };
    let trimmed = match ends {
        Ends::Both => s.trim_matches(chars.as_slice()),
        Ends::Start => s.trim_start_matches(chars.as_slice()),
        Ends::End => s.trim_end_matches(chars.as_slice()),
    };
    trimmed.to_string()
}

fn expand_char_list(list: &str) -> Vec<char> {
    let chars: Vec<char> = list.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars.get(i + 1) == Some(&'.')
            && chars.get(i + 2) == Some(&'.')
            && let Some(&end) = chars.get(i + 3)
            && chars[i] <= end
        {
            out.extend(chars[i]..=end);
            i += 4;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>?").unwrap());

fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

static LEADING_INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t\n\r\x0B\x0C]*([+-]?[0-9]+)").unwrap());

static LEADING_FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .unwrap()
});

/// Integer value: leading digits of a string, truncated floats, `1` for
/// `true` and for non-empty collections.
fn intval(v: &Value) -> Value {
    let n: i64 = match v {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n.as_f64().map_or(0, |f| f.trunc() as i64),
        },
        Value::String(s) => {
            if let Some(f) = LEADING_FLOAT_RE
                .captures(s)
                .and_then(|c| c[1].parse::<f64>().ok())
                && f.is_finite()
                && (f.fract() != 0.0 || s.contains(['e', 'E']))
            {
                f.trunc() as i64
            } else {
                LEADING_INT_RE
                    .captures(s)
                    .and_then(|c| c[1].parse().ok())
                    .unwrap_or(0)
            }
        }
        Value::Array(a) => i64::from(!a.is_empty()),
        Value::Object(o) => i64::from(!o.is_empty()),
    };
    Value::from(n)
}

/// Float value: leading numeric prefix of a string, `1.0` for `true`.
fn floatval(v: &Value) -> Value {
    let f: f64 = match v {
        Value::String(s) => LEADING_FLOAT_RE
            .captures(s)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Array(a) => f64::from(u8::from(!a.is_empty())),
        Value::Object(o) => f64::from(u8::from(!o.is_empty())),
        other => as_number(other).unwrap_or(0.0),
    };
    serde_json::Number::from_f64(f).map_or(Value::from(0), Value::Number)
}

/// Always a replacement, never a verdict: `boolval("0")` stores `false`.
fn boolval(v: &Value) -> Outcome {
    Outcome::Replace(Value::Bool(!is_empty_value(v)))
}
