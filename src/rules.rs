//! Built-in rule registry.
//!
//! Every rule is a plain function. Most take `(value, param)`; cross-field
//! rules also receive the run's [`ValidationContext`] and the concrete index
//! path of the value, so they can read sibling fields. Rules return
//! [`Outcome::Replace`] when they transform the value.

use crate::context::ValidationContext;
use crate::primitives::{
    as_number, form_trim, is_empty_value, is_numeric_str, normalize_date_separators,
    parse_datetime, value_to_string, values_strict_equal,
};
use crate::types::Outcome;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

/// A rule over the value and its optional raw parameter.
pub type PlainRule = fn(&Value, Option<&str>) -> Outcome;

/// A rule that may read other fields of the input.
pub type CrossFieldRule = fn(&Value, &ValidationContext<'_>, &[String], Option<&str>) -> Outcome;

/// A resolved built-in rule.
#[derive(Clone, Copy)]
pub enum Builtin {
    Plain(PlainRule),
    CrossField(CrossFieldRule),
    /// `match_then_rule_other_filed`: runs another rule on another field and
    /// records that field's error. Needs the executor, so it is dispatched
    /// there.
    MatchThenRule,
}

/// Names of every built-in rule, for introspection.
pub const BUILTIN_RULES: &[&str] = &[
    "required",
    "isset",
    "empty",
    "matches",
    "differs",
    "regex_match",
    "min_length",
    "max_length",
    "exact_length",
    "valid_url",
    "valid_email",
    "valid_emails",
    "valid_ip",
    "alpha",
    "alpha_numeric",
    "alpha_numeric_spaces",
    "alpha_dash",
    "numeric",
    "integer",
    "decimal",
    "greater_than",
    "greater_than_equal_to",
    "less_than",
    "less_than_equal_to",
    "in_list",
    "is_natural",
    "is_natural_no_zero",
    "valid_base64",
    "prep_for_form",
    "prep_url",
    "strip_image_tags",
    "encode_php_tags",
    "is_string",
    "is_array",
    "is_bool",
    "is_numeric",
    "is_int",
    "is_float",
    "default_value",
    "not_empty_str",
    "not_empty_array",
    "least_one_required",
    "max_length_gbk",
    "min_length_gbk",
    "date_later_than",
    "date_before_than",
    "valid_date",
    "prep_url_can_no_scheme",
    "match_then_rule_other_filed",
];

/// Resolves a rule name against the built-in registry.
pub fn lookup(name: &str) -> Option<Builtin> {
    use Builtin::{CrossField, MatchThenRule, Plain};

    let rule = match name {
        // presence
        "required" => Plain(required),
        "isset" => Plain(isset),
        "empty" => Plain(empty),
        "not_empty_str" => Plain(not_empty_str),
        "not_empty_array" => Plain(not_empty_array),
        "default_value" => Plain(default_value),
        // type guards
        "is_string" => Plain(is_string),
        "is_array" => Plain(is_array),
        "is_bool" => Plain(is_bool),
        "is_numeric" => Plain(is_numeric),
        "is_int" => Plain(is_int),
        "is_float" => Plain(is_float),
        // cross-field
        "matches" => CrossField(matches),
        "differs" => CrossField(differs),
        "least_one_required" => CrossField(least_one_required),
        "date_later_than" => CrossField(date_later_than),
        "date_before_than" => CrossField(date_before_than),
        "match_then_rule_other_filed" => MatchThenRule,
        // format
        "regex_match" => Plain(regex_match),
        "min_length" => Plain(min_length),
        "max_length" => Plain(max_length),
        "exact_length" => Plain(exact_length),
        "min_length_gbk" => Plain(min_length_gbk),
        "max_length_gbk" => Plain(max_length_gbk),
        "valid_url" => Plain(valid_url),
        "valid_email" => Plain(valid_email),
        "valid_emails" => Plain(valid_emails),
        "valid_ip" => Plain(valid_ip),
        "valid_base64" => Plain(valid_base64),
        "valid_date" => Plain(valid_date),
        "alpha" => Plain(alpha),
        "alpha_numeric" => Plain(alpha_numeric),
        "alpha_numeric_spaces" => Plain(alpha_numeric_spaces),
        "alpha_dash" => Plain(alpha_dash),
        "numeric" => Plain(numeric),
        "integer" => Plain(integer),
        "decimal" => Plain(decimal),
        "is_natural" => Plain(is_natural),
        "is_natural_no_zero" => Plain(is_natural_no_zero),
        "greater_than" => Plain(greater_than),
        "greater_than_equal_to" => Plain(greater_than_equal_to),
        "less_than" => Plain(less_than),
        "less_than_equal_to" => Plain(less_than_equal_to),
        "in_list" => Plain(in_list),
        // preppers
        "prep_for_form" => Plain(prep_for_form),
        "prep_url" => Plain(prep_url),
        "prep_url_can_no_scheme" => Plain(prep_url_can_no_scheme),
        "strip_image_tags" => Plain(strip_image_tags),
        "encode_php_tags" => Plain(encode_php_tags),
        _ => return None,
    };
    Some(rule)
}

/// String form of a scalar; `None` for arrays and objects, which string
/// rules reject.
fn text(v: &Value) -> Option<String> {
    match v {
        Value::Array(_) | Value::Object(_) => None,
        other => Some(value_to_string(other)),
    }
}

fn text_rule(v: &Value, check: impl Fn(&str) -> bool) -> Outcome {
    match text(v) {
        Some(s) => check(&s).into(),
        None => Outcome::Fail,
    }
}

fn digits_param(param: Option<&str>) -> Option<usize> {
    let p = param?;
    if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    p.parse().ok()
}

// ─── presence ───────────────────────────────────────────────────────────────

fn is_present(v: &Value) -> bool {
    match v {
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        other => !form_trim(&value_to_string(other)).is_empty(),
    }
}

/// Non-empty collection, or a scalar whose trimmed string form is non-empty.
fn required(v: &Value, _param: Option<&str>) -> Outcome {
    is_present(v).into()
}

fn isset(v: &Value, _param: Option<&str>) -> Outcome {
    (!v.is_null()).into()
}

fn empty(v: &Value, _param: Option<&str>) -> Outcome {
    is_empty_value(v).into()
}

/// The key may be absent, but a present value must be a non-empty string.
fn not_empty_str(v: &Value, _param: Option<&str>) -> Outcome {
    matches!(v, Value::String(s) if !s.is_empty()).into()
}

fn not_empty_array(v: &Value, _param: Option<&str>) -> Outcome {
    match v {
        Value::Array(a) => (!a.is_empty()).into(),
        Value::Object(o) => (!o.is_empty()).into(),
        _ => Outcome::Fail,
    }
}

/// Substitutes the parameter for null or `""`.
fn default_value(v: &Value, param: Option<&str>) -> Outcome {
    match v {
        Value::Null => Outcome::Replace(Value::String(param.unwrap_or_default().to_string())),
        Value::String(s) if s.is_empty() => {
            Outcome::Replace(Value::String(param.unwrap_or_default().to_string()))
        }
        _ => Outcome::Pass,
    }
}

// ─── type guards ────────────────────────────────────────────────────────────

fn is_string(v: &Value, _param: Option<&str>) -> Outcome {
    v.is_string().into()
}

fn is_array(v: &Value, _param: Option<&str>) -> Outcome {
    (v.is_array() || v.is_object()).into()
}

fn is_bool(v: &Value, _param: Option<&str>) -> Outcome {
    v.is_boolean().into()
}

fn is_numeric(v: &Value, _param: Option<&str>) -> Outcome {
    match v {
        Value::Number(_) => Outcome::Pass,
        Value::String(s) => is_numeric_str(s).into(),
        _ => Outcome::Fail,
    }
}

fn is_int(v: &Value, _param: Option<&str>) -> Outcome {
    (v.is_i64() || v.is_u64()).into()
}

fn is_float(v: &Value, _param: Option<&str>) -> Outcome {
    v.is_f64().into()
}

// ─── cross-field ────────────────────────────────────────────────────────────

/// Equal to the referenced field, which must be set.
fn matches(
    v: &Value,
    ctx: &ValidationContext<'_>,
    indexes: &[String],
    param: Option<&str>,
) -> Outcome {
    let Some(field) = param else {
        return Outcome::Fail;
    };
    match ctx.lookup(field, indexes) {
        Some(other) if !other.is_null() => values_strict_equal(v, other).into(),
        _ => Outcome::Fail,
    }
}

fn differs(
    v: &Value,
    ctx: &ValidationContext<'_>,
    indexes: &[String],
    param: Option<&str>,
) -> Outcome {
    let Some(field) = param else {
        return Outcome::Pass;
    };
    match ctx.lookup(field, indexes) {
        Some(other) if !other.is_null() => (!values_strict_equal(v, other)).into(),
        _ => Outcome::Pass,
    }
}

/// This field and the referenced one may not both be empty.
fn least_one_required(
    v: &Value,
    ctx: &ValidationContext<'_>,
    indexes: &[String],
    param: Option<&str>,
) -> Outcome {
    if is_present(v) {
        return Outcome::Pass;
    }
    let other = param.and_then(|field| ctx.lookup(field, indexes));
    other.is_some_and(is_present).into()
}

/// Reads a date bound: the parameter itself when it parses as a date,
/// otherwise the value of the field it names.
fn date_bound(
    ctx: &ValidationContext<'_>,
    indexes: &[String],
    param: Option<&str>,
) -> Option<chrono::NaiveDateTime> {
    let param = param?;
    if let Some(t) = parse_datetime(param) {
        return Some(t);
    }
    let other = ctx
        .lookup(param, indexes)
        .map(value_to_string)
        .unwrap_or_default();
    parse_datetime(&normalize_date_separators(&other))
}

fn own_date(v: &Value) -> Option<chrono::NaiveDateTime> {
    parse_datetime(&normalize_date_separators(&text(v)?))
}

/// Not earlier than the bound (a date literal or another field).
fn date_later_than(
    v: &Value,
    ctx: &ValidationContext<'_>,
    indexes: &[String],
    param: Option<&str>,
) -> Outcome {
    let Some(start) = date_bound(ctx, indexes, param) else {
        return Outcome::Fail;
    };
    match own_date(v) {
        Some(end) => (end >= start).into(),
        None => Outcome::Fail,
    }
}

/// Not later than the bound (a date literal or another field).
fn date_before_than(
    v: &Value,
    ctx: &ValidationContext<'_>,
    indexes: &[String],
    param: Option<&str>,
) -> Outcome {
    let Some(end) = date_bound(ctx, indexes, param) else {
        return Outcome::Fail;
    };
    match own_date(v) {
        Some(start) => (start <= end).into(),
        None => Outcome::Fail,
    }
}

// ─── pattern ────────────────────────────────────────────────────────────────

/// Compiles a delimited pattern such as `/^[a-z]+$/i`.
///
/// Bracket-style delimiters pair up (`{...}`, `(...)`); the modifiers
/// `i`, `m`, `s`, `x` and `U` map to inline flags, `u` and `D` are accepted
/// and ignored. Anything else is rejected.
pub fn compile_delimited(pattern: &str) -> Option<Regex> {
    let open = pattern.chars().next()?;
    if open.is_alphanumeric() || open == '\\' || open.is_whitespace() {
        return None;
    }
    let close = match open {
        '(' => ')',
        '{' => '}',
        '[' => ']',
        '<' => '>',
        c => c,
    };
    let start = open.len_utf8();
    let end = pattern.rfind(close)?;
    if end < start {
        return None;
    }

    let body = &pattern[start..end];
    let mut flags = String::new();
    for m in pattern[end + close.len_utf8()..].chars() {
        match m {
            'i' | 'm' | 's' | 'x' | 'U' => flags.push(m),
            'u' | 'D' => {}
            _ => return None,
        }
    }

    let source = if flags.is_empty() {
        body.to_string()
    } else {
        format!("(?{}){}", flags, body)
    };
    Regex::new(&source).ok()
}

fn regex_match(v: &Value, param: Option<&str>) -> Outcome {
    let Some(re) = param.and_then(compile_delimited) else {
        return Outcome::Fail;
    };
    text_rule(v, |s| re.is_match(s))
}

// ─── length ─────────────────────────────────────────────────────────────────

fn min_length(v: &Value, param: Option<&str>) -> Outcome {
    let Some(n) = digits_param(param) else {
        return Outcome::Fail;
    };
    text_rule(v, |s| s.chars().count() >= n)
}

fn max_length(v: &Value, param: Option<&str>) -> Outcome {
    let Some(n) = digits_param(param) else {
        return Outcome::Fail;
    };
    text_rule(v, |s| s.chars().count() <= n)
}

fn exact_length(v: &Value, param: Option<&str>) -> Outcome {
    let Some(n) = digits_param(param) else {
        return Outcome::Fail;
    };
    text_rule(v, |s| s.chars().count() == n)
}

/// Display width counting CJK (multi-byte) characters as two columns and
/// ASCII as one: `(bytes + chars) / 2`.
pub fn gbk_width(s: &str) -> f64 {
    (s.len() + s.chars().count()) as f64 / 2.0
}

fn max_length_gbk(v: &Value, param: Option<&str>) -> Outcome {
    let Some(n) = digits_param(param) else {
        return Outcome::Fail;
    };
    text_rule(v, |s| gbk_width(s) <= n as f64)
}

fn min_length_gbk(v: &Value, param: Option<&str>) -> Outcome {
    let Some(n) = digits_param(param) else {
        return Outcome::Fail;
    };
    text_rule(v, |s| gbk_width(s) >= n as f64)
}

// ─── network formats ────────────────────────────────────────────────────────

static URL_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([^:]*):)?//(.*)$").unwrap());

static URL_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[^@/?#\s]+@)?(?:\[[0-9A-Fa-f:.]+\]|[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.?)(?::[0-9]{1,5})?(?:[/?#]\S*)?$",
    )
    .unwrap()
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .unwrap()
});

/// `http`/`https` URLs, or scheme-less host names (`example.com/path`).
fn valid_url(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| {
        if s.is_empty() {
            return false;
        }
        let mut rest = s;
        if let Some(caps) = URL_SCHEME_RE.captures(s) {
            let scheme = caps.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
            let host = caps.get(2).map_or("", |m| m.as_str());
            if host.is_empty() || !matches!(scheme.as_str(), "http" | "https") {
                return false;
            }
            rest = host;
        }
        if rest.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        URL_HOST_RE.is_match(rest)
    })
}

fn is_email(s: &str) -> bool {
    s.len() <= 254 && EMAIL_RE.is_match(s)
}

fn valid_email(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, is_email)
}

/// Comma-separated list of addresses, each valid.
fn valid_emails(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| s.split(',').all(|e| is_email(form_trim(e))))
}

/// Any IP, or only `ipv4` / `ipv6` when given as parameter.
fn valid_ip(v: &Value, param: Option<&str>) -> Outcome {
    let which = param.unwrap_or_default().to_ascii_lowercase();
    text_rule(v, |s| match which.as_str() {
        "ipv4" => s.parse::<Ipv4Addr>().is_ok(),
        "ipv6" => s.parse::<Ipv6Addr>().is_ok(),
        _ => s.parse::<IpAddr>().is_ok(),
    })
}

/// Canonical standard-alphabet base64 (decoding and re-encoding is lossless).
fn valid_base64(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| match BASE64.decode(s) {
        Ok(bytes) => BASE64.encode(bytes) == s,
        Err(_) => false,
    })
}

// ─── dates ──────────────────────────────────────────────────────────────────

static VALID_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:19|20)\d{2}(?:-\d{1,2}(?:-\d{1,2})?|\.\d{1,2}(?:\.\d{1,2})?|/\d{1,2}(?:/\d{1,2})?)?|(?:19|20)\d{2}年\d{1,2}月(?:\d{1,2}日)?)?$",
    )
    .unwrap()
});

/// A calendar date between 1900 and 2099 written as `YYYY`, `YYYY-M`,
/// `YYYY-M-D` (also with `.` or `/`), or `YYYY年M月[D日]`.
///
/// A positive parameter requires a date after today, a negative one today
/// or earlier. The date's midnight is compared with the current time.
fn valid_date(v: &Value, param: Option<&str>) -> Outcome {
    let flag: i64 = param.and_then(|p| form_trim(p).parse().ok()).unwrap_or(0);
    text_rule(v, |s| {
        if !VALID_DATE_RE.is_match(s) {
            return false;
        }
        let normalized = normalize_date_separators(s);
        let parts: Vec<u32> = match normalized
            .split('-')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(parts) => parts,
            Err(_) => return false,
        };
        let year = parts[0] as i32;
        let month = parts.get(1).copied().unwrap_or(1);
        let day = parts.get(2).copied().unwrap_or(1);
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return false;
        };
        let today = Local::now().date_naive();
        match flag {
            f if f > 0 => date > today,
            f if f < 0 => date <= today,
            _ => true,
        }
    })
}

// ─── character classes ──────────────────────────────────────────────────────

static ALPHA_NUMERIC_SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9 ]+$").unwrap());

static ALPHA_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9_-]+$").unwrap());

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\-+]?[0-9]*\.?[0-9]+$").unwrap());

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\-+]?[0-9]+$").unwrap());

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\-+]?[0-9]+\.[0-9]+$").unwrap());

fn alpha(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic()))
}

fn alpha_numeric(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric()))
}

fn alpha_numeric_spaces(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| ALPHA_NUMERIC_SPACES_RE.is_match(s))
}

fn alpha_dash(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| ALPHA_DASH_RE.is_match(s))
}

fn numeric(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| NUMERIC_RE.is_match(s))
}

fn integer(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| INTEGER_RE.is_match(s))
}

fn decimal(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| DECIMAL_RE.is_match(s))
}

fn is_natural(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
}

fn is_natural_no_zero(v: &Value, _param: Option<&str>) -> Outcome {
    text_rule(v, |s| {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && s.bytes().any(|b| b != b'0')
    })
}

// ─── comparisons ────────────────────────────────────────────────────────────

fn compare_numbers(v: &Value, param: Option<&str>, cmp: fn(f64, f64) -> bool) -> Outcome {
    let bound = param.and_then(|p| as_number(&Value::String(p.to_string())));
    match (as_number(v), bound) {
        (Some(a), Some(b)) => cmp(a, b).into(),
        _ => Outcome::Fail,
    }
}

fn greater_than(v: &Value, param: Option<&str>) -> Outcome {
    compare_numbers(v, param, |a, b| a > b)
}

fn greater_than_equal_to(v: &Value, param: Option<&str>) -> Outcome {
    compare_numbers(v, param, |a, b| a >= b)
}

fn less_than(v: &Value, param: Option<&str>) -> Outcome {
    compare_numbers(v, param, |a, b| a < b)
}

fn less_than_equal_to(v: &Value, param: Option<&str>) -> Outcome {
    compare_numbers(v, param, |a, b| a <= b)
}

/// One of the comma-separated parameter values, compared as strings.
fn in_list(v: &Value, param: Option<&str>) -> Outcome {
    let list = param.unwrap_or_default();
    text_rule(v, |s| list.split(',').any(|item| item == s))
}

// ─── preppers ───────────────────────────────────────────────────────────────

/// Escapes `&`, `<`, `>`, `"` and `'` for HTML output.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

fn prep_for_form(v: &Value, _param: Option<&str>) -> Outcome {
    match v {
        Value::String(s) => Outcome::Replace(Value::String(html_escape(s))),
        _ => Outcome::Pass,
    }
}

/// Prefixes `http://` when no http(s) scheme is present.
fn prep_url(v: &Value, _param: Option<&str>) -> Outcome {
    let Some(s) = text(v) else {
        return Outcome::Pass;
    };
    if s.is_empty() || s == "http://" {
        return Outcome::Replace(Value::String(String::new()));
    }
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return Outcome::Replace(Value::String(format!("http://{}", s)));
    }
    Outcome::Replace(Value::String(s))
}

/// Like `prep_url` but prefixes a scheme-relative `//` instead of `http://`.
fn prep_url_can_no_scheme(v: &Value, _param: Option<&str>) -> Outcome {
    let Some(s) = text(v) else {
        return Outcome::Pass;
    };
    if s.is_empty() || s == "http://" || s == "//" {
        return Outcome::Replace(Value::String(String::new()));
    }
    if !s.starts_with("//") && !s.starts_with("http://") && !s.starts_with("https://") {
        let host = s.trim_start_matches([':', '/']);
        return Outcome::Replace(Value::String(format!("//{}", host)));
    }
    Outcome::Replace(Value::String(s))
}

static IMAGE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc\s*=\s*["']?([^"'\s>]*)["']?[^>]*>"#).unwrap()
});

/// Replaces `<img src="x">` tags with their source URL.
fn strip_image_tags(v: &Value, _param: Option<&str>) -> Outcome {
    match v {
        Value::String(s) => {
            Outcome::Replace(Value::String(IMAGE_TAG_RE.replace_all(s, "$1").into_owned()))
        }
        _ => Outcome::Pass,
    }
}

fn encode_php_tags(v: &Value, _param: Option<&str>) -> Outcome {
    match v {
        Value::String(s) => Outcome::Replace(Value::String(
            s.replace("<?", "&lt;?").replace("?>", "?&gt;"),
        )),
        _ => Outcome::Pass,
    }
}
