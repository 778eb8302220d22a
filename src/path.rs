//! Field path model.
//!
//! A field path such as `user[address][city]` or `items[][start_date]` is
//! split into segments (`["user", "address", "city"]`). The empty segment is a
//! wildcard meaning "every key of this collection".

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static BRACKET_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());

/// Ordered path segments; `""` is the wildcard.
pub type PathSegments = Vec<String>;

/// The wildcard segment.
pub const WILDCARD: &str = "";

// ─── parse ──────────────────────────────────────────────────────────────────

/// Parses a field path into segments.
///
/// The first segment is the text before the first bracket and every `[...]`
/// group adds one segment. A path without bracket groups is a single segment.
/// A path that starts with a bracket takes its first segment from the first
/// group, so `"[]"` is the root wildcard `[""]` and `"[][name]"` is
/// `["", "name"]`.
pub fn parse(path: &str) -> PathSegments {
    let groups: Vec<String> = BRACKET_GROUP_RE
        .captures_iter(path)
        .map(|c| c[1].to_string())
        .collect();

    if groups.is_empty() {
        return vec![path.to_string()];
    }

    let head = match path.find('[') {
        Some(i) => &path[..i],
        None => path,
    };

    if head.is_empty() {
        groups
    } else {
        let mut segments = Vec::with_capacity(groups.len() + 1);
        segments.push(head.to_string());
        segments.extend(groups);
        segments
    }
}

// ─── format ─────────────────────────────────────────────────────────────────

/// Formats segments back into a path: `a[b][c]`.
///
/// A lone segment formats as itself (the root wildcard is `""`); a leading
/// wildcard followed by more segments formats as `[][b]`.
pub fn format<S: AsRef<str>>(segments: &[S]) -> String {
    match segments.split_first() {
        None => String::new(),
        Some((first, [])) => first.as_ref().to_string(),
        Some((first, rest)) => {
            let mut out = if first.as_ref().is_empty() {
                "[]".to_string()
            } else {
                first.as_ref().to_string()
            };
            for s in rest {
                out.push('[');
                out.push_str(s.as_ref());
                out.push(']');
            }
            out
        }
    }
}

/// Canonical form of a raw path: `format(parse(path))`.
pub fn canonical(path: &str) -> String {
    format(&parse(path))
}

/// True when `parent`'s segments are a strict prefix of `child`'s.
pub fn is_parent_of<S: AsRef<str>>(parent: &[S], child: &[S]) -> bool {
    parent.len() < child.len()
        && parent
            .iter()
            .zip(child.iter())
            .all(|(a, b)| a.as_ref() == b.as_ref())
}

// ─── resolve_wildcards ──────────────────────────────────────────────────────

/// Resolves the wildcard segments of `pattern` against the concrete index
/// path of the value being validated.
///
/// Substitution only happens when `context` has more than one segment and
/// `pattern` holds a wildcard. Both are walked positionally: equal segments
/// are kept, a wildcard takes the context segment, and the first non-wildcard
/// mismatch ends substitution. `items[][start]` against `["items", "3", "end"]`
/// becomes `items[3][start]`.
pub fn resolve_wildcards<S: AsRef<str>>(pattern: &[String], context: &[S]) -> PathSegments {
    let mut resolved = pattern.to_vec();

    if context.len() > 1 && pattern.iter().any(|s| s == WILDCARD) {
        let count = context.len().min(pattern.len());
        for i in 0..count {
            let concrete = context[i].as_ref();
            if resolved[i] == concrete {
                continue;
            } else if resolved[i] == WILDCARD {
                resolved[i] = concrete.to_string();
            } else {
                break;
            }
        }
    }

    resolved
}

// ─── lookup ─────────────────────────────────────────────────────────────────

/// Walks `tree` one segment at a time.
///
/// Object keys match verbatim; array elements are addressed by their decimal
/// index. Returns `None` as soon as a segment is missing, at any depth.
pub fn lookup<'a, S: AsRef<str>>(tree: &'a Value, segments: &[S]) -> Option<&'a Value> {
    let mut current = tree;
    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Parses a canonical array index (`"0"`, `"17"`; not `"01"` or `"+1"`).
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty()
        || !segment.bytes().all(|b| b.is_ascii_digit())
        || (segment.len() > 1 && segment.starts_with('0'))
    {
        return None;
    }
    segment.parse().ok()
}
