//! Upload normalization.
//!
//! Multipart uploads arrive attribute-major: every attribute (`name`,
//! `type`, `size`, ...) holds its own copy of the nesting.
//!
//! ```text
//! {"doc": {"name": {"a": "x.pdf", "b": "y.pdf"}, "size": {"a": 1, "b": 2}}}
//! ```
//!
//! [`restructure_files`] turns that into one record per file:
//!
//! ```text
//! {"doc": {"a": {"name": "x.pdf", "size": 1}, "b": {"name": "y.pdf", "size": 2}}}
//! ```

use crate::primitives::entries_to_array;
use serde_json::{Map, Value};

/// Reshapes `{name: {attribute: nested}}` into `{name: nested-of-{attribute: value}}`.
///
/// Objects whose keys end up exactly `0..n` are emitted as arrays.
pub fn restructure_files(input: &Value) -> Value {
    let mut output = Map::new();
    for (name, attributes) in entries(input) {
        let slot = output
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
        for (attribute, value) in entries(attributes) {
            scatter(slot, &attribute, value);
        }
    }
    arrayify(Value::Object(output))
}

/// Writes every leaf of `value` under the same nesting in `target`, keyed by
/// `attribute` at the bottom.
fn scatter(target: &mut Value, attribute: &str, value: &Value) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(map) = target else {
        return;
    };
    match value {
        Value::Array(_) | Value::Object(_) => {
            for (key, child) in entries(value) {
                let next = map
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()));
                scatter(next, attribute, child);
            }
        }
        leaf => {
            map.insert(attribute.to_string(), leaf.clone());
        }
    }
}

fn entries(v: &Value) -> Vec<(String, &Value)> {
    match v {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn arrayify(v: Value) -> Value {
    match v {
        Value::Object(map) if !map.is_empty() => {
            let map: Map<String, Value> = map.into_iter().map(|(k, v)| (k, arrayify(v))).collect();
            entries_to_array(map)
        }
        other => other,
    }
}
