use form_validation::{FormValidation, RuleSet};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub fn fixtures_dir() -> PathBuf {
    std::env::var("FORM_VALIDATION_FIXTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/conformance/fixtures")
        })
}

/// Reads a YAML suite of test cases.
pub fn load_suite<T: DeserializeOwned>(name: &str) -> Vec<T> {
    let path = fixtures_dir().join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    // Fixtures use YAML 1.2 booleans: bare `n`/`N` etc. are field names, not `false`.
    let options = serde_saphyr::options! { strict_booleans: true };
    serde_saphyr::from_str_with_options(&content, options)
        .unwrap_or_else(|e| panic!("cannot parse {}: {}", path.display(), e))
}

/// Builds a validator from an inline rule set (list or mapping form).
pub fn validator_from(rules: &serde_json::Value) -> FormValidation {
    let set = RuleSet::from_value(rules.clone()).expect("fixture rule set should load");
    FormValidation::from_rule_set(set)
}

/// Structural equality: ignore object key order, compare values deeply.
pub fn values_structurally_equal(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            // Compare numerically
            if let (Some(a), Some(b)) = (a.as_f64(), b.as_f64()) {
                (a - b).abs() < f64::EPSILON
            } else {
                a == b
            }
        }
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(a, b)| values_structurally_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, val_a)| {
                    b.get(key)
                        .is_some_and(|val_b| values_structurally_equal(val_a, val_b))
                })
        }
        _ => false,
    }
}
