use super::common::load_suite;
use form_validation::{ErrorMode, FormValidation};
use serde_json::{Value, json};

#[derive(Debug, serde::Deserialize)]
struct RuleCase {
    rule: String,
    #[serde(default)]
    pass: Vec<Value>,
    #[serde(default)]
    fail: Vec<Value>,
}

fn error_count(rule: &str, value: &Value) -> usize {
    let mut v = FormValidation::new();
    v.set_rules("v", "V", rule);
    v.verify(json!({ "v": value }), ErrorMode::Return)
        .unwrap_or_else(|e| panic!("{} on {}: {}", rule, value, e))
        .errors
        .len()
}

#[test]
fn rule_conformance_suite() {
    let cases: Vec<RuleCase> = load_suite("rules.yaml");

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        for (value, expected) in case
            .pass
            .iter()
            .map(|v| (v, 0))
            .chain(case.fail.iter().map(|v| (v, 1)))
        {
            let actual = error_count(&case.rule, value);
            if actual == expected {
                passed += 1;
            } else {
                eprintln!(
                    "  FAIL {} on {}: expected {} error(s), got {}",
                    case.rule, value, expected, actual
                );
                failed += 1;
            }
        }
    }

    eprintln!(
        "\nRule conformance: {} passed, {} failed out of {} total",
        passed,
        failed,
        passed + failed
    );

    assert_eq!(failed, 0, "{} rule conformance checks failed", failed);
}
