use super::common::{load_suite, values_structurally_equal};
use form_validation::{ErrorMode, FormValidation};
use serde_json::{Value, json};

#[derive(Debug, serde::Deserialize)]
struct TransformCase {
    rule: String,
    input: Value,
    output: Value,
}

#[test]
fn transform_conformance_suite() {
    let cases: Vec<TransformCase> = load_suite("transforms.yaml");

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        let mut v = FormValidation::new();
        v.set_rules("v", "V", case.rule.as_str());
        let verified = v
            .verify(json!({ "v": case.input }), ErrorMode::Return)
            .unwrap();

        let actual = &verified.data["v"];
        if verified.is_valid() && values_structurally_equal(actual, &case.output) {
            passed += 1;
        } else {
            eprintln!(
                "  FAIL {} on {}: expected {}, got {} ({} error(s))",
                case.rule,
                case.input,
                case.output,
                actual,
                verified.errors.len()
            );
            failed += 1;
        }
    }

    eprintln!(
        "\nTransform conformance: {} passed, {} failed out of {} total",
        passed,
        failed,
        cases.len()
    );

    assert_eq!(failed, 0, "{} transform conformance tests failed", failed);
}
