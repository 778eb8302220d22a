use super::common::{load_suite, validator_from, values_structurally_equal};
use form_validation::ErrorMode;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, serde::Deserialize)]
struct VerifyCase {
    id: String,
    name: String,
    rules: Value,
    input: Value,
    errors: Vec<String>,
    #[serde(default)]
    messages: BTreeMap<String, String>,
    #[serde(default)]
    data: Option<Value>,
}

#[test]
fn verify_conformance_suite() {
    let cases: Vec<VerifyCase> = load_suite("verify.yaml");

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        let validator = validator_from(&case.rules);
        let verified = match validator.verify(case.input.clone(), ErrorMode::Return) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("  FAIL [{}] {}: verify error: {}", case.id, case.name, e);
                failed += 1;
                continue;
            }
        };

        let mut problems = Vec::new();

        let mut actual_paths: Vec<&str> = verified.errors.paths();
        actual_paths.sort_unstable();
        let mut expected_paths: Vec<&str> = case.errors.iter().map(String::as_str).collect();
        expected_paths.sort_unstable();
        if actual_paths != expected_paths {
            problems.push(format!(
                "error paths: expected {:?}, got {:?}",
                expected_paths, actual_paths
            ));
        }

        for (path, message) in &case.messages {
            let actual = verified.errors.get(path);
            if actual != Some(message.as_str()) {
                problems.push(format!(
                    "message at {}: expected {:?}, got {:?}",
                    path, message, actual
                ));
            }
        }

        if let Some(expected) = &case.data
            && !values_structurally_equal(&verified.data, expected)
        {
            problems.push(format!(
                "data: expected {}, got {}",
                serde_json::to_string(expected).unwrap(),
                serde_json::to_string(&verified.data).unwrap()
            ));
        }

        if problems.is_empty() {
            passed += 1;
        } else {
            eprintln!("  FAIL [{}] {}", case.id, case.name);
            for p in &problems {
                eprintln!("    {}", p);
            }
            failed += 1;
        }
    }

    eprintln!(
        "\nVerify conformance: {} passed, {} failed out of {} total",
        passed,
        failed,
        cases.len()
    );

    assert_eq!(failed, 0, "{} verify conformance tests failed", failed);
}

#[test]
fn raise_mode_matches_return_mode() {
    let cases: Vec<VerifyCase> = load_suite("verify.yaml");

    for case in &cases {
        let validator = validator_from(&case.rules);
        let returned = validator
            .verify(case.input.clone(), ErrorMode::Return)
            .unwrap();
        let raised = validator.verify(case.input.clone(), ErrorMode::Raise);

        match raised {
            Ok(v) => {
                assert!(returned.is_valid(), "[{}] raise passed but return had errors", case.id);
                assert_eq!(v, returned, "[{}] outputs differ", case.id);
            }
            Err(e) => {
                let errors = e.errors().expect("raise mode only fails with a validation error");
                assert_eq!(errors, &returned.errors, "[{}] error maps differ", case.id);
            }
        }
    }
}
