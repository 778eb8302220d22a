use form_validation::{ErrorMode, FormValidation};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::BTreeSet;

/// Chains built from rules that need no other field.
fn arb_plain_chain() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "required",
            "min_length[2]",
            "max_length[5]",
            "alpha",
            "numeric",
            "integer",
            "trim",
            "strtoupper",
            "valid_email",
            "in_list[a,b,ab]",
            "default_value[x]",
        ]),
        0..5,
    )
    .prop_map(|rules| rules.join("|"))
}

proptest! {
    #[test]
    fn required_fields_fail_on_empty_input(fields in prop::collection::btree_set("[a-z]{1,8}", 1..6)) {
        let mut v = FormValidation::new();
        for field in &fields {
            v.set_rules(field, "", "required");
        }
        let out = v.verify(json!({}), ErrorMode::Return).unwrap();
        let paths: BTreeSet<String> = out.errors.paths().into_iter().map(str::to_string).collect();
        prop_assert_eq!(paths, fields);
    }

    #[test]
    fn wildcard_errors_only_at_empty_elements(elements in prop::collection::vec(prop_oneof![Just(String::new()), "[a-z]{1,5}"], 1..8)) {
        let mut v = FormValidation::new();
        v.set_rules("id", "ID", "required|is_array").set_rules("id[]", "ID", "required");

        let out = v.verify(json!({ "id": elements.clone() }), ErrorMode::Return).unwrap();
        let expected: Vec<String> = elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_empty())
            .map(|(i, _)| format!("id[{}]", i))
            .collect();
        prop_assert_eq!(out.errors.paths(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(&out.data["id"], &json!(elements));
    }

    #[test]
    fn absent_key_takes_the_default(field in "[a-z]{1,8}", default in "[a-zA-Z0-9]{1,10}") {
        let mut v = FormValidation::new();
        v.set_rules(&field, "", format!("default_value[{}]", default));
        let out = v.verify(json!({}), ErrorMode::Return).unwrap();
        prop_assert!(out.is_valid());
        prop_assert_eq!(&out.data[field.as_str()], &Value::String(default));
    }

    #[test]
    fn absent_key_takes_a_numeric_default_under_any_guard(
        field in "[a-z]{1,8}",
        default in "[1-9][0-9]{0,5}",
        guard in prop::sample::select(vec!["is_string", "is_numeric"]),
    ) {
        let mut v = FormValidation::new();
        v.set_rules(&field, "", format!("{}|default_value[{}]|integer", guard, default));
        let out = v.verify(json!({}), ErrorMode::Return).unwrap();
        prop_assert!(out.is_valid());
        prop_assert_eq!(&out.data[field.as_str()], &Value::String(default));
    }

    #[test]
    fn explicit_is_string_changes_nothing(chain in arb_plain_chain(), value in prop_oneof![
        "[a-zA-Z0-9@. ]{0,8}".prop_map(Value::String),
        any::<i32>().prop_map(Value::from),
        Just(Value::Null),
    ]) {
        let mut implicit = FormValidation::new();
        implicit.set_rules("f", "F", chain.as_str());
        let mut explicit = FormValidation::new();
        explicit.set_rules("f", "F", format!("{}|is_string", chain));

        let input = json!({ "f": value });
        let a = implicit.verify(input.clone(), ErrorMode::Return).unwrap();
        let b = explicit.verify(input, ErrorMode::Return).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn undeclared_keys_are_untouched(extra in prop::collection::btree_map("[A-Z]{1,4}", "[a-z]{0,4}", 0..5)) {
        let mut v = FormValidation::new();
        v.set_rules("name", "", "trim");
        let mut input = serde_json::Map::new();
        input.insert("name".to_string(), json!(" n "));
        for (k, val) in &extra {
            input.insert(k.clone(), json!(val));
        }
        let out = v.verify(Value::Object(input), ErrorMode::Return).unwrap();
        prop_assert_eq!(&out.data["name"], &json!("n"));
        for (k, val) in &extra {
            prop_assert_eq!(&out.data[k.as_str()], &json!(val));
        }
    }
}
