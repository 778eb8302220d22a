use form_validation::normalize::{PRESENCE_RULES, TYPE_GUARD_RULES, has_type_guard, normalize_rules};
use form_validation::{Outcome, RuleSpec};
use proptest::prelude::*;

/// Strategy for one rule of a declared chain.
fn arb_rule() -> impl Strategy<Value = RuleSpec> {
    prop_oneof![
        prop::sample::select(vec![
            "required",
            "isset",
            "not_empty_str",
            "not_empty_array",
            "is_string",
            "is_array",
            "is_bool",
            "is_numeric",
            "is_int",
            "is_float",
            "alpha",
            "trim",
            "valid_email",
        ])
        .prop_map(RuleSpec::named),
        ("[a-z0-9]{1,4}").prop_map(|p| RuleSpec::with_param("default_value", &p)),
        ("[a-z]{1,4}").prop_map(|p| RuleSpec::with_param("least_one_required", &p)),
        ("[0-9]{1,2}").prop_map(|p| RuleSpec::with_param("max_length", &p)),
        Just(RuleSpec::callback(|_: &serde_json::Value| Outcome::Pass)),
        Just(RuleSpec::named_callback("check", |_: &serde_json::Value| true)),
    ]
}

fn arb_chain() -> impl Strategy<Value = Vec<RuleSpec>> {
    prop::collection::vec(arb_rule(), 0..12)
}

proptest! {
    #[test]
    fn normalization_is_idempotent(chain in arb_chain()) {
        let once = normalize_rules(&chain);
        let twice = normalize_rules(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_chain_always_has_a_type_guard(chain in arb_chain()) {
        prop_assert!(has_type_guard(&normalize_rules(&chain)));
    }

    #[test]
    fn implicit_guard_equals_explicit_is_string(chain in arb_chain()) {
        prop_assume!(!has_type_guard(&chain));
        let mut explicit = chain.clone();
        explicit.push(RuleSpec::named("is_string"));
        prop_assert_eq!(normalize_rules(&chain), normalize_rules(&explicit));
    }

    #[test]
    fn callbacks_come_first(chain in arb_chain()) {
        let normalized = normalize_rules(&chain);
        let first_named = normalized.iter().position(|r| !r.is_callback()).unwrap_or(normalized.len());
        prop_assert!(normalized[first_named..].iter().all(|r| !r.is_callback()));
        let callbacks = chain.iter().filter(|r| r.is_callback()).count();
        prop_assert_eq!(first_named, callbacks);
    }

    #[test]
    fn guard_group_names_appear_once(chain in arb_chain()) {
        let normalized = normalize_rules(&chain);
        for name in PRESENCE_RULES.iter().chain(TYPE_GUARD_RULES.iter()) {
            let count = normalized.iter().filter(|r| r.is_named(name)).count();
            prop_assert!(count <= 1, "{} appears {} times", name, count);
        }
        for name in ["default_value", "least_one_required"] {
            let count = normalized.iter().filter(|r| r.is_named(name)).count();
            prop_assert!(count <= 1, "{} appears {} times", name, count);
        }
    }

    #[test]
    fn last_parameterized_declaration_wins(a in "[a-z]{1,4}", b in "[a-z]{1,4}") {
        let chain = vec![
            RuleSpec::with_param("default_value", &a),
            RuleSpec::named("alpha"),
            RuleSpec::with_param("default_value", &b),
        ];
        let normalized = normalize_rules(&chain);
        let defaults: Vec<&RuleSpec> = normalized.iter().filter(|r| r.is_named("default_value")).collect();
        prop_assert_eq!(defaults.len(), 1);
        prop_assert_eq!(defaults[0].param(), Some(b.as_str()));
    }

    #[test]
    fn default_value_precedes_type_guards(chain in arb_chain()) {
        let normalized = normalize_rules(&chain);
        if let Some(default_at) = normalized.iter().position(|r| r.is_named("default_value")) {
            for name in TYPE_GUARD_RULES {
                if let Some(guard_at) = normalized.iter().position(|r| r.is_named(name)) {
                    prop_assert!(default_at < guard_at, "default_value after {}", name);
                }
            }
        }
    }
}
