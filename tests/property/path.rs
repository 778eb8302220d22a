use form_validation::path::{format, lookup, parse, resolve_wildcards};
use proptest::prelude::*;
use serde_json::Value;

/// Segments of a declarable path: a non-empty head, then keys or wildcards.
fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    (
        "[a-z][a-z0-9_]{0,5}",
        prop::collection::vec(prop_oneof![Just(String::new()), "[a-z0-9_]{1,5}"], 0..4),
    )
        .prop_map(|(head, rest)| {
            let mut segments = vec![head];
            segments.extend(rest);
            segments
        })
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z0-9]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn format_then_parse_round_trips(segments in arb_segments()) {
        prop_assert_eq!(parse(&format(&segments)), segments);
    }

    #[test]
    fn parse_never_returns_empty(path in ".{0,24}") {
        prop_assert!(!parse(&path).is_empty());
    }

    #[test]
    fn resolution_keeps_length(segments in arb_segments(), context in prop::collection::vec("[a-z0-9]{1,3}", 0..5)) {
        let resolved = resolve_wildcards(&segments, &context);
        prop_assert_eq!(resolved.len(), segments.len());
    }

    #[test]
    fn single_segment_context_never_substitutes(segments in arb_segments(), key in "[a-z0-9]{1,3}") {
        prop_assert_eq!(resolve_wildcards(&segments, &[key]), segments);
    }

    #[test]
    fn wildcards_take_matching_context_segments(head in "[a-z]{1,4}", index in 0usize..10, leaf in "[a-z]{1,4}") {
        let pattern = vec![head.clone(), String::new(), leaf.clone()];
        let context = vec![head.clone(), index.to_string(), "other".to_string()];
        prop_assert_eq!(
            resolve_wildcards(&pattern, &context),
            vec![head, index.to_string(), leaf]
        );
    }

    #[test]
    fn lookup_never_panics(tree in arb_json(), segments in prop::collection::vec("[a-z0-9]{0,3}", 0..5)) {
        let _ = lookup(&tree, &segments);
    }

    #[test]
    fn lookup_finds_what_was_placed(key in "[a-z]{1,4}", index in 0usize..4, value in "[a-z]{1,6}") {
        let mut items = vec![Value::Null; index + 1];
        items[index] = serde_json::json!({ "leaf": value.clone() });
        let mut root = serde_json::Map::new();
        root.insert(key.clone(), Value::Array(items));
        let tree = Value::Object(root);
        let segments = vec![key, index.to_string(), "leaf".to_string()];
        prop_assert_eq!(lookup(&tree, &segments), Some(&Value::String(value)));
    }
}
