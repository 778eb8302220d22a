#![no_main]

use form_validation::path::{canonical, format, lookup, parse, resolve_wildcards};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split between the path and the JSON tree.
    let split = data[0] as usize % data.len().max(1);
    let (path_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let path = String::from_utf8_lossy(path_bytes);
    let segments = parse(&path);
    let _ = format(&segments);
    assert_eq!(canonical(&canonical(&path)), canonical(&path));

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(value_bytes) {
        let _ = lookup(&value, &segments);
        let context = vec!["a".to_string(), "0".to_string(), "b".to_string()];
        let resolved = resolve_wildcards(&segments, &context);
        assert_eq!(resolved.len(), segments.len());
        let _ = lookup(&value, &resolved);
    }
});
