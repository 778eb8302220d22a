#![no_main]

use arbitrary::Arbitrary;
use form_validation::{ErrorMode, FormError, FormValidation};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    fields: Vec<(String, String)>,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(data) = serde_json::from_slice::<serde_json::Value>(&input.data) else {
        return;
    };

    let mut v = FormValidation::new();
    for (field, rules) in &input.fields {
        v.set_rules(field, "", rules.as_str());
    }

    match v.verify(data, ErrorMode::Return) {
        Ok(_) | Err(FormError::Configuration(_)) => {}
        Err(FormError::Validation(_)) => panic!("Return mode never raises"),
    }
});
