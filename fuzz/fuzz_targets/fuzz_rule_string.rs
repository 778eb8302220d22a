#![no_main]

use form_validation::RuleChain;
use form_validation::normalize::normalize_rules;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let chain = RuleChain::from(data);
    let once = normalize_rules(&chain.0);
    let twice = normalize_rules(&once);
    assert_eq!(once, twice);
});
