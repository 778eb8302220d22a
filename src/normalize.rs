use crate::types::RuleSpec;

/// Presence gates, in canonical order.
pub const PRESENCE_RULES: [&str; 4] = ["required", "isset", "not_empty_str", "not_empty_array"];

/// Type guards, in canonical order.
pub const TYPE_GUARD_RULES: [&str; 6] = [
    "is_string",
    "is_array",
    "is_bool",
    "is_numeric",
    "is_int",
    "is_float",
];

/// Parameterized rules that join the guard group, in canonical order.
pub const PARAMETERIZED_GUARD_RULES: [&str; 2] = ["default_value", "least_one_required"];

enum Slot {
    Callback,
    Presence(usize),
    TypeGuard(usize),
    Parameterized(usize),
    Rest,
}

fn classify(rule: &RuleSpec) -> Slot {
    match rule {
        RuleSpec::Callback(_) | RuleSpec::NamedCallback { .. } => Slot::Callback,
        RuleSpec::Named { name, param: None } => {
            if let Some(i) = PRESENCE_RULES.iter().position(|r| r == name) {
                Slot::Presence(i)
            } else if let Some(i) = TYPE_GUARD_RULES.iter().position(|r| r == name) {
                Slot::TypeGuard(i)
            } else {
                Slot::Rest
            }
        }
        RuleSpec::Named {
            name,
            param: Some(_),
        } => match PARAMETERIZED_GUARD_RULES.iter().position(|r| r == name) {
            Some(i) => Slot::Parameterized(i),
            None => Slot::Rest,
        },
    }
}

/// Reorders a rule chain into execution order.
///
/// 1. callbacks, verbatim, in declaration order;
/// 2. presence gates, then `default_value[..]`, then type guards, then
///    `least_one_required[..]`, each at most once and in canonical order
///    (for the parameterized pair the last declaration wins);
/// 3. everything else in declaration order.
///
/// The default fills an empty value before any type guard sees it.
///
/// When no type guard is declared, `is_string` is added. This is idempotent:
/// `normalize_rules(&normalize_rules(r)) == normalize_rules(r)`.
pub fn normalize_rules(rules: &[RuleSpec]) -> Vec<RuleSpec> {
    let mut callbacks = Vec::new();
    let mut presence = [false; PRESENCE_RULES.len()];
    let mut guards = [false; TYPE_GUARD_RULES.len()];
    let mut parameterized: [Option<&RuleSpec>; PARAMETERIZED_GUARD_RULES.len()] = [None, None];
    let mut rest = Vec::new();

    for rule in rules {
        match classify(rule) {
            Slot::Callback => callbacks.push(rule.clone()),
            Slot::Presence(i) => presence[i] = true,
            Slot::TypeGuard(i) => guards[i] = true,
            Slot::Parameterized(i) => parameterized[i] = Some(rule),
            Slot::Rest => rest.push(rule.clone()),
        }
    }

    if !guards.iter().any(|g| *g) {
        guards[0] = true;
    }

    let mut out = callbacks;
    for (i, name) in PRESENCE_RULES.iter().enumerate() {
        if presence[i] {
            out.push(RuleSpec::named(name));
        }
    }
    let [default_value, least_one_required] = parameterized;
    out.extend(default_value.cloned());
    for (i, name) in TYPE_GUARD_RULES.iter().enumerate() {
        if guards[i] {
            out.push(RuleSpec::named(name));
        }
    }
    out.extend(least_one_required.cloned());
    out.extend(rest);
    out
}

/// True if the chain declares any type guard.
pub fn has_type_guard(rules: &[RuleSpec]) -> bool {
    rules
        .iter()
        .any(|r| matches!(r, RuleSpec::Named { name, param: None } if TYPE_GUARD_RULES.contains(&name.as_str())))
}
