use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ─── Outcome ────────────────────────────────────────────────────────────────

/// Result of applying one rule to one value.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Pass,
    Fail,
    /// The rule passed and the value is replaced from here on.
    Replace(Value),
}

impl Outcome {
    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail)
    }
}

impl From<bool> for Outcome {
    fn from(b: bool) -> Self {
        if b { Outcome::Pass } else { Outcome::Fail }
    }
}

/// A JSON boolean is a verdict; any other value is a replacement.
impl From<Value> for Outcome {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => b.into(),
            other => Outcome::Replace(other),
        }
    }
}

// ─── RuleSpec ───────────────────────────────────────────────────────────────

/// A caller-supplied check or transform.
pub type CallbackFn = Arc<dyn Fn(&Value) -> Outcome + Send + Sync>;

/// One entry of a field's rule chain.
#[derive(Clone)]
pub enum RuleSpec {
    /// A built-in rule or host function, with an optional raw parameter.
    Named { name: String, param: Option<String> },
    /// Anonymous callback. Failures report "(Anonymous function)".
    Callback(CallbackFn),
    /// Callback whose failures are reported (and messaged) under `name`.
    NamedCallback { name: String, callback: CallbackFn },
}

impl RuleSpec {
    /// Parses one legacy rule token: `name` or `name[param]`.
    ///
    /// The parameter runs from the first `[` to the last `]`, so parameters
    /// may themselves contain brackets (`regex_match[/^[a-z]+$/]`).
    pub fn parse(rule: &str) -> RuleSpec {
        if let Some(open) = rule.find('[')
            && let Some(close) = rule.rfind(']')
            && close > open
        {
            return RuleSpec::Named {
                name: rule[..open].to_string(),
                param: Some(rule[open + 1..close].to_string()),
            };
        }
        RuleSpec::Named {
            name: rule.to_string(),
            param: None,
        }
    }

    pub fn named(name: &str) -> RuleSpec {
        RuleSpec::Named {
            name: name.to_string(),
            param: None,
        }
    }

    pub fn with_param(name: &str, param: &str) -> RuleSpec {
        RuleSpec::Named {
            name: name.to_string(),
            param: Some(param.to_string()),
        }
    }

    pub fn callback<F, R>(f: F) -> RuleSpec
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        RuleSpec::Callback(Arc::new(move |v| f(v).into()))
    }

    pub fn named_callback<F, R>(name: &str, f: F) -> RuleSpec
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        RuleSpec::NamedCallback {
            name: name.to_string(),
            callback: Arc::new(move |v| f(v).into()),
        }
    }

    /// Rule name; `None` for anonymous callbacks.
    pub fn name(&self) -> Option<&str> {
        match self {
            RuleSpec::Named { name, .. } | RuleSpec::NamedCallback { name, .. } => Some(name),
            RuleSpec::Callback(_) => None,
        }
    }

    pub fn param(&self) -> Option<&str> {
        match self {
            RuleSpec::Named { param, .. } => param.as_deref(),
            _ => None,
        }
    }

    pub fn is_callback(&self) -> bool {
        !matches!(self, RuleSpec::Named { .. })
    }

    /// True for a named rule called `name`, with or without a parameter.
    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, RuleSpec::Named { name: n, .. } if n == name)
    }
}

impl PartialEq for RuleSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                RuleSpec::Named { name: a, param: pa },
                RuleSpec::Named { name: b, param: pb },
            ) => a == b && pa == pb,
            (RuleSpec::Callback(a), RuleSpec::Callback(b)) => Arc::ptr_eq(a, b),
            (
                RuleSpec::NamedCallback { name: a, callback: ca },
                RuleSpec::NamedCallback { name: b, callback: cb },
            ) => a == b && Arc::ptr_eq(ca, cb),
            _ => false,
        }
    }
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSpec::Named { .. } => write!(f, "Named({})", self),
            RuleSpec::Callback(_) => write!(f, "Callback"),
            RuleSpec::NamedCallback { name, .. } => write!(f, "NamedCallback({})", name),
        }
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSpec::Named { name, param: Some(p) } => write!(f, "{}[{}]", name, p),
            RuleSpec::Named { name, param: None } => write!(f, "{}", name),
            RuleSpec::Callback(_) => write!(f, "(Anonymous function)"),
            RuleSpec::NamedCallback { name, .. } => write!(f, "{}", name),
        }
    }
}

// ─── RuleChain ──────────────────────────────────────────────────────────────

/// An ordered rule chain as supplied at registration.
///
/// Converts from a structured list or from a legacy pipe-delimited string
/// (`"required|max_length_gbk[20]"`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleChain(pub Vec<RuleSpec>);

impl RuleChain {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<RuleSpec> {
        self.0
    }
}

/// Splits a legacy rule string on `|` characters that are not inside a
/// bracketed parameter. Empty pieces are dropped.
pub fn split_rule_string(rules: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in rules.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '|' if depth == 0 => {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

impl From<&str> for RuleChain {
    fn from(rules: &str) -> Self {
        RuleChain(
            split_rule_string(rules)
                .iter()
                .map(|r| RuleSpec::parse(r))
                .collect(),
        )
    }
}

impl From<String> for RuleChain {
    fn from(rules: String) -> Self {
        RuleChain::from(rules.as_str())
    }
}

impl From<Vec<RuleSpec>> for RuleChain {
    fn from(rules: Vec<RuleSpec>) -> Self {
        RuleChain(rules)
    }
}

impl From<Vec<&str>> for RuleChain {
    fn from(rules: Vec<&str>) -> Self {
        RuleChain(rules.into_iter().map(RuleSpec::parse).collect())
    }
}

impl From<Vec<String>> for RuleChain {
    fn from(rules: Vec<String>) -> Self {
        RuleChain(rules.iter().map(|r| RuleSpec::parse(r)).collect())
    }
}

impl From<RuleSpec> for RuleChain {
    fn from(rule: RuleSpec) -> Self {
        RuleChain(vec![rule])
    }
}

/// Accepts either `"a|b[1]"` or `["a", "b[1]"]`.
impl<'de> Deserialize<'de> for RuleChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(s) => Ok(RuleChain::from(s)),
            Value::Array(items) => {
                let mut rules = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => rules.push(RuleSpec::parse(&s)),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "rule must be a string, got {}",
                                other
                            )));
                        }
                    }
                }
                Ok(RuleChain(rules))
            }
            _ => Err(serde::de::Error::custom(
                "rules must be a string or a list of strings",
            )),
        }
    }
}

// ─── RuleDeclaration ────────────────────────────────────────────────────────

/// Rules registered for one field path.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleDeclaration {
    pub field: String,
    pub label: String,
    pub rules: Vec<RuleSpec>,
    /// Per-field message overrides keyed by rule name.
    pub errors: HashMap<String, String>,
}

/// Registration-ordered declarations, unique by field path.
#[derive(Clone, Debug, Default)]
pub struct Declarations {
    entries: Vec<RuleDeclaration>,
    index: HashMap<String, usize>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces. A replaced path keeps its original position.
    pub fn insert(&mut self, decl: RuleDeclaration) {
        match self.index.get(&decl.field) {
            Some(&i) => self.entries[i] = decl,
            None => {
                self.index.insert(decl.field.clone(), self.entries.len());
                self.entries.push(decl);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&RuleDeclaration> {
        self.index.get(field).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut RuleDeclaration> {
        match self.index.get(field) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleDeclaration> {
        self.entries.iter()
    }
}
