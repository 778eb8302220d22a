//! Rule files and message catalogs.
//!
//! A rule file is either a bare list of entries or a mapping with `rules` and
//! an optional `messages` table of global overrides:
//!
//! ```yaml
//! rules:
//!   - field: user[name]
//!     label: Name
//!     rules: required|max_length_gbk[20]
//!   - field: user[tags][]
//!     rules: [required, alpha_dash]
//!     errors:
//!       alpha_dash: "{field} may only hold slugs."
//! messages:
//!   required: "{field} is missing."
//! ```
//!
//! Input is read into a [`serde_json::Value`] first (YAML via
//! `serde-saphyr`), then mapped onto the typed structures.

use crate::error::ConfigurationError;
use crate::message::Catalog;
use crate::types::RuleChain;
use crate::validator::FormValidation;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// One field's registration as read from a rule file.
///
/// `field` and `rules` are optional so incomplete entries can be skipped
/// rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub rules: Option<RuleChain>,
    #[serde(default)]
    pub errors: HashMap<String, String>,
}

impl RuleEntry {
    pub fn new(field: &str, rules: impl Into<RuleChain>) -> Self {
        RuleEntry {
            field: Some(field.to_string()),
            rules: Some(rules.into()),
            ..Default::default()
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn error(mut self, rule: &str, message: &str) -> Self {
        self.errors.insert(rule.to_string(), message.to_string());
        self
    }
}

/// A deserialized rule file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl RuleSet {
    /// Reads a rule set from YAML.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for empty input, malformed YAML, or a document that
    /// is neither a list of entries nor a `rules`/`messages` mapping.
    pub fn from_yaml(input: &str) -> Result<RuleSet, ConfigurationError> {
        RuleSet::from_value(read_yaml(input, "rule set")?)
    }

    /// Reads a rule set from JSON.
    pub fn from_json(input: &str) -> Result<RuleSet, ConfigurationError> {
        RuleSet::from_value(read_json(input, "rule set")?)
    }

    pub fn from_value(value: Value) -> Result<RuleSet, ConfigurationError> {
        match value {
            Value::Array(_) => Ok(RuleSet {
                rules: typed(value, "rule set")?,
                messages: HashMap::new(),
            }),
            Value::Object(_) => typed(value, "rule set"),
            other => Err(ConfigurationError::invalid_config(format!(
                "rule set must be a list or a mapping, got {}",
                kind_name(&other)
            ))),
        }
    }

    /// Registers every entry and message on `validation`.
    pub fn apply(self, validation: &mut FormValidation) {
        validation.set_rule_batch(self.rules);
        validation.set_error_messages(self.messages);
    }
}

impl Catalog {
    /// Reads a flat `key: line` catalog from YAML.
    pub fn from_yaml(input: &str) -> Result<Catalog, ConfigurationError> {
        typed(read_yaml(input, "message catalog")?, "message catalog")
    }

    pub fn from_json(input: &str) -> Result<Catalog, ConfigurationError> {
        typed(read_json(input, "message catalog")?, "message catalog")
    }
}

impl FormValidation {
    /// A validator with the English catalog, set up from a YAML rule file.
    pub fn from_yaml(input: &str) -> Result<FormValidation, ConfigurationError> {
        Ok(FormValidation::from_rule_set(RuleSet::from_yaml(input)?))
    }

    pub fn from_json(input: &str) -> Result<FormValidation, ConfigurationError> {
        Ok(FormValidation::from_rule_set(RuleSet::from_json(input)?))
    }

    pub fn from_rule_set(set: RuleSet) -> FormValidation {
        let mut validation = FormValidation::new();
        set.apply(&mut validation);
        validation
    }
}

fn read_yaml(input: &str, what: &str) -> Result<Value, ConfigurationError> {
    if input.trim().is_empty() {
        return Err(ConfigurationError::invalid_config(format!("empty {}", what)));
    }
    serde_saphyr::from_str(input).map_err(|e| {
        ConfigurationError::invalid_config(format!("invalid YAML {}: {}", what, e))
    })
}

fn read_json(input: &str, what: &str) -> Result<Value, ConfigurationError> {
    if input.trim().is_empty() {
        return Err(ConfigurationError::invalid_config(format!("empty {}", what)));
    }
    serde_json::from_str(input).map_err(|e| {
        ConfigurationError::invalid_config(format!("invalid JSON {}: {}", what, e))
    })
}

fn typed<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ConfigurationError> {
    serde_json::from_value(value)
        .map_err(|e| ConfigurationError::invalid_config(format!("invalid {}: {}", what, e)))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
