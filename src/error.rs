use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Error kind for configuration failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationErrorKind {
    /// `verify` was called before any rule was registered.
    NoRules,
    /// A rule name resolved to neither a built-in rule nor a host function.
    UnknownRule,
    /// A rule file or message catalog could not be deserialized.
    InvalidConfig,
}

/// A setup mistake. Never produced by bad input data, never recovered from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationError {
    pub kind: ConfigurationErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl ConfigurationError {
    pub(crate) fn no_rules() -> Self {
        ConfigurationError {
            kind: ConfigurationErrorKind::NoRules,
            message: "Unable to find validation rules".to_string(),
            field: None,
            rule: None,
        }
    }

    pub(crate) fn unknown_rule(field: &str, rule: &str) -> Self {
        ConfigurationError {
            kind: ConfigurationErrorKind::UnknownRule,
            message: format!("Unable to find validation rule: {}", rule),
            field: Some(field.to_string()),
            rule: Some(rule.to_string()),
        }
    }

    pub(crate) fn invalid_config(message: String) -> Self {
        ConfigurationError {
            kind: ConfigurationErrorKind::InvalidConfig,
            message,
            field: None,
            rule: None,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// One failed field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Fully instantiated path, e.g. `items[3][start_date]`.
    pub path: String,
    /// Name of the failing rule; `None` for an anonymous callback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered map from instantiated field path to its single error.
///
/// The first error recorded for a path wins; later inserts for the same path
/// are ignored. Serializes as a `{path: message}` object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<FieldError>,
    index: HashMap<String, usize>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` unless its path already has one. Returns whether it was kept.
    pub fn insert(&mut self, error: FieldError) -> bool {
        if self.index.contains_key(&error.path) {
            return false;
        }
        self.index.insert(error.path.clone(), self.entries.len());
        self.entries.push(error);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// The message recorded for `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.error(path).map(|e| e.message.as_str())
    }

    pub fn error(&self, path: &str) -> Option<&FieldError> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.entries.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.entries
    }
}

impl IntoIterator for ErrorMap {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorMap {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for e in &self.entries {
            map.serialize_entry(&e.path, &e.message)?;
        }
        map.end()
    }
}

/// Raised by `verify` in [`ErrorMode::Raise`](crate::ErrorMode::Raise) when
/// one or more fields failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: ErrorMap,
}

impl ValidationError {
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid form data ({} field(s) failed)", self.errors.len())
    }
}

impl std::error::Error for ValidationError {}

/// Combined error type for [`FormValidation::verify`](crate::FormValidation::verify).
#[derive(Clone, Debug)]
pub enum FormError {
    Configuration(ConfigurationError),
    Validation(ValidationError),
}

impl FormError {
    /// The error map, when this is a validation failure.
    pub fn errors(&self) -> Option<&ErrorMap> {
        match self {
            FormError::Validation(e) => Some(&e.errors),
            FormError::Configuration(_) => None,
        }
    }
}

impl From<ConfigurationError> for FormError {
    fn from(e: ConfigurationError) -> Self {
        FormError::Configuration(e)
    }
}

impl From<ValidationError> for FormError {
    fn from(e: ValidationError) -> Self {
        FormError::Validation(e)
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Configuration(e) => write!(f, "Configuration error: {}", e),
            FormError::Validation(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for FormError {}
