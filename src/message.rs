//! Localization and error message formatting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of localized lines.
///
/// `get` returns the translation, or the key itself when there is none; an
/// echoed key means "untranslated".
pub trait Translator: Send + Sync {
    fn get(&self, key: &str) -> String;
}

/// A flat key → line message catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    lines: HashMap<String, String>,
}

const ENGLISH: &[(&str, &str)] = &[
    ("form_validation_required", "The {field} field is required."),
    ("form_validation_isset", "The {field} field must have a value."),
    ("form_validation_empty", "The {field} field must be empty."),
    ("form_validation_valid_email", "The {field} field must contain a valid email address."),
    ("form_validation_valid_emails", "The {field} field must contain all valid email addresses."),
    ("form_validation_valid_url", "The {field} field must contain a valid URL."),
    ("form_validation_valid_ip", "The {field} field must contain a valid IP."),
    ("form_validation_valid_base64", "The {field} field must contain a valid Base64 string."),
    ("form_validation_min_length", "The {field} field must be at least {param} characters in length."),
    ("form_validation_max_length", "The {field} field cannot exceed {param} characters in length."),
    ("form_validation_exact_length", "The {field} field must be exactly {param} characters in length."),
    ("form_validation_alpha", "The {field} field may only contain alphabetical characters."),
    ("form_validation_alpha_numeric", "The {field} field may only contain alpha-numeric characters."),
    (
        "form_validation_alpha_numeric_spaces",
        "The {field} field may only contain alpha-numeric characters and spaces.",
    ),
    (
        "form_validation_alpha_dash",
        "The {field} field may only contain alpha-numeric characters, underscores, and dashes.",
    ),
    ("form_validation_numeric", "The {field} field must contain only numbers."),
    ("form_validation_is_numeric", "The {field} field must contain only numeric characters."),
    ("form_validation_integer", "The {field} field must contain an integer."),
    ("form_validation_regex_match", "The {field} field is not in the correct format."),
    ("form_validation_matches", "The {field} field does not match the {param} field."),
    ("form_validation_differs", "The {field} field must differ from the {param} field."),
    ("form_validation_is_natural", "The {field} field must only contain digits."),
    (
        "form_validation_is_natural_no_zero",
        "The {field} field must only contain digits and must be greater than zero.",
    ),
    ("form_validation_decimal", "The {field} field must contain a decimal number."),
    ("form_validation_less_than", "The {field} field must contain a number less than {param}."),
    (
        "form_validation_less_than_equal_to",
        "The {field} field must contain a number less than or equal to {param}.",
    ),
    ("form_validation_greater_than", "The {field} field must contain a number greater than {param}."),
    (
        "form_validation_greater_than_equal_to",
        "The {field} field must contain a number greater than or equal to {param}.",
    ),
    ("form_validation_in_list", "The {field} field must be one of: {param}."),
    ("form_validation_is_string", "The {field} field must be a string."),
    ("form_validation_is_array", "The {field} field must be an array."),
    ("form_validation_is_bool", "The {field} field must be a boolean."),
    ("form_validation_is_int", "The {field} field must be an integer."),
    ("form_validation_is_float", "The {field} field must be a floating point number."),
    ("form_validation_not_empty_str", "The {field} field must be a non-empty string."),
    ("form_validation_not_empty_array", "The {field} field must be a non-empty array."),
    (
        "form_validation_least_one_required",
        "At least one of the {field} field and the {param} field is required.",
    ),
    (
        "form_validation_max_length_gbk",
        "The {field} field cannot exceed {param} characters in length.",
    ),
    (
        "form_validation_min_length_gbk",
        "The {field} field must be at least {param} characters in length.",
    ),
    ("form_validation_date_later_than", "The {field} field must be later than {param}."),
    ("form_validation_date_before_than", "The {field} field must be earlier than {param}."),
    ("form_validation_valid_date", "The {field} field must contain a valid date."),
    (
        "form_validation_error_message_not_set",
        "Unable to access an error message corresponding to your field name {field}.",
    ),
];

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English lines.
    pub fn english() -> Self {
        ENGLISH.iter().copied().collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, line: impl Into<String>) -> Option<String> {
        self.lines.insert(key.into(), line.into())
    }

    /// Adds every line of `other`, replacing existing keys.
    pub fn merge(&mut self, other: Catalog) {
        self.lines.extend(other.lines);
    }

    pub fn line(&self, key: &str) -> Option<&str> {
        self.lines.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Catalog {
            lines: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Translator for Catalog {
    fn get(&self, key: &str) -> String {
        self.line(key).unwrap_or(key).to_string()
    }
}

/// Looks up `{group}_{name}`; falls back to `name` when untranslated.
pub fn language_line(translator: &dyn Translator, group: &str, name: &str) -> String {
    let key = format!("{}_{}", group, name);
    let line = translator.get(&key);
    if line == key { name.to_string() } else { line }
}

/// Fills a message template.
///
/// Templates containing `%s` take the label and the parameter positionally;
/// all others substitute `{field}` and `{param}`.
pub fn build_error_message(line: &str, field: &str, param: &str) -> String {
    if line.contains("%s") {
        let mut out = String::with_capacity(line.len() + field.len() + param.len());
        let mut args = [field, param].into_iter();
        let mut rest = line;
        while let Some(pos) = rest.find("%s") {
            out.push_str(&rest[..pos]);
            out.push_str(args.next().unwrap_or_default());
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        return out;
    }
    line.replace("{field}", field).replace("{param}", param)
}
