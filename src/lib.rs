//! Declarative, rule-driven validation of nested form and JSON data.
//!
//! Rules are registered per field path (`user[address][city]`, `tags[]`) as
//! chains of named checks, parameterized checks, cross-field references and
//! callbacks. A run walks the data in lock-step with the declared field
//! tree, applies each chain, writes defaults and transforms back into the
//! data, and collects one message per failing path:
//!
//! ```text
//! set_rules(path, label, chain) → build_tree → execute(data) → Verified { data, errors }
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use form_validation::{ErrorMode, FormValidation};
//! use serde_json::json;
//!
//! let mut v = FormValidation::new();
//! v.set_rules("id", "ID", "required|is_array")
//!     .set_rules("id[]", "ID", "required|alpha_numeric")
//!     .set_rules("page", "Page", "default_value[1]");
//!
//! let out = v.verify(json!({"id": ["a", "b!"]}), ErrorMode::Return).unwrap();
//! assert_eq!(out.data["page"], json!("1"));
//! assert_eq!(
//!     out.errors.get("id[1]"),
//!     Some("The ID field may only contain alpha-numeric characters.")
//! );
//! ```
//!
//! Rule sets can also be loaded from YAML or JSON, see [`config`].

pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod message;
pub mod normalize;
pub mod path;
pub mod primitives;
pub mod rules;
pub mod tree;
pub mod types;
pub mod upload;
pub mod validator;

pub(crate) mod execute;
pub(crate) mod invoke;

pub use error::*;
pub use types::*;

pub use config::{RuleEntry, RuleSet};
pub use context::ValidationContext;
pub use host::HostFunctions;
pub use message::{Catalog, Translator};
pub use upload::restructure_files;
pub use validator::{ErrorMode, FormValidation, Verified};

/// Convenience entry point: builds a validator from a YAML rule file.
///
/// # Errors
///
/// Returns an `InvalidConfig` [`ConfigurationError`] when the file cannot be
/// read as a rule set.
///
/// # Example
///
/// ```rust
/// let yaml = r#"
/// - field: email
///   label: Email
///   rules: required|valid_email
/// "#;
///
/// let v = form_validation::load(yaml).expect("valid rule file");
/// let out = v
///     .verify(serde_json::json!({"email": "nope"}), form_validation::ErrorMode::Return)
///     .unwrap();
/// assert!(!out.is_valid());
/// ```
pub fn load(input: &str) -> Result<FormValidation, ConfigurationError> {
    FormValidation::from_yaml(input)
}
