use crate::config::RuleEntry;
use crate::context::ValidationContext;
use crate::error::{ConfigurationError, ErrorMap, FormError, ValidationError};
use crate::execute::Executor;
use crate::host::HostFunctions;
use crate::message::{Catalog, Translator};
use crate::path;
use crate::tree::{FieldTree, build_tree};
use crate::types::{Declarations, Outcome, RuleChain, RuleDeclaration};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// How `verify` reports field failures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Failures come back inside [`Verified::errors`].
    #[default]
    Return,
    /// Failures come back as [`FormError::Validation`].
    Raise,
}

/// Outcome of a completed run: the (possibly rewritten) data and the errors.
#[derive(Clone, Debug, PartialEq)]
pub struct Verified {
    pub data: Value,
    pub errors: ErrorMap,
}

impl Verified {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A rule registry plus the collaborators a run needs.
///
/// Registration takes `&mut self`; `verify` takes `&self`, so one validator
/// can check any number of inputs, from any number of threads.
#[derive(Clone)]
pub struct FormValidation {
    declarations: Declarations,
    messages: HashMap<String, String>,
    translator: Arc<dyn Translator>,
    functions: HostFunctions,
}

impl Default for FormValidation {
    fn default() -> Self {
        FormValidation {
            declarations: Declarations::new(),
            messages: HashMap::new(),
            translator: Arc::new(Catalog::english()),
            functions: HostFunctions::standard(),
        }
    }
}

impl fmt::Debug for FormValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValidation")
            .field("declarations", &self.declarations)
            .field("messages", &self.messages)
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}

impl FormValidation {
    /// An empty validator with the English catalog and standard host functions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    /// Registers the chain for `field`, replacing any earlier registration
    /// of the same path. An empty `field` is ignored; an empty `label`
    /// defaults to the field path.
    pub fn set_rules(
        &mut self,
        field: &str,
        label: &str,
        rules: impl Into<RuleChain>,
    ) -> &mut Self {
        self.set_rules_with_errors(field, label, rules, HashMap::new())
    }

    /// Like [`set_rules`](Self::set_rules), with per-rule message overrides
    /// for this field.
    pub fn set_rules_with_errors(
        &mut self,
        field: &str,
        label: &str,
        rules: impl Into<RuleChain>,
        errors: HashMap<String, String>,
    ) -> &mut Self {
        if field.is_empty() {
            return self;
        }
        let label = if label.is_empty() { field } else { label };
        let key = path::canonical(field);
        debug!(field = %key, "registering rules");
        self.declarations.insert(RuleDeclaration {
            field: key,
            label: label.to_string(),
            rules: rules.into().into_vec(),
            errors,
        });
        self
    }

    /// Registers several fields. Entries without a field or a chain are
    /// skipped.
    pub fn set_rule_batch<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = RuleEntry>,
    {
        for entry in entries {
            let (Some(field), Some(rules)) = (entry.field, entry.rules) else {
                continue;
            };
            let label = entry.label.unwrap_or_default();
            self.set_rules_with_errors(&field, &label, rules, entry.errors);
        }
        self
    }

    /// Overrides the message template of `rule` for every field.
    pub fn set_error_message(&mut self, rule: &str, message: &str) -> &mut Self {
        self.messages.insert(rule.to_string(), message.to_string());
        self
    }

    pub fn set_error_messages<I, K, V>(&mut self, messages: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a host function that rule chains can name.
    pub fn register_function<F, R>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(&Value, Option<&str>) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        self.functions.register(name, move |v, p| f(v, p).into());
        self
    }

    pub fn has_rules(&self) -> bool {
        !self.declarations.is_empty()
    }

    pub fn has_rule(&self, field: &str) -> bool {
        self.declarations.contains(&path::canonical(field))
    }

    pub fn declaration(&self, field: &str) -> Option<&RuleDeclaration> {
        self.declarations.get(&path::canonical(field))
    }

    /// The field tree a run would execute.
    pub fn field_tree(&self) -> FieldTree {
        build_tree(&self.declarations)
    }

    /// Validates `data` against the registered rules.
    ///
    /// Returns the data with defaults and transforms applied, plus one error
    /// per failing field path.
    ///
    /// # Errors
    ///
    /// - [`FormError::Configuration`] when no rules are registered or a rule
    ///   name cannot be resolved.
    /// - [`FormError::Validation`] when `mode` is [`ErrorMode::Raise`] and at
    ///   least one field failed.
    pub fn verify(&self, data: Value, mode: ErrorMode) -> Result<Verified, FormError> {
        if self.declarations.is_empty() {
            return Err(ConfigurationError::no_rules().into());
        }

        let snapshot = data.clone();
        let tree = build_tree(&self.declarations);
        let executor = Executor {
            tree: &tree,
            context: ValidationContext::new(&snapshot),
            messages: &self.messages,
            translator: self.translator.as_ref(),
            functions: &self.functions,
            errors: ErrorMap::new(),
        };

        let mut data = data;
        let errors = executor.run(&mut data)?;
        debug!(errors = errors.len(), "validation finished");

        if mode == ErrorMode::Raise && !errors.is_empty() {
            return Err(ValidationError { errors }.into());
        }
        Ok(Verified { data, errors })
    }
}
