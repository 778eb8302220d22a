//! Rule invocation and error formatting.

use crate::error::{ConfigurationError, FieldError};
use crate::execute::Executor;
use crate::message::{build_error_message, language_line};
use crate::path;
use crate::primitives::{is_blank, value_to_string};
use crate::rules::{self, Builtin};
use crate::tree::FieldNode;
use crate::types::{Outcome, RuleSpec};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Named rules that still run on null, `""` and empty collections.
pub const SKIP_EMPTY_EXEMPT: [&str; 13] = [
    "required",
    "isset",
    "not_empty_str",
    "not_empty_array",
    "matches",
    "least_one_required",
    "default_value",
    "is_array",
    "is_bool",
    "is_string",
    "is_numeric",
    "is_int",
    "is_float",
];

/// Rules whose parameter names another field; the message shows that
/// field's label instead of its path.
pub const FIELD_PARAM_RULES: [&str; 5] = [
    "differs",
    "matches",
    "least_one_required",
    "date_later_than",
    "date_before_than",
];

impl Executor<'_> {
    /// Runs a chain against one value.
    ///
    /// Stops at the first failure, which is recorded at the path in
    /// `indexes`. Replacements are written back into `value`.
    pub(crate) fn run_chain(
        &mut self,
        node: &FieldNode,
        rules: &[RuleSpec],
        indexes: &[String],
        value: &mut Value,
    ) -> Result<bool, ConfigurationError> {
        for rule in rules {
            let outcome = match rule {
                RuleSpec::Callback(f) | RuleSpec::NamedCallback { callback: f, .. } => f(value),
                RuleSpec::Named { name, param } => {
                    if is_blank(value) && !SKIP_EMPTY_EXEMPT.contains(&name.as_str()) {
                        trace!(field = %node.path, rule = %name, "skipped on empty value");
                        continue;
                    }
                    self.invoke(&node.path, name, param.as_deref(), indexes, value)?
                }
            };

            match outcome {
                Outcome::Pass => {}
                Outcome::Replace(v) => *value = v,
                Outcome::Fail => {
                    trace!(field = %node.path, rule = %rule, "rule failed");
                    self.record_failure(node, rule, indexes);
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Resolves `name` against the built-in registry, then the host
    /// functions, and applies it.
    fn invoke(
        &mut self,
        field: &str,
        name: &str,
        param: Option<&str>,
        indexes: &[String],
        value: &Value,
    ) -> Result<Outcome, ConfigurationError> {
        if let Some(builtin) = rules::lookup(name) {
            return match builtin {
                Builtin::Plain(f) => Ok(f(value, param)),
                Builtin::CrossField(f) => Ok(f(value, &self.context, indexes, param)),
                Builtin::MatchThenRule => self.match_then_rule_other_field(field, value, indexes, param),
            };
        }

        if let Some(f) = self.functions.get(name) {
            trace!(field, rule = name, "resolved host function");
            return Ok(f(value, param));
        }

        debug!(field, rule = name, "unknown validation rule");
        Err(ConfigurationError::unknown_rule(field, name))
    }

    /// `match_then_rule_other_filed[expect,other,rule(,args)]`.
    ///
    /// When the current value reads as `expect`, `rule` is applied to the
    /// other field and a failure is recorded at the other field's resolved
    /// path. The current field always passes, unless fewer than three
    /// parameters were given.
    fn match_then_rule_other_field(
        &mut self,
        field: &str,
        value: &Value,
        indexes: &[String],
        param: Option<&str>,
    ) -> Result<Outcome, ConfigurationError> {
        let parts: Vec<&str> = param.unwrap_or_default().splitn(4, ',').collect();
        let &[expect, other_field, other_rule, ..] = parts.as_slice() else {
            return Ok(Outcome::Fail);
        };
        let args = parts.get(3).copied();

        if value_to_string(value) != expect {
            return Ok(Outcome::Pass);
        }

        let resolved = self.context.resolve_path(other_field, indexes);
        let other_value = path::lookup(self.context.data(), &resolved)
            .cloned()
            .unwrap_or(Value::Null);

        let outcome = self.invoke(field, other_rule, args, &resolved, &other_value)?;
        if !outcome.is_fail() {
            return Ok(Outcome::Pass);
        }

        let other_path = path::format(&resolved);
        if !self.errors.contains(&other_path) {
            let tree = self.tree;
            let declaration = tree.declarations.get(&path::canonical(other_field));
            let line = self.error_line(declaration.map(|d| &d.errors), other_rule);
            let label = declaration.map_or(other_field, |d| d.label.as_str());
            let label = language_line(self.translator, "form_label", label);
            let message = build_error_message(&line, &label, args.unwrap_or_default());
            debug!(field, other = %other_path, rule = other_rule, "dependent field failed");
            self.errors.insert(FieldError {
                path: other_path,
                rule: Some(other_rule.to_string()),
                message,
            });
        }
        Ok(Outcome::Pass)
    }

    /// Records the first failure for the instantiated path in `indexes`.
    fn record_failure(&mut self, node: &FieldNode, rule: &RuleSpec, indexes: &[String]) {
        let path = path::format(indexes);
        if self.errors.contains(&path) {
            return;
        }

        let name = rule.name();
        let line = match name {
            Some(name) => self.error_line(Some(&node.errors), name),
            None => format!(
                "{}(Anonymous function)",
                language_line(self.translator, "form_validation", "error_message_not_set")
            ),
        };

        let param = match (name, rule.param()) {
            (Some(name), Some(param)) if FIELD_PARAM_RULES.contains(&name) => {
                match self.tree.label(&path::canonical(param)) {
                    Some(label) => language_line(self.translator, "form_label", label),
                    None => param.to_string(),
                }
            }
            (_, param) => param.unwrap_or_default().to_string(),
        };

        let label = language_line(self.translator, "form_label", &node.label);
        let message = build_error_message(&line, &label, &param);
        self.errors.insert(FieldError {
            path,
            rule: name.map(str::to_string),
            message,
        });
    }

    /// Message template for `rule`: per-field override, global override,
    /// catalog line, then the "not set" fallback.
    fn error_line(&self, field_errors: Option<&HashMap<String, String>>, rule: &str) -> String {
        if let Some(line) = field_errors.and_then(|errors| errors.get(rule)) {
            return line.clone();
        }
        if let Some(line) = self.messages.get(rule) {
            return line.clone();
        }
        let line = language_line(self.translator, "form_validation", rule);
        if line != rule {
            return line;
        }
        format!(
            "{}({})",
            language_line(self.translator, "form_validation", "error_message_not_set"),
            rule
        )
    }
}
