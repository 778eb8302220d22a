//! Recursive co-traversal of the field tree and the data tree.

use crate::context::ValidationContext;
use crate::error::{ConfigurationError, ErrorMap};
use crate::host::HostFunctions;
use crate::message::Translator;
use crate::primitives::{from_entries, into_entries, is_collection};
use crate::tree::{FieldNode, FieldTree};
use crate::types::RuleSpec;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::trace;

/// Rules that still run when the field's key is missing from the data.
pub const ABSENT_KEY_RULES: [&str; 4] = ["required", "isset", "matches", "least_one_required"];

/// State of one validation run.
pub(crate) struct Executor<'a> {
    pub(crate) tree: &'a FieldTree,
    pub(crate) context: ValidationContext<'a>,
    pub(crate) messages: &'a HashMap<String, String>,
    pub(crate) translator: &'a dyn Translator,
    pub(crate) functions: &'a HostFunctions,
    pub(crate) errors: ErrorMap,
}

impl<'a> Executor<'a> {
    /// Validates `data` in place and returns the collected errors.
    pub(crate) fn run(mut self, data: &mut Value) -> Result<ErrorMap, ConfigurationError> {
        let tree = self.tree;
        let mut indexes = Vec::new();
        self.execute(&tree.roots, data, &mut indexes)?;
        Ok(self.errors)
    }

    /// Runs `nodes` against one level of the data.
    ///
    /// Declared keys are validated and moved into an accumulator; the level
    /// is rebuilt as the accumulator followed by the keys no node claimed.
    fn execute(
        &mut self,
        nodes: &[FieldNode],
        data: &mut Value,
        indexes: &mut Vec<String>,
    ) -> Result<(), ConfigurationError> {
        let (mut remaining, shape) = into_entries(std::mem::take(data));
        let mut store = Map::new();

        for node in nodes {
            if node.rules.is_empty() {
                continue;
            }

            if node.is_wildcard() {
                for (key, value) in remaining.iter_mut() {
                    indexes.push(key.clone());
                    let passed = self.run_chain(node, &node.rules, indexes, value)?;
                    if passed && !node.children.is_empty() && is_collection(value) {
                        self.execute(&node.children, value, indexes)?;
                    }
                    indexes.pop();
                }
                continue;
            }

            indexes.push(node.segment.clone());
            match remaining.shift_remove(&node.segment) {
                Some(mut value) => {
                    let passed = self.run_chain(node, &node.rules, indexes, &mut value)?;
                    if passed && !node.children.is_empty() && is_collection(&value) {
                        self.execute(&node.children, &mut value, indexes)?;
                    }
                    store.insert(node.segment.clone(), value);
                }
                None => self.execute_absent(node, indexes, &mut store)?,
            }
            indexes.pop();
        }

        for (key, value) in remaining {
            store.entry(key).or_insert(value);
        }
        *data = from_entries(store, shape);
        Ok(())
    }

    /// A declared key missing from the data: presence checks run against
    /// null; otherwise a `default_value` chain produces the value.
    fn execute_absent(
        &mut self,
        node: &FieldNode,
        indexes: &[String],
        store: &mut Map<String, Value>,
    ) -> Result<(), ConfigurationError> {
        let reduced: Vec<RuleSpec> = node
            .rules
            .iter()
            .filter(|r| ABSENT_KEY_RULES.iter().any(|name| r.is_named(name)))
            .cloned()
            .collect();

        if !reduced.is_empty() {
            trace!(field = %node.path, "key absent, running presence checks");
            let mut placeholder = Value::Null;
            self.run_chain(node, &reduced, indexes, &mut placeholder)?;
            return Ok(());
        }

        let has_default = node
            .rules
            .iter()
            .any(|r| r.is_named("default_value") && r.param().is_some());
        if has_default {
            trace!(field = %node.path, "key absent, applying default");
            let mut value = Value::String(String::new());
            self.run_chain(node, &node.rules, indexes, &mut value)?;
            store.insert(node.segment.clone(), value);
        }
        Ok(())
    }
}
