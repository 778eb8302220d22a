//! Field tree construction.
//!
//! Turns the flat, registration-ordered declarations into a forest whose
//! shape mirrors the nested data. Missing ancestors are synthesized first, so
//! nodes can be built top-down with each child owned by its parent.

use crate::normalize::normalize_rules;
use crate::path::{self, PathSegments, WILDCARD};
use crate::types::{Declarations, RuleDeclaration, RuleSpec};
use std::collections::HashMap;
use tracing::{debug, trace};

/// One declared (or synthesized) field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldNode {
    /// Canonical declared path, wildcards unresolved.
    pub path: String,
    /// Last path segment; `""` for a wildcard node.
    pub segment: String,
    pub label: String,
    /// Normalized chain.
    pub rules: Vec<RuleSpec>,
    pub errors: HashMap<String, String>,
    /// Ordered by declaration.
    pub children: Vec<FieldNode>,
}

impl FieldNode {
    pub fn is_wildcard(&self) -> bool {
        self.segment == WILDCARD
    }

    pub fn child(&self, segment: &str) -> Option<&FieldNode> {
        self.children.iter().find(|c| c.segment == segment)
    }
}

/// A built forest plus the declarations it came from (ancestors included),
/// which label lookups for cross-field messages need.
#[derive(Clone, Debug)]
pub struct FieldTree {
    pub roots: Vec<FieldNode>,
    pub declarations: Declarations,
}

impl FieldTree {
    pub fn label(&self, field: &str) -> Option<&str> {
        self.declarations.get(field).map(|d| d.label.as_str())
    }

    /// Finds a node by its canonical path.
    pub fn node(&self, field: &str) -> Option<&FieldNode> {
        let segments = path::parse(field);
        let (first, rest) = segments.split_first()?;
        let mut node = self.roots.iter().find(|n| &n.segment == first)?;
        for segment in rest {
            node = node.child(segment)?;
        }
        Some(node)
    }
}

/// Adds the implicit `is_array` ancestors of every nested declaration.
///
/// Walking up from each declaration, the first ancestor that is already
/// declared gets `is_array` (if it has none) and ends the walk; undeclared
/// ancestors are appended with `is_array` as their only rule.
pub fn synthesize_ancestors(declarations: &Declarations) -> Declarations {
    let mut out = declarations.clone();

    for decl in declarations.iter() {
        let mut keys = path::parse(&decl.field);
        while keys.len() > 1 {
            keys.pop();
            let parent = path::format(&keys);

            if let Some(existing) = out.get_mut(&parent) {
                let has_is_array = existing
                    .rules
                    .iter()
                    .any(|r| matches!(r, RuleSpec::Named { name, param: None } if name == "is_array"));
                if !has_is_array {
                    trace!(field = %parent, "adding implicit is_array");
                    existing.rules.push(RuleSpec::named("is_array"));
                }
                break;
            }

            trace!(field = %parent, child = %decl.field, "synthesizing ancestor");
            out.insert(RuleDeclaration {
                field: parent.clone(),
                label: parent,
                rules: vec![RuleSpec::named("is_array")],
                errors: HashMap::new(),
            });
        }
    }

    out
}

/// Builds the field forest for one validation run.
pub fn build_tree(declarations: &Declarations) -> FieldTree {
    let declarations = synthesize_ancestors(declarations);

    let parsed: Vec<(PathSegments, &RuleDeclaration)> = declarations
        .iter()
        .map(|d| (path::parse(&d.field), d))
        .collect();

    let roots = attach_children(&parsed, &[]);
    debug!(
        roots = roots.len(),
        fields = declarations.len(),
        "built field tree"
    );

    FieldTree {
        roots,
        declarations,
    }
}

fn attach_children(all: &[(PathSegments, &RuleDeclaration)], parent: &[String]) -> Vec<FieldNode> {
    all.iter()
        .filter(|(segments, _)| {
            segments.len() == parent.len() + 1 && path::is_parent_of(parent, segments)
        })
        .map(|(segments, decl)| FieldNode {
            path: decl.field.clone(),
            segment: segments[segments.len() - 1].clone(),
            label: decl.label.clone(),
            rules: normalize_rules(&decl.rules),
            errors: decl.errors.clone(),
            children: attach_children(all, segments),
        })
        .collect()
}
