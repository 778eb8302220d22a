use crate::path;
use serde_json::Value;

/// Read-only view of the whole input of one validation run.
///
/// Cross-field rules use it to read sibling values by path, independent of
/// where the executor currently is. It borrows a snapshot taken before any
/// rule ran and cannot outlive the `verify` call that created it.
#[derive(Clone, Copy, Debug)]
pub struct ValidationContext<'a> {
    data: &'a Value,
}

impl<'a> ValidationContext<'a> {
    pub fn new(data: &'a Value) -> Self {
        ValidationContext { data }
    }

    pub fn data(&self) -> &'a Value {
        self.data
    }

    /// Concrete path of `field` relative to the value at `indexes`.
    pub fn resolve_path<S: AsRef<str>>(&self, field: &str, indexes: &[S]) -> path::PathSegments {
        path::resolve_wildcards(&path::parse(field), indexes)
    }

    /// Value of `field`, wildcards resolved against `indexes`. Absent paths
    /// are `None`, never an error.
    pub fn lookup<S: AsRef<str>>(&self, field: &str, indexes: &[S]) -> Option<&'a Value> {
        path::lookup(self.data, &self.resolve_path(field, indexes))
    }
}
