//! Identity policies used to de-duplicate sequence entries.
//!
//! Tool plugin lists mix bare names (`"import"`) with specifier tuples
//! (`["import", { "order": "asc" }]`). Two entries describe the same plugin
//! when their identities compare equal.

use serde_json::Value;

use crate::tree::ConfigTree;

/// Maps a sequence entry to the value that identifies it.
pub trait IdentityPolicy {
    /// Returns the identity of `entry`.
    fn identity<'a>(&self, entry: &'a ConfigTree) -> &'a ConfigTree;

    /// Returns `true` when `a` and `b` share an identity.
    fn same(&self, a: &ConfigTree, b: &ConfigTree) -> bool {
        self.identity(a) == self.identity(b)
    }
}

/// Identifies specifier tuples by their first element and every other entry
/// by its whole value.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolchain_config::merge::{FirstElementIdentity, IdentityPolicy};
///
/// let policy = FirstElementIdentity;
/// assert!(policy.same(&json!("env"), &json!(["env", {"loose": true}])));
/// assert!(!policy.same(&json!("env"), &json!("react")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstElementIdentity;

impl IdentityPolicy for FirstElementIdentity {
    fn identity<'a>(&self, entry: &'a ConfigTree) -> &'a ConfigTree {
        match entry {
            Value::Array(items) => items.first().unwrap_or(entry),
            other => other,
        }
    }
}

/// Identifies every entry by its whole value.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeValueIdentity;

impl IdentityPolicy for WholeValueIdentity {
    fn identity<'a>(&self, entry: &'a ConfigTree) -> &'a ConfigTree {
        entry
    }
}
