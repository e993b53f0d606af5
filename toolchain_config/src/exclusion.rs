//! Strip named entries out of sequences anywhere in a tree.
//!
//! The transpile domain merges presets and plugins from several layers into a
//! tree whose shape the resolver does not know in advance. A layer may list
//! identities to drop under the reserved [`EXCLUSIONS_KEY`]; the filter then
//! removes matching entries from every sequence stored under the named
//! property, at any depth.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::merge::IdentityPolicy;
use crate::tree::{ConfigTree, TreeVisitor, walk_mut};

/// Reserved key holding the exclusion mapping inside a transpile tree.
pub const EXCLUSIONS_KEY: &str = "$exclusions";

/// Mapping from property name to the entries removed from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exclusions {
    by_property: BTreeMap<String, Vec<ConfigTree>>,
}

impl Exclusions {
    /// Create an empty exclusion mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_property: BTreeMap::new(),
        }
    }

    /// Exclude `entry` from every sequence stored under `property`.
    pub fn insert(&mut self, property: impl Into<String>, entry: ConfigTree) -> &mut Self {
        self.by_property.entry(property.into()).or_default().push(entry);
        self
    }

    /// Build the mapping from a tree of the form `{ property: [entries] }`.
    ///
    /// A scalar in place of a sequence excludes that single entry. Anything
    /// other than a mapping yields no exclusions.
    #[must_use]
    pub fn from_tree(tree: &ConfigTree) -> Self {
        let mut exclusions = Self::new();
        if let Value::Object(map) = tree {
            for (property, entries) in map {
                match entries {
                    Value::Array(items) => {
                        for item in items {
                            exclusions.insert(property.clone(), item.clone());
                        }
                    }
                    other => {
                        exclusions.insert(property.clone(), other.clone());
                    }
                }
            }
        }
        exclusions
    }

    /// Remove [`EXCLUSIONS_KEY`] from the top level of `tree` and parse it.
    ///
    /// Returns `None` when the key is absent.
    pub fn take_from(tree: &mut ConfigTree) -> Option<Self> {
        let Value::Object(map) = tree else {
            return None;
        };
        map.shift_remove(EXCLUSIONS_KEY)
            .map(|reserved| Self::from_tree(&reserved))
    }

    /// Returns `true` when nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_property.values().all(Vec::is_empty)
    }

    fn entries_for(&self, property: &str) -> Option<&[ConfigTree]> {
        self.by_property.get(property).map(Vec::as_slice)
    }
}

struct ExclusionVisitor<'a> {
    exclusions: &'a Exclusions,
    identity: &'a dyn IdentityPolicy,
    removed: usize,
}

impl TreeVisitor for ExclusionVisitor<'_> {
    fn visit_entry(&mut self, key: &str, value: &mut ConfigTree) {
        let Some(excluded) = self.exclusions.entries_for(key) else {
            return;
        };
        let Value::Array(items) = value else {
            return;
        };
        let before = items.len();
        items.retain(|item| !excluded.iter().any(|entry| self.identity.same(item, entry)));
        self.removed += before - items.len();
    }
}

/// Remove excluded entries from `tree` in place, returning how many entries
/// were dropped.
///
/// Entries are compared through `identity`, so excluding `"env"` also removes
/// the specifier tuple `["env", {..}]` under a [`crate::merge::FirstElementIdentity`]
/// policy. Non-sequence values stored under an excluded property are left
/// untouched.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolchain_config::exclusion::{Exclusions, filter_tree};
/// use toolchain_config::merge::FirstElementIdentity;
///
/// let mut tree = json!({
///     "plugins": ["a", "b"],
///     "env": {"test": {"plugins": [["b", {}], "c"]}},
/// });
/// let mut exclusions = Exclusions::new();
/// exclusions.insert("plugins", json!("b"));
///
/// let removed = filter_tree(&mut tree, &exclusions, &FirstElementIdentity);
/// assert_eq!(removed, 2);
/// assert_eq!(tree, json!({"plugins": ["a"], "env": {"test": {"plugins": ["c"]}}}));
/// ```
pub fn filter_tree(
    tree: &mut ConfigTree,
    exclusions: &Exclusions,
    identity: &dyn IdentityPolicy,
) -> usize {
    if exclusions.is_empty() {
        return 0;
    }
    let mut visitor = ExclusionVisitor {
        exclusions,
        identity,
        removed: 0,
    };
    walk_mut(tree, &mut visitor);
    visitor.removed
}
