//! Merge modes and the strategies implementing them.

use std::fmt;

use serde_json::Value;

use crate::tree::ConfigTree;

use super::identity::{FirstElementIdentity, IdentityPolicy};

/// Policy selecting how conflicting values across layers combine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MergeMode {
    /// Mappings merge key by key; sequences and scalars from later layers
    /// replace earlier ones.
    Default,
    /// Like [`MergeMode::Default`], but sequences append the later layer's
    /// entries whose identity is not already present.
    ConcatUnique,
    /// Like [`MergeMode::Default`], but a later `false` over a mapping
    /// disables that stage outright.
    Structural,
}

impl MergeMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 3] = [Self::Default, Self::ConcatUnique, Self::Structural];

    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::ConcatUnique => "concat-unique",
            Self::Structural => "structural",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides how two values at the same key path combine.
///
/// Mapping recursion is shared by every strategy and lives in
/// [`super::merge_into`]; strategies only answer the questions on which the
/// modes differ.
pub trait MergeStrategy {
    /// Combine two sequences, leaving the result in `existing`.
    ///
    /// The default replaces `existing` with `incoming` wholesale.
    fn merge_sequences(&self, existing: &mut Vec<ConfigTree>, incoming: &[ConfigTree]) {
        existing.clear();
        existing.extend_from_slice(incoming);
    }

    /// Returns `true` when `later` must replace `earlier` without merging
    /// into it.
    fn disables(&self, _earlier: &ConfigTree, _later: &ConfigTree) -> bool {
        false
    }
}

/// Strategy for [`MergeMode::Default`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Overwrite;

impl MergeStrategy for Overwrite {}

/// Strategy for [`MergeMode::ConcatUnique`].
///
/// Appends entries of the later sequence whose identity, as reported by the
/// configured [`IdentityPolicy`], is not already present. First-seen order is
/// preserved, including for duplicates inside the later sequence.
#[derive(Clone, Copy)]
pub struct ConcatUnique<'p> {
    identity: &'p dyn IdentityPolicy,
}

impl<'p> ConcatUnique<'p> {
    /// Create the strategy with a custom identity policy.
    #[must_use]
    pub const fn new(identity: &'p dyn IdentityPolicy) -> Self {
        Self { identity }
    }
}

impl fmt::Debug for ConcatUnique<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatUnique")
            .field("identity", &"<policy>")
            .finish()
    }
}

impl MergeStrategy for ConcatUnique<'_> {
    fn merge_sequences(&self, existing: &mut Vec<ConfigTree>, incoming: &[ConfigTree]) {
        for entry in incoming {
            if !existing.iter().any(|seen| self.identity.same(seen, entry)) {
                existing.push(entry.clone());
            }
        }
    }
}

/// Strategy for [`MergeMode::Structural`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Structural;

impl MergeStrategy for Structural {
    fn disables(&self, earlier: &ConfigTree, later: &ConfigTree) -> bool {
        earlier.is_object() && matches!(later, Value::Bool(false))
    }
}

/// Strategy table keyed by [`MergeMode`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolchain_config::merge::{MergeMode, StrategyTable, WholeValueIdentity, merge_with};
///
/// let table = StrategyTable::new(&WholeValueIdentity);
/// let merged = merge_with(
///     &[json!({"p": [["a", 1]]}), json!({"p": [["a", 2]]})],
///     table.get(MergeMode::ConcatUnique),
/// );
/// assert_eq!(merged, json!({"p": [["a", 1], ["a", 2]]}));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StrategyTable<'p> {
    overwrite: Overwrite,
    concat_unique: ConcatUnique<'p>,
    structural: Structural,
}

impl<'p> StrategyTable<'p> {
    /// Build a table whose [`MergeMode::ConcatUnique`] entry uses `identity`.
    #[must_use]
    pub const fn new(identity: &'p dyn IdentityPolicy) -> Self {
        Self {
            overwrite: Overwrite,
            concat_unique: ConcatUnique::new(identity),
            structural: Structural,
        }
    }

    /// Look up the strategy for `mode`.
    #[must_use]
    pub fn get(&self, mode: MergeMode) -> &dyn MergeStrategy {
        match mode {
            MergeMode::Default => &self.overwrite,
            MergeMode::ConcatUnique => &self.concat_unique,
            MergeMode::Structural => &self.structural,
        }
    }
}

impl StrategyTable<'static> {
    /// The table used by [`super::merge`], identifying plugin specifiers by
    /// their first element.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(&FirstElementIdentity)
    }
}
