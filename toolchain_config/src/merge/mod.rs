//! Mode-aware deep merging of configuration layers.
//!
//! Layers are folded left to right, lowest precedence first. How two values
//! at the same key path combine is decided by a [`MergeStrategy`]; the three
//! built-in strategies live in a [`StrategyTable`] keyed by [`MergeMode`], so
//! a new mode is a new table entry rather than a branch in the recursion.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use toolchain_config::merge::{MergeMode, merge};
//!
//! let merged = merge(
//!     &[json!({"plugins": ["a", "b"]}), json!({"plugins": ["b", "c"]})],
//!     MergeMode::ConcatUnique,
//! );
//! assert_eq!(merged, json!({"plugins": ["a", "b", "c"]}));
//! ```

mod composer;
mod identity;
mod layer;
mod strategy;

pub use composer::MergeComposer;
pub use identity::{FirstElementIdentity, IdentityPolicy, WholeValueIdentity};
pub use layer::{LayerProvenance, MergeLayer};
pub use strategy::{ConcatUnique, MergeMode, MergeStrategy, Overwrite, StrategyTable, Structural};

use serde_json::Value;

use crate::tree::{ConfigTree, empty_tree};

/// Merge `layers` (lowest precedence first) using the standard strategy for
/// `mode`.
///
/// An empty input yields an empty mapping. Inputs are only borrowed; the
/// result shares nothing with them.
#[must_use]
pub fn merge<'a, I>(layers: I, mode: MergeMode) -> ConfigTree
where
    I: IntoIterator<Item = &'a ConfigTree>,
{
    merge_with(layers, StrategyTable::standard().get(mode))
}

/// Merge `layers` using an explicit `strategy`.
#[must_use]
pub fn merge_with<'a, I>(layers: I, strategy: &dyn MergeStrategy) -> ConfigTree
where
    I: IntoIterator<Item = &'a ConfigTree>,
{
    let mut acc = empty_tree();
    for layer in layers {
        merge_into(&mut acc, layer, strategy);
    }
    acc
}

/// Merge composed layers, logging the provenance of each as it is applied.
#[must_use]
pub fn merge_layers<'a, I>(layers: I, strategy: &dyn MergeStrategy) -> ConfigTree
where
    I: IntoIterator<Item = MergeLayer<'a>>,
{
    let mut acc = empty_tree();
    for layer in layers {
        tracing::trace!(provenance = %layer.provenance(), "applying merge layer");
        merge_into(&mut acc, layer.value(), strategy);
    }
    acc
}

/// Overlay `layer` onto `target` in place.
///
/// Behaviour:
/// - a strategy-declared disablement replaces `target` with `layer` outright;
/// - mappings merge key by key, keys only present in `target` are kept;
/// - two sequences are combined by [`MergeStrategy::merge_sequences`];
/// - anything else replaces `target`.
pub fn merge_into(target: &mut ConfigTree, layer: &ConfigTree, strategy: &dyn MergeStrategy) {
    if strategy.disables(target, layer) {
        *target = layer.clone();
        return;
    }
    match (target, layer) {
        (Value::Object(target_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match target_map.get_mut(key) {
                    Some(existing) => merge_into(existing, value, strategy),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(incoming)) => {
            strategy.merge_sequences(existing, incoming);
        }
        (slot, _) => *slot = layer.clone(),
    }
}
