//! Layer composition helpers.

use std::borrow::Cow;

use camino::Utf8PathBuf;

use crate::domain::Domain;
use crate::tree::ConfigTree;

use super::{MergeLayer, MergeStrategy, merge_layers};

/// Builder that accumulates [`MergeLayer`] instances, lowest precedence first.
///
/// ```rust
/// use serde_json::json;
/// use toolchain_config::merge::{MergeComposer, MergeMode, StrategyTable};
///
/// let mut composer = MergeComposer::new();
/// composer.push_defaults(json!({"printWidth": 80, "semi": true}));
/// composer.push_user_override(json!({"printWidth": 100}));
///
/// let table = StrategyTable::standard();
/// let merged = composer.merge(table.get(MergeMode::Default));
/// assert_eq!(merged, json!({"printWidth": 100, "semi": true}));
/// ```
#[derive(Debug, Default)]
pub struct MergeComposer {
    layers: Vec<MergeLayer<'static>>,
}

impl MergeComposer {
    /// Create an empty composer.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Push a defaults layer.
    pub fn push_defaults(&mut self, value: ConfigTree) {
        self.push_layer(MergeLayer::defaults(Cow::Owned(value)));
    }

    /// Push a layer taken from `domain`'s resolved configuration.
    pub fn push_sibling(&mut self, domain: Domain, value: ConfigTree) {
        self.push_layer(MergeLayer::sibling(domain, Cow::Owned(value)));
    }

    /// Push the root override file's contents.
    pub fn push_root_override(&mut self, value: ConfigTree, path: Utf8PathBuf) {
        self.push_layer(MergeLayer::root_override(Cow::Owned(value), path));
    }

    /// Push a user override layer.
    pub fn push_user_override(&mut self, value: ConfigTree) {
        self.push_layer(MergeLayer::user_override(Cow::Owned(value)));
    }

    /// Push an arbitrary layer.
    pub fn push_layer(&mut self, layer: MergeLayer<'static>) {
        self.layers.push(layer);
    }

    /// Number of layers accumulated so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` when no layers have been pushed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Consume the composer and return the accumulated layers.
    #[must_use]
    pub fn layers(self) -> Vec<MergeLayer<'static>> {
        self.layers
    }

    /// Consume the composer and merge its layers with `strategy`.
    #[must_use]
    pub fn merge(self, strategy: &dyn MergeStrategy) -> ConfigTree {
        merge_layers(self.layers, strategy)
    }
}

impl IntoIterator for MergeComposer {
    type Item = MergeLayer<'static>;
    type IntoIter = std::vec::IntoIter<MergeLayer<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}
