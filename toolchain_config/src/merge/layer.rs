//! Layer metadata and transport values for configuration merges.

use std::borrow::Cow;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::Domain;
use crate::tree::ConfigTree;

/// Where a merge layer came from.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LayerProvenance {
    /// Built-in defaults for the domain.
    Defaults,
    /// A sub-tree taken from another domain's resolved configuration.
    Sibling(Domain),
    /// The override file found at the project root.
    RootOverride(Utf8PathBuf),
    /// The per-project override supplied by the user.
    UserOverride,
}

impl fmt::Display for LayerProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => f.write_str("defaults"),
            Self::Sibling(domain) => write!(f, "sibling:{domain}"),
            Self::RootOverride(path) => write!(f, "root-override:{path}"),
            Self::UserOverride => f.write_str("user-override"),
        }
    }
}

/// Representation of a configuration layer.
#[derive(Clone, Debug)]
pub struct MergeLayer<'a> {
    provenance: LayerProvenance,
    value: Cow<'a, ConfigTree>,
}

impl<'a> MergeLayer<'a> {
    /// Construct a layer originating from built-in defaults.
    #[must_use]
    pub const fn defaults(value: Cow<'a, ConfigTree>) -> Self {
        Self {
            provenance: LayerProvenance::Defaults,
            value,
        }
    }

    /// Construct a layer borrowed from another domain's resolution.
    #[must_use]
    pub const fn sibling(domain: Domain, value: Cow<'a, ConfigTree>) -> Self {
        Self {
            provenance: LayerProvenance::Sibling(domain),
            value,
        }
    }

    /// Construct a layer originating from the root override file at `path`.
    #[must_use]
    pub const fn root_override(value: Cow<'a, ConfigTree>, path: Utf8PathBuf) -> Self {
        Self {
            provenance: LayerProvenance::RootOverride(path),
            value,
        }
    }

    /// Construct a layer originating from the user override.
    #[must_use]
    pub const fn user_override(value: Cow<'a, ConfigTree>) -> Self {
        Self {
            provenance: LayerProvenance::UserOverride,
            value,
        }
    }

    /// Returns the provenance of the layer.
    #[must_use]
    pub const fn provenance(&self) -> &LayerProvenance {
        &self.provenance
    }

    /// Returns the associated path if this layer was read from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match &self.provenance {
            LayerProvenance::RootOverride(path) => Some(path),
            _ => None,
        }
    }

    /// Borrow the layer's tree.
    #[must_use]
    pub fn value(&self) -> &ConfigTree {
        &self.value
    }

    /// Returns an owned tree representing the layer.
    #[must_use]
    pub fn into_value(self) -> ConfigTree {
        self.value.into_owned()
    }
}
