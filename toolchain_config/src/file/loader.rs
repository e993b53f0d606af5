//! Loading of the root override file.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ConfigError;
use crate::tree::ConfigTree;

use super::helpers::read_optional;
use super::parser::parse_tree;

/// Root override file names, probed in order.
pub const ROOT_OVERRIDE_FILES: [&str; 2] = ["toolchain.config.toml", "toolchain.config.json"];

/// Outcome of looking for the root override file.
#[derive(Debug)]
#[must_use]
pub enum RootOverride {
    /// The file was found and parsed.
    Found {
        /// Parsed contents.
        tree: ConfigTree,
        /// File the contents were read from.
        path: Utf8PathBuf,
    },
    /// No override file exists at the root.
    NotFound,
    /// The file exists but could not be read or parsed.
    Failed(Arc<ConfigError>),
}

/// Load the first root override file present in `root`.
///
/// Only the first existing candidate is read. A missing file is not an
/// error; every other read or parse failure is reported as
/// [`ConfigError::OverrideLoadFailure`].
pub fn load_root_override(root: &Utf8Path) -> RootOverride {
    for name in ROOT_OVERRIDE_FILES {
        let path = root.join(name);
        match read_optional(root, name) {
            Ok(None) => {}
            Ok(Some(data)) => {
                return match parse_tree(&path, &data) {
                    Ok(tree) => RootOverride::Found { tree, path },
                    Err(err) => RootOverride::Failed(ConfigError::override_load(&path, err)),
                };
            }
            Err(err) => return RootOverride::Failed(ConfigError::override_load(&path, err)),
        }
    }
    RootOverride::NotFound
}
