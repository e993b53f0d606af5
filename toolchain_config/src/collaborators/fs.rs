//! Filesystem-backed collaborators.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::Domain;
use crate::file::{ROOT_OVERRIDE_FILES, parse_tree, read_optional};
use crate::tree::{ConfigTree, empty_tree};
use crate::{ConfigError, ConfigResult};

use super::{Collaborators, PlatformVersion};

/// Marker file identifying a project root that has no override file.
pub const ROOT_MARKER: &str = ".toolchain-root";

/// Per-project override file, one table per domain.
pub const USER_OVERRIDE_FILE: &str = ".toolchainrc.toml";

/// Environment variable holding the host platform version.
pub const PLATFORM_VERSION_ENV: &str = "TOOLCHAIN_PLATFORM_VERSION";

/// Collaborators reading from the filesystem around a working directory.
///
/// - the project root is the nearest ancestor of the working directory that
///   holds a root override file or a [`ROOT_MARKER`];
/// - user overrides are tables named after the domain in
///   [`USER_OVERRIDE_FILE`] inside the working directory;
/// - the platform version comes from [`PLATFORM_VERSION_ENV`].
#[derive(Debug, Clone)]
pub struct FsCollaborators {
    cwd: Utf8PathBuf,
}

impl FsCollaborators {
    /// Create collaborators rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<Utf8PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Create collaborators for the process working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkingDirectory`] when the directory cannot be
    /// read or is not valid UTF-8.
    pub fn from_current_dir() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| Arc::new(ConfigError::WorkingDirectory(e)))?;
        let utf8 = Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            Arc::new(ConfigError::WorkingDirectory(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("working directory is not valid UTF-8: {}", path.display()),
            )))
        })?;
        Ok(Self::new(utf8))
    }

    fn is_project_root(dir: &Utf8Path) -> bool {
        ROOT_OVERRIDE_FILES
            .iter()
            .any(|name| dir.join(name).is_file())
            || dir.join(ROOT_MARKER).exists()
    }
}

impl Collaborators for FsCollaborators {
    fn current_dir(&self) -> ConfigResult<Utf8PathBuf> {
        Ok(self.cwd.clone())
    }

    fn find_project_root(&self) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .find(|dir| Self::is_project_root(dir))
            .map(Utf8Path::to_path_buf)
    }

    fn load_user_override(&self, domain: Domain) -> ConfigResult<ConfigTree> {
        let user_error = |message: String| {
            Arc::new(ConfigError::UserOverride {
                domain: domain.as_str(),
                message,
            })
        };
        let Some(data) =
            read_optional(&self.cwd, USER_OVERRIDE_FILE).map_err(|e| user_error(e.to_string()))?
        else {
            return Ok(empty_tree());
        };
        let path = self.cwd.join(USER_OVERRIDE_FILE);
        let mut tree = parse_tree(&path, &data).map_err(|e| user_error(format!("{path}: {e}")))?;
        Ok(tree
            .get_mut(domain.as_str())
            .map(ConfigTree::take)
            .unwrap_or_else(empty_tree))
    }

    fn detect_platform_version(&self) -> Option<PlatformVersion> {
        let raw = std::env::var(PLATFORM_VERSION_ENV).ok()?;
        raw.parse()
            .inspect_err(|err| {
                tracing::warn!(%err, variable = PLATFORM_VERSION_ENV, "ignoring platform version");
            })
            .ok()
    }

    fn flatten_path(&self, path: &str) -> String {
        flatten_package_path(path)
    }
}

/// Flatten a package-relative path into a single filesystem-safe token.
///
/// Leading `./` segments are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`.
///
/// # Examples
///
/// ```
/// use toolchain_config::collaborators::flatten_package_path;
///
/// assert_eq!(flatten_package_path("./src/widgets/button.js"), "src_widgets_button.js");
/// assert_eq!(flatten_package_path("@scope/pkg"), "_scope_pkg");
/// ```
#[must_use]
pub fn flatten_package_path(path: &str) -> String {
    path.trim_start_matches("./")
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
