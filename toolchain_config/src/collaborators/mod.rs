//! Contracts for the services the resolver consumes but does not implement.
//!
//! Locating the project root, reading per-project overrides, detecting the
//! host platform and flattening package paths are all delegated to a
//! [`Collaborators`] implementation chosen by the caller. [`FsCollaborators`]
//! is the filesystem-backed implementation used by the command-line tool.

mod fs;

use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ConfigResult;
use crate::domain::Domain;
use crate::file::{RootOverride, load_root_override};
use crate::tree::ConfigTree;

pub use fs::{
    FsCollaborators, PLATFORM_VERSION_ENV, ROOT_MARKER, USER_OVERRIDE_FILE, flatten_package_path,
};

/// Services the resolver relies on.
pub trait Collaborators {
    /// The directory the resolution is performed for.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::WorkingDirectory`] when the directory
    /// cannot be determined.
    fn current_dir(&self) -> ConfigResult<Utf8PathBuf>;

    /// Locate the monorepo root, if any.
    fn find_project_root(&self) -> Option<Utf8PathBuf>;

    /// Read the root override stored in `root`.
    ///
    /// The default implementation probes
    /// [`ROOT_OVERRIDE_FILES`](crate::ROOT_OVERRIDE_FILES) on disk.
    fn load_root_override(&self, root: &Utf8Path) -> RootOverride {
        load_root_override(root)
    }

    /// Load the per-project override for `domain`.
    ///
    /// Implementations return an empty mapping when no override exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::UserOverride`] when an override exists
    /// but cannot be loaded.
    fn load_user_override(&self, domain: Domain) -> ConfigResult<ConfigTree>;

    /// Detect the host platform version, if it can be determined.
    fn detect_platform_version(&self) -> Option<PlatformVersion>;

    /// Turn a package-relative path into a single filesystem-safe token.
    fn flatten_path(&self, path: &str) -> String;
}

/// A `major.minor` platform version.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PlatformVersion {
    /// Major version component.
    pub major: u32,
    /// Minor version component.
    pub minor: u32,
}

impl PlatformVersion {
    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error returned when a version string is not `[v]major.minor[.patch]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid platform version '{0}'")]
pub struct InvalidPlatformVersion(pub String);

impl FromStr for PlatformVersion {
    type Err = InvalidPlatformVersion;

    /// Parse `major.minor`, tolerating a leading `v` and a trailing patch
    /// component.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPlatformVersion(raw.to_owned());
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let mut parts = digits.split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = parts.next().map_or(Ok(0), |p| p.parse().map_err(|_| invalid()))?;
        if parts.next().is_some_and(|patch| patch.parse::<u32>().is_err()) {
            return Err(invalid());
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor))
    }
}
