//! Per-resolution memoization of collaborator answers.

use std::cell::OnceCell;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ConfigResult;
use crate::collaborators::{Collaborators, PlatformVersion};

/// Values discovered once and reused for every domain resolved through the
/// same [`Resolver`](super::Resolver).
///
/// Fields left unset are filled lazily from the collaborators on first use.
/// Presetting a field pins the value and the collaborator is never asked.
#[derive(Debug, Default)]
pub struct ResolveContext {
    cwd: OnceCell<Utf8PathBuf>,
    project_root: OnceCell<Option<Utf8PathBuf>>,
    platform_version: OnceCell<Option<PlatformVersion>>,
}

impl ResolveContext {
    /// Create an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cwd: OnceCell::new(),
            project_root: OnceCell::new(),
            platform_version: OnceCell::new(),
        }
    }

    /// Pin the working directory.
    #[must_use]
    pub fn with_current_dir(mut self, cwd: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = OnceCell::from(cwd.into());
        self
    }

    /// Pin the project root; `None` records that there is no root.
    #[must_use]
    pub fn with_project_root(mut self, root: Option<Utf8PathBuf>) -> Self {
        self.project_root = OnceCell::from(root);
        self
    }

    /// Pin the platform version; `None` records that it is unknown.
    #[must_use]
    pub fn with_platform_version(mut self, version: Option<PlatformVersion>) -> Self {
        self.platform_version = OnceCell::from(version);
        self
    }

    pub(super) fn current_dir<C>(&self, collaborators: &C) -> ConfigResult<&Utf8Path>
    where
        C: Collaborators + ?Sized,
    {
        if let Some(cwd) = self.cwd.get() {
            return Ok(cwd);
        }
        let cwd = collaborators.current_dir()?;
        Ok(self.cwd.get_or_init(|| cwd))
    }

    pub(super) fn project_root<C>(&self, collaborators: &C) -> Option<&Utf8Path>
    where
        C: Collaborators + ?Sized,
    {
        self.project_root
            .get_or_init(|| {
                let root = collaborators.find_project_root();
                tracing::debug!(root = ?root, "project root discovery");
                root
            })
            .as_deref()
    }

    pub(super) fn platform_version<C>(&self, collaborators: &C) -> Option<PlatformVersion>
    where
        C: Collaborators + ?Sized,
    {
        *self
            .platform_version
            .get_or_init(|| collaborators.detect_platform_version())
    }
}
