//! Temporary on-disk project layouts.
//!
//! ```
//! use test_helpers::project::TempProject;
//!
//! let project = TempProject::new()?;
//! project.write("toolchain.config.toml", "[build]\nmain = \"src/index.js\"\n")?;
//! let app = project.create_dir("packages/app")?;
//! assert!(app.starts_with(project.root()));
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

/// A temporary directory acting as a monorepo root.
///
/// The directory and everything written into it are removed on drop.
#[derive(Debug)]
pub struct TempProject {
    _dir: TempDir,
    root: Utf8PathBuf,
    handle: Dir,
}

impl TempProject {
    /// Create an empty project directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow!("temp dir is not UTF-8: {}", p.display()))?;
        let handle = Dir::open_ambient_dir(&root, ambient_authority())
            .with_context(|| format!("open {root}"))?;
        Ok(Self {
            _dir: dir,
            root,
            handle,
        })
    }

    /// Absolute path of the project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Create `relative` (and its parents) below the root.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn create_dir(&self, relative: &str) -> Result<Utf8PathBuf> {
        self.handle
            .create_dir_all(relative)
            .with_context(|| format!("create {relative}"))?;
        Ok(self.root.join(relative))
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error when a parent cannot be created or the write fails.
    pub fn write(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        if let Some(parent) = Utf8Path::new(relative).parent().filter(|p| !p.as_str().is_empty()) {
            self.create_dir(parent.as_str())?;
        }
        self.handle
            .write(relative, contents)
            .with_context(|| format!("write {relative}"))?;
        Ok(self.root.join(relative))
    }
}
