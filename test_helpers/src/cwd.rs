//! A guard for changing the process working directory in tests.
//!
//! The working directory is process-global, so [`set_dir`] holds a global
//! mutex for as long as its guard lives and restores the original directory
//! on drop.
//!
//! # Examples
//!
//! ```no_run
//! use test_helpers::cwd;
//!
//! let guard = cwd::set_dir("/tmp").expect("set cwd");
//! // Relative paths now resolve against `/tmp`.
//! guard.restore().expect("restore cwd");
//! ```

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use parking_lot::{Mutex, MutexGuard};

static CWD_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// Restores the working directory captured by [`set_dir`] when dropped.
#[must_use = "dropping restores the prior working directory"]
pub struct CwdGuard {
    original: Utf8PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// The directory that will be restored.
    #[must_use]
    pub fn original(&self) -> &camino::Utf8Path {
        &self.original
    }

    /// Restore the original directory now, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised by `set_current_dir`.
    pub fn restore(&self) -> std::io::Result<()> {
        std::env::set_current_dir(&self.original)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ignored = std::env::set_current_dir(&self.original);
    }
}

/// Change the working directory to `path` until the guard is dropped.
///
/// # Errors
///
/// Returns an error when the current directory cannot be read, is not UTF-8,
/// or `path` cannot be entered. The working directory is unchanged on error.
pub fn set_dir(path: impl AsRef<Path>) -> Result<CwdGuard> {
    let lock = CWD_MUTEX.lock();
    let current = std::env::current_dir().context("read current dir")?;
    let original = Utf8PathBuf::from_path_buf(current)
        .map_err(|non_utf8| anyhow!("cwd is not valid UTF-8: {}", non_utf8.display()))?;
    std::env::set_current_dir(path.as_ref()).context("set current dir")?;
    Ok(CwdGuard {
        original,
        _lock: lock,
    })
}
