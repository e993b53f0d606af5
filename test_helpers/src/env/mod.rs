//! Guards for mutating process environment variables in tests.
//!
//! Every mutation takes a global re-entrant lock for the duration of the
//! write and returns an [`EnvVarGuard`] that restores the prior value (or
//! removes the variable) when dropped. Guards for the same key stack and
//! unwind in LIFO order. Hold [`lock`] when a test needs several mutations
//! to appear atomic to other threads.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _g = env::set_var("TOOLCHAIN_PLATFORM_VERSION", "20.11");
//! assert_eq!(std::env::var("TOOLCHAIN_PLATFORM_VERSION").as_deref(), Ok("20.11"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Exclusive access to the environment for the lifetime of the value.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Set `key` while the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        set_var(key, value)
    }

    /// Remove `key` while the lock is held.
    pub fn remove_var<K: Into<String>>(&self, key: K) -> EnvVarGuard {
        remove_var(key)
    }
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Set `key` to `value`, returning a guard that restores the prior state.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _g = env::set_var("TOOLCHAIN_HELPERS_DOC", "on");
/// assert!(std::env::var("TOOLCHAIN_HELPERS_DOC").is_ok());
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Remove `key`, returning a guard that restores the prior state.
pub fn remove_var<K: Into<String>>(key: K) -> EnvVarGuard {
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Acquire the global environment lock.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}
