//! Extensions for mapping errors to `ConfigResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting external error types into the crate's
//! `ConfigResult<T>` alias (`Result<T, Arc<ConfigError>>`).
//!
//! # Examples
//!
//! ```
//! use toolchain_config::{ConfigResult, ConfigResultExt};
//!
//! fn encode() -> ConfigResult<serde_json::Value> {
//!     // serde_json::Error implements Into<ConfigError>
//!     serde_json::to_value(42).into_config()
//! }
//! ```

use std::sync::Arc;

use crate::{ConfigError, ConfigResult};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<ConfigError>` into a `ConfigResult<T>`.
pub trait ConfigResultExt<T, E> {
    /// Convert `Result<T, E>` into `ConfigResult<T>` using `Into<ConfigError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<ConfigError>`.
    fn into_config(self) -> ConfigResult<T>;
}

impl<T, E> ConfigResultExt<T, E> for Result<T, E>
where
    E: Into<ConfigError>,
{
    fn into_config(self) -> ConfigResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
