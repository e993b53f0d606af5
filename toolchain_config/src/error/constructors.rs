//! Constructors for `ConfigError`.

use std::sync::Arc;

use camino::Utf8Path;
use serde_json::Value;

use super::{ConfigError, ExportIssue};

impl ExportIssue {
    /// Describe the declaration at `index`.
    #[must_use]
    pub fn new(index: usize, declaration: &Value) -> Self {
        Self {
            index,
            declaration: declaration.to_string(),
        }
    }
}

impl ConfigError {
    /// Construct a [`ConfigError::MissingProperty`] listing the keys that were
    /// available.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolchain_config::ConfigError;
    /// let err = ConfigError::missing_property("c", ["a", "b"]);
    /// assert!(err.to_string().contains("[a, b]"));
    /// ```
    #[must_use]
    pub fn missing_property<I, S>(requested: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingProperty {
            requested: requested.into(),
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// Construct an [`ConfigError::OverrideLoadFailure`] for `path`.
    #[must_use]
    pub fn override_load(
        path: &Utf8Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::OverrideLoadFailure {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a [`ConfigError::MalformedExport`].
    #[must_use]
    pub fn malformed_export(issue: ExportIssue, reason: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::MalformedExport {
            issue,
            reason: reason.into(),
        })
    }
}
