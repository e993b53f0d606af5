//! Primary error enum for configuration resolution flows.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested domain is not one of the known configuration namespaces.
    #[error("unknown configuration domain '{domain}' (expected one of: {expected})")]
    UnknownDomain {
        /// Name supplied by the caller.
        domain: String,
        /// Comma-separated list of valid domain names.
        expected: String,
    },

    /// The requested property is not present in the resolved tree.
    #[error(
        "property '{requested}' is not present in the resolved configuration; \
         available keys: [{}]",
        .available.join(", ")
    )]
    MissingProperty {
        /// Property the caller asked for.
        requested: String,
        /// Keys actually present in the resolved tree.
        available: Vec<String>,
    },

    /// An export record references a path outside the package.
    #[error(
        "export {issue} uses a non-relative path; external packages must be \
         declared with `name` only"
    )]
    InvalidExternalExport {
        /// The offending declaration.
        issue: ExportIssue,
    },

    /// An export record carries neither `name` nor `path`.
    #[error("export {issue} must declare a `name` or a `path`")]
    MissingExportIdentifier {
        /// The offending declaration.
        issue: ExportIssue,
    },

    /// An export name was written with the reserved namespace prefix.
    #[error("export {issue} must not start with the reserved prefix '{prefix}'")]
    ReservedPrefixCollision {
        /// The offending declaration.
        issue: ExportIssue,
        /// Prefix owned by the normalizer.
        prefix: &'static str,
    },

    /// An export entry has a shape the normalizer does not accept.
    #[error("export {issue} is malformed: {reason}")]
    MalformedExport {
        /// The offending declaration.
        issue: ExportIssue,
        /// Human-readable explanation of the problem.
        reason: String,
    },

    /// The root override file exists but could not be read or parsed.
    #[error("failed to load root override '{path}': {source}")]
    OverrideLoadFailure {
        /// File that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The user override collaborator reported a failure.
    #[error("failed to load user override for '{domain}': {message}")]
    UserOverride {
        /// Domain whose override was requested.
        domain: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// The working directory could not be determined.
    #[error("failed to determine the working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// A tree could not be encoded or decoded.
    #[error("failed to decode configuration: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Identifies an export declaration inside `build.exports`.
///
/// Rendered as `#<index> <json>` so diagnostics point at the exact entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportIssue {
    /// Position of the declaration in the export list.
    pub index: usize,
    /// JSON rendering of the declaration as the user wrote it.
    pub declaration: String,
}

impl std::fmt::Display for ExportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.index, self.declaration)
    }
}
