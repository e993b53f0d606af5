//! Error types produced while resolving toolchain configuration.

mod constructors;
mod conversions;
mod types;

pub use types::{ConfigError, ExportIssue};
