//! Layered configuration resolution for JavaScript toolchains.
//!
//! A project's effective lint, format, test, transpile, bundle, build-script,
//! minify and style-lint settings are computed by stacking built-in defaults,
//! an optional monorepo-root override and a per-project override, then
//! merging them with a mode chosen per domain:
//!
//! - `Default`: recursive merge, later scalars and sequences win;
//! - `ConcatUnique`: sequences concatenate, skipping entries already present;
//! - `Structural`: like `Default`, but `false` switches off a whole stage.
//!
//! The build-scripts domain is additionally normalized: export declarations
//! are canonicalized into [`ExportDeclaration`] records and stage switches are
//! derived from `build.main`.
//!
//! ```rust,no_run
//! use toolchain_config::{FsCollaborators, Resolver};
//!
//! # fn main() -> toolchain_config::ConfigResult<()> {
//! let resolver = Resolver::new(FsCollaborators::from_current_dir()?);
//! let plugins = resolver.resolve("lint", Some("plugins"))?;
//! println!("{plugins}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod collaborators;
pub mod domain;
mod error;
pub mod exclusion;
pub mod exports;
mod extract;
mod file;
pub mod merge;
mod resolver;
mod result_ext;
pub mod tree;

pub use collaborators::{Collaborators, FsCollaborators, PlatformVersion};
pub use domain::Domain;
pub use error::{ConfigError, ExportIssue};
pub use exports::ExportDeclaration;
pub use extract::pluck;
pub use file::{ROOT_OVERRIDE_FILES, RootOverride, load_root_override};
pub use merge::{MergeMode, merge};
pub use resolver::{ResolveContext, Resolver};
pub use result_ext::ConfigResultExt;
pub use tree::ConfigTree;

/// Result alias used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so a failure can be reported by every
/// domain that depends on it without cloning the underlying sources.
pub type ConfigResult<T> = Result<T, Arc<ConfigError>>;
