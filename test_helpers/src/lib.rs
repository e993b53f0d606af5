//! Test fixtures shared by the `toolchain_config` test suites.
//!
//! - [`env`]: guards for process environment variables;
//! - [`cwd`]: a guard for the process working directory;
//! - [`project`]: temporary monorepo layouts with override files.

pub mod cwd;
pub mod env;
pub mod project;
