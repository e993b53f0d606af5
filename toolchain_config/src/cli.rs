//! Command-line interface definitions for `toolchain-config`.

use camino::Utf8PathBuf;
use clap::Parser;

/// Parsed CLI arguments for `toolchain-config`.
#[derive(Debug, Parser)]
#[command(name = "toolchain-config")]
#[command(about = "Print the resolved toolchain configuration as JSON")]
#[command(version)]
pub struct Args {
    /// Domain to resolve (for example `lint` or `buildScripts`); every
    /// domain is printed when omitted.
    pub domain: Option<String>,
    /// Top-level property to extract from the resolved domain.
    #[arg(requires = "domain")]
    pub property: Option<String>,
    /// Resolve as if run from this directory.
    #[arg(long, value_name = "path", env = "TOOLCHAIN_CONFIG_CWD")]
    pub cwd: Option<Utf8PathBuf>,
    /// Print single-line JSON instead of pretty-printing.
    #[arg(long = "compact")]
    pub is_compact: bool,
}
