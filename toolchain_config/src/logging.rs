//! Diagnostic logging for the command-line tool.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TOOLCHAIN_CONFIG_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr subscriber filtered by [`LOG_ENV`], defaulting to
/// `warn`.
///
/// # Errors
///
/// Returns an error when the default filter is rejected or a global
/// subscriber is already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer =
        EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
