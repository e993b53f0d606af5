//! CLI entrypoint for `toolchain-config`.

mod cli;
mod logging;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use toolchain_config::{ConfigError, ConfigResultExt, FsCollaborators, Resolver};

use crate::cli::Args;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] Arc<ConfigError>),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = logging::init() {
        let _ignored = writeln!(io::stderr().lock(), "warning: logging disabled: {err}");
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "resolution failed");
            let _ignored = writeln!(io::stderr().lock(), "error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let collaborators = match &args.cwd {
        Some(dir) => FsCollaborators::new(dir.clone()),
        None => FsCollaborators::from_current_dir()?,
    };
    let resolver = Resolver::new(collaborators);
    let tree = match &args.domain {
        Some(domain) => resolver.resolve(domain, args.property.as_deref())?,
        None => Value::Object(resolver.resolve_all()?),
    };
    let rendered = if args.is_compact {
        serde_json::to_string(&tree)
    } else {
        serde_json::to_string_pretty(&tree)
    }
    .into_config()?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}
