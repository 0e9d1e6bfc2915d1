//! releasectl CLI
//!
//! Usage: releasectl [--config PATH]... [--force] [--json] [-v...] <COMMAND>
//!
//! Commands:
//!   deploy    Deploy applications whose repositories have moved
//!   rollback  Make the previous release live again
//!   status    Show deployed and latest revisions
//!   check     Validate configuration and VCS executables

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use releasectl::presentation::Cli;

/// tracing filter override, e.g. `releasectl=debug`
const LOG_ENV: &str = "RELEASECTL_LOG";
/// `1` switches log output to JSON
const LOG_JSON_ENV: &str = "RELEASECTL_LOG_JSON";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if commands::run(&cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`
fn init_tracing(verbose: u8) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(default_directive(verbose))?,
    };
    let json_logs = std::env::var(LOG_JSON_ENV).unwrap_or_default() == "1";

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "releasectl=info",
        1 => "releasectl=debug",
        _ => "releasectl=trace",
    }
}
