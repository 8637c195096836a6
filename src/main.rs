//! Ralph loop setup: writes the in-session loop state read by the stop hook.

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod commands;
mod config;
mod error;
mod report;
mod state;
mod templates;

use state::SystemClock;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "RALPH_LOG";

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the text the loop agent reads.
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("ralph_loop=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let tokens: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    match execute(tokens) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", report::format_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn execute(tokens: Vec<String>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    let outcome = commands::setup::run(tokens, &cwd, &SystemClock)?;
    print!("{}", outcome.stdout());

    Ok(())
}
