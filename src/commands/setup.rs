//! Set up a Ralph loop in the current session.
//!
//! Core logic takes closures for filesystem operations, so the whole
//! parse, write, report path is testable without touching disk. IO
//! happens only in `run`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::args::{self, Invocation};
use crate::config::Config;
use crate::report;
use crate::state::{self, Clock, LoopConfig};

// -----------------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------------

/// What a finished setup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Help was requested; nothing was written.
    Help(String),
    /// A fresh state file was written.
    Activated(Activation),
}

/// A written loop state and the text to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Activation {
    /// Relative path of the state file.
    pub state_file: PathBuf,
    pub report: String,
}

impl Outcome {
    /// Text for stdout.
    pub fn stdout(&self) -> &str {
        match self {
            Self::Help(help) => help,
            Self::Activated(activation) => &activation.report,
        }
    }
}

/// Runs setup against the real filesystem rooted at `project_dir`.
pub(crate) fn run<I, S>(tokens: I, project_dir: &Path, clock: &dyn Clock) -> Result<Outcome>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = match args::parse(tokens)? {
        Invocation::Help => return Ok(Outcome::Help(report::format_help())),
        Invocation::Setup(request) => request,
    };

    let config = Config::load(project_dir)?;
    let loop_config = request.into_loop_config(&config.defaults);

    let activation = activate(
        &loop_config,
        clock.now(),
        |dir| {
            let dir = project_dir.join(dir);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))
        },
        |path, content| {
            let path = project_dir.join(path);
            fs::write(&path, content)
                .with_context(|| format!("Failed to write state file: {}", path.display()))
        },
    )?;

    info!(
        "Ralph loop state written to {}",
        project_dir.join(&activation.state_file).display()
    );

    Ok(Outcome::Activated(activation))
}

// -----------------------------------------------------------------------------
// Helper functions
// -----------------------------------------------------------------------------

/// Core activation logic: writes the state and builds the report.
///
/// Takes closures for IO operations to enable testing:
/// - `create_dir`: creates a directory (and parents)
/// - `write_file`: writes content to a path
fn activate<D, W>(
    config: &LoopConfig,
    started_at: DateTime<Utc>,
    create_dir: D,
    write_file: W,
) -> Result<Activation>
where
    D: FnOnce(&Path) -> Result<()>,
    W: FnOnce(&Path, &str) -> Result<()>,
{
    let state_file = state::write_state(config, started_at, create_dir, write_file)?;
    let report = report::format_report(config);

    Ok(Activation { state_file, report })
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
