//! Output formatting for loop setup.
//!
//! Pure functions that return strings; printing happens in `main`. The
//! stdout text is read by the agent inside the loop and by tooling that
//! greps for its phrases, so it stays plain (no color).

use colored::Colorize;
use std::num::NonZeroU32;

use crate::error::SetupError;
use crate::state::LoopConfig;
use crate::templates;

/// Formats the usage document.
pub(crate) fn format_help() -> String {
    format!("{}\n", templates::HELP)
}

/// Formats the confirmation banner, the prompt, and the promise contract.
pub(crate) fn format_report(config: &LoopConfig) -> String {
    let max_iterations = config
        .max_iterations
        .map_or_else(|| "unlimited".to_string(), |n: NonZeroU32| n.to_string());
    let completion_promise = config.completion_promise.as_deref().map_or_else(
        || "none (runs forever)".to_string(),
        |p| format!("{p} (ONLY output when TRUE - do not lie!)"),
    );

    // Promise text is user input, so it is substituted last.
    let mut out = templates::ACTIVATED
        .replace("{iteration}", &LoopConfig::FIRST_ITERATION.to_string())
        .replace("{max_iterations}", &max_iterations)
        .replace("{completion_promise}", &completion_promise);

    out.push('\n');
    out.push_str(&config.prompt);
    out.push('\n');

    if let Some(promise) = &config.completion_promise {
        out.push_str(&templates::PROMISE_CONTRACT.replace("{completion_promise}", promise));
    }

    out
}

/// Formats any failure for stderr: a marked one-line message, then the
/// remediation block when the failure is a setup error.
pub(crate) fn format_error(err: &anyhow::Error) -> String {
    let marker = "X".red().bold();

    match err.downcast_ref::<SetupError>() {
        Some(setup) => format!("{marker} Error: {setup}\n{}", setup.guidance()),
        None => format!("{marker} Error: {err:#}\n"),
    }
}
