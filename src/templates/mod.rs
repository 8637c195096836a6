//! Embedded text for loop setup output.
//!
//! Placeholders are written as `{name}` and filled by `report`.

/// Usage document for `-h` / `--help`.
pub(crate) const HELP: &str = include_str!("help.txt");

/// Confirmation banner printed after the state file is written.
pub(crate) const ACTIVATED: &str = include_str!("activated.txt");

/// Completion-promise contract, printed only when a promise is set.
pub(crate) const PROMISE_CONTRACT: &str = include_str!("promise_contract.txt");
