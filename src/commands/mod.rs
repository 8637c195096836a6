//! CLI command implementations.
//!
//! Each submodule implements a Ralph command with pure core logic
//! separated from IO for testability.

pub mod setup;
