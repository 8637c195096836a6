//! Domain-specific error types for loop setup.
//!
//! Typed errors let the entry point print the remediation block that
//! belongs to each failure instead of parsing message strings.

use crate::args::Flag;

/// Errors raised while turning command-line tokens into a loop config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum SetupError {
    /// A flag that takes a value was the last token.
    #[error("{} requires a {} argument", .flag.name(), .flag.expects())]
    MissingArgumentValue { flag: Flag },

    /// `--max-iterations` was followed by something other than digits.
    #[error("{} must be a positive integer or 0, got: {value}", .flag.name())]
    InvalidArgumentValue { flag: Flag, value: String },

    /// Nothing but whitespace was left after joining the prompt words.
    #[error("No prompt provided")]
    EmptyPrompt,
}

impl SetupError {
    /// Creates a `MissingArgumentValue` error.
    pub fn missing_argument_value(flag: Flag) -> Self {
        Self::MissingArgumentValue { flag }
    }

    /// Creates an `InvalidArgumentValue` error.
    pub fn invalid_argument_value(flag: Flag, value: impl Into<String>) -> Self {
        Self::InvalidArgumentValue {
            flag,
            value: value.into(),
        }
    }

    /// Returns true if a flag value was missing.
    #[allow(dead_code)] // Public API for callers
    pub fn is_missing_argument_value(&self) -> bool {
        matches!(self, Self::MissingArgumentValue { .. })
    }

    /// Returns true if a flag value failed validation.
    #[allow(dead_code)] // Public API for callers
    pub fn is_invalid_argument_value(&self) -> bool {
        matches!(self, Self::InvalidArgumentValue { .. })
    }

    /// Returns true if the prompt was empty.
    #[allow(dead_code)] // Public API for callers
    pub fn is_empty_prompt(&self) -> bool {
        matches!(self, Self::EmptyPrompt)
    }

    /// Remediation printed after the one-line message.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::MissingArgumentValue {
                flag: Flag::MaxIterations,
            } => MISSING_MAX_ITERATIONS,
            Self::MissingArgumentValue {
                flag: Flag::CompletionPromise,
            } => MISSING_COMPLETION_PROMISE,
            Self::InvalidArgumentValue { .. } => INVALID_MAX_ITERATIONS,
            Self::EmptyPrompt => EMPTY_PROMPT,
        }
    }
}

const MISSING_MAX_ITERATIONS: &str = "
   Valid examples:
     --max-iterations 10
     --max-iterations 50
     --max-iterations 0  (unlimited)

   You provided: --max-iterations (with no number)
";

const INVALID_MAX_ITERATIONS: &str = "
   Valid examples:
     --max-iterations 10
     --max-iterations 50
     --max-iterations 0  (unlimited)

   Invalid: decimals (10.5), negative numbers (-5), text
";

const MISSING_COMPLETION_PROMISE: &str = "
   Valid examples:
     --completion-promise 'DONE'
     --completion-promise 'TASK COMPLETE'
     --completion-promise 'All tests passing'

   You provided: --completion-promise (with no text)

   Note: Multi-word promises must be quoted!
";

const EMPTY_PROMPT: &str = "
   Ralph needs a task description to work on.

   Examples:
     /ralph-loop Build a REST API for todos
     /ralph-loop Fix the auth bug --max-iterations 20
     /ralph-loop --completion-promise 'DONE' Refactor code

   For all options: /ralph-loop --help
";
