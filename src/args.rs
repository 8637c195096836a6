//! Command-line scanning for loop setup.
//!
//! Tokens are consumed left to right against a small flag table. Anything
//! that is not a recognized flag becomes a prompt word, so flags can be
//! interleaved freely with the task description.

use tracing::debug;

use crate::config::LoopDefaults;
use crate::error::SetupError;
use crate::state::LoopConfig;

// -----------------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------------

/// Flags that take a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flag {
    MaxIterations,
    CompletionPromise,
}

impl Flag {
    /// The flag as typed on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::MaxIterations => "--max-iterations",
            Self::CompletionPromise => "--completion-promise",
        }
    }

    /// Kind of value the flag expects, for error messages.
    pub fn expects(self) -> &'static str {
        match self {
            Self::MaxIterations => "number",
            Self::CompletionPromise => "text",
        }
    }
}

/// Result of a single left-to-right pass over the tokens.
///
/// Flag values stay raw here: `Some(0)` means "explicitly unlimited" and
/// `Some("")` means "explicitly no promise", both of which must override
/// project defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ScannedArgs {
    pub show_help: bool,
    pub prompt_words: Vec<String>,
    pub max_iterations: Option<u32>,
    pub completion_promise: Option<String>,
}

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Invocation {
    /// Print usage and stop.
    Help,
    /// Write a fresh loop state.
    Setup(SetupRequest),
}

/// A validated setup request, before project defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SetupRequest {
    pub prompt: String,
    pub max_iterations: Option<u32>,
    pub completion_promise: Option<String>,
}

/// Scans and validates command-line tokens.
pub(crate) fn parse<I, S>(tokens: I) -> Result<Invocation, SetupError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    scan(tokens)?.into_invocation()
}

/// Scans tokens against the flag table.
///
/// A flag error does not stop the scan: if a help flag shows up anywhere,
/// help wins and the error is dropped. Otherwise the first error is returned.
pub(crate) fn scan<I, S>(tokens: I) -> Result<ScannedArgs, SetupError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = ScannedArgs::default();
    let mut first_error = None;
    let mut tokens = tokens.into_iter().map(Into::<String>::into);

    while let Some(token) = tokens.next() {
        let Some(spec) = lookup(&token) else {
            args.prompt_words.push(token);
            continue;
        };

        match spec.arity {
            Arity::Switch(apply) => apply(&mut args),
            Arity::Value(flag, apply) => match tokens.next() {
                Some(value) => {
                    debug!("{} = {:?}", flag.name(), value);
                    if let Err(err) = apply(&mut args, value) {
                        first_error.get_or_insert(err);
                    }
                }
                None => {
                    first_error.get_or_insert(SetupError::missing_argument_value(flag));
                }
            },
        }
    }

    match first_error {
        Some(err) if !args.show_help => Err(err),
        _ => Ok(args),
    }
}

impl ScannedArgs {
    /// Applies the help short-circuit and prompt validation.
    pub fn into_invocation(self) -> Result<Invocation, SetupError> {
        if self.show_help {
            return Ok(Invocation::Help);
        }

        let prompt = self.prompt_words.join(" ");
        if prompt.trim().is_empty() {
            return Err(SetupError::EmptyPrompt);
        }

        Ok(Invocation::Setup(SetupRequest {
            prompt,
            max_iterations: self.max_iterations,
            completion_promise: self.completion_promise,
        }))
    }
}

impl SetupRequest {
    /// Fills unset flags from project defaults. Explicit flags always win.
    pub fn into_loop_config(self, defaults: &LoopDefaults) -> LoopConfig {
        let max_iterations = self.max_iterations.unwrap_or(defaults.max_iterations);
        let completion_promise = self
            .completion_promise
            .or_else(|| defaults.completion_promise.clone());

        LoopConfig::new(self.prompt, max_iterations, completion_promise)
    }
}

// -----------------------------------------------------------------------------
// Flag table
// -----------------------------------------------------------------------------

/// How many tokens a flag consumes and what it does with them.
#[derive(Clone, Copy)]
enum Arity {
    Switch(fn(&mut ScannedArgs)),
    Value(Flag, fn(&mut ScannedArgs, String) -> Result<(), SetupError>),
}

struct FlagSpec {
    names: &'static [&'static str],
    arity: Arity,
}

const FLAGS: &[FlagSpec] = &[
    FlagSpec {
        names: &["-h", "--help"],
        arity: Arity::Switch(request_help),
    },
    FlagSpec {
        names: &["--max-iterations"],
        arity: Arity::Value(Flag::MaxIterations, set_max_iterations),
    },
    FlagSpec {
        names: &["--completion-promise"],
        arity: Arity::Value(Flag::CompletionPromise, set_completion_promise),
    },
];

fn lookup(token: &str) -> Option<&'static FlagSpec> {
    FLAGS.iter().find(|spec| spec.names.contains(&token))
}

fn request_help(args: &mut ScannedArgs) {
    args.show_help = true;
}

fn set_max_iterations(args: &mut ScannedArgs, value: String) -> Result<(), SetupError> {
    // Digits only: rejects signs, decimals and whitespace before `parse` sees them.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SetupError::invalid_argument_value(Flag::MaxIterations, value));
    }

    let limit = value
        .parse::<u32>()
        .map_err(|_| SetupError::invalid_argument_value(Flag::MaxIterations, value))?;
    args.max_iterations = Some(limit);
    Ok(())
}

fn set_completion_promise(args: &mut ScannedArgs, value: String) -> Result<(), SetupError> {
    args.completion_promise = Some(value);
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn setup(tokens: &[&str]) -> SetupRequest {
        match parse(tokens.iter().copied()).unwrap() {
            Invocation::Setup(request) => request,
            Invocation::Help => panic!("expected setup, got help"),
        }
    }

    #[test]
    fn test_plain_words_join_in_order() {
        let request = setup(&["Refactor", "cache", "layer"]);
        assert_eq!(request.prompt, "Refactor cache layer");
        assert_eq!(request.max_iterations, None);
        assert_eq!(request.completion_promise, None);
    }

    #[test]
    fn test_flags_interleaved_with_prompt() {
        let request = setup(&[
            "Build",
            "a",
            "todo",
            "API",
            "--completion-promise",
            "DONE",
            "--max-iterations",
            "20",
        ]);
        assert_eq!(request.prompt, "Build a todo API");
        assert_eq!(request.max_iterations, Some(20));
        assert_eq!(request.completion_promise.as_deref(), Some("DONE"));

        let request = setup(&["--max-iterations", "10", "Fix", "the", "auth", "bug"]);
        assert_eq!(request.prompt, "Fix the auth bug");
        assert_eq!(request.max_iterations, Some(10));
    }

    #[test]
    fn test_zero_iterations_then_prompt() {
        let request = setup(&["--max-iterations", "0", "x"]);
        assert_eq!(request.prompt, "x");
        assert_eq!(request.max_iterations, Some(0));

        let config = request.into_loop_config(&LoopDefaults::default());
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn test_max_iterations_missing_value() {
        let err = parse(["--max-iterations"]).unwrap_err();
        assert_eq!(err, SetupError::missing_argument_value(Flag::MaxIterations));
    }

    #[test]
    fn test_completion_promise_missing_value() {
        let err = parse(["Fix", "it", "--completion-promise"]).unwrap_err();
        assert_eq!(
            err,
            SetupError::missing_argument_value(Flag::CompletionPromise)
        );
    }

    #[test]
    fn test_max_iterations_rejects_non_digits() {
        for value in ["abc", "-5", "10.5", "+3", " 7", ""] {
            let err = parse(["--max-iterations", value, "go"]).unwrap_err();
            assert_eq!(
                err,
                SetupError::invalid_argument_value(Flag::MaxIterations, value),
                "value {value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_max_iterations_overflow_is_invalid() {
        let err = parse(["--max-iterations", "99999999999999999999", "go"]).unwrap_err();
        assert!(err.is_invalid_argument_value());
    }

    #[test]
    fn test_repeated_flags_last_wins() {
        let request = setup(&["--max-iterations", "5", "--max-iterations", "10", "go"]);
        assert_eq!(request.max_iterations, Some(10));

        let request = setup(&[
            "--completion-promise",
            "FIRST",
            "go",
            "--completion-promise",
            "SECOND",
        ]);
        assert_eq!(request.completion_promise.as_deref(), Some("SECOND"));
    }

    #[test]
    fn test_completion_promise_kept_verbatim() {
        let request = setup(&["--completion-promise", "  Task Complete  ", "go"]);
        assert_eq!(
            request.completion_promise.as_deref(),
            Some("  Task Complete  ")
        );
    }

    #[test]
    fn test_completion_promise_does_not_rejoin_words() {
        let request = setup(&["--completion-promise", "TASK", "COMPLETE", "Create", "API"]);
        assert_eq!(request.completion_promise.as_deref(), Some("TASK"));
        assert_eq!(request.prompt, "COMPLETE Create API");
    }

    #[test]
    fn test_flag_value_may_look_like_a_flag() {
        let request = setup(&["--completion-promise", "--help", "go"]);
        assert_eq!(request.completion_promise.as_deref(), Some("--help"));
        assert_eq!(request.prompt, "go");
    }

    #[test]
    fn test_unknown_flags_are_prompt_words() {
        let request = setup(&["--verbose", "fix", "-x"]);
        assert_eq!(request.prompt, "--verbose fix -x");
    }

    #[test]
    fn test_empty_prompt() {
        assert_eq!(parse(Vec::<String>::new()).unwrap_err(), SetupError::EmptyPrompt);
        assert_eq!(
            parse(["--max-iterations", "5"]).unwrap_err(),
            SetupError::EmptyPrompt
        );
    }

    #[test]
    fn test_whitespace_prompt_is_empty() {
        assert_eq!(parse(["   "]).unwrap_err(), SetupError::EmptyPrompt);
        assert_eq!(parse(["", "\t", " "]).unwrap_err(), SetupError::EmptyPrompt);
    }

    #[test]
    fn test_prompt_kept_untrimmed() {
        let request = setup(&[" padded ", "words"]);
        assert_eq!(request.prompt, " padded  words");
    }

    #[test]
    fn test_help_short_circuits() {
        assert_eq!(parse(["-h", "--max-iterations", "abc"]).unwrap(), Invocation::Help);
        assert_eq!(parse(["--max-iterations", "abc", "--help"]).unwrap(), Invocation::Help);
        assert_eq!(parse(["--help", "--completion-promise"]).unwrap(), Invocation::Help);
        assert_eq!(parse(["--help"]).unwrap(), Invocation::Help);
    }

    #[test]
    fn test_first_error_wins_without_help() {
        let err = parse(["--max-iterations", "abc", "go", "--max-iterations"]).unwrap_err();
        assert_eq!(
            err,
            SetupError::invalid_argument_value(Flag::MaxIterations, "abc")
        );
    }

    #[test]
    fn test_scan_collects_raw_values() {
        let scanned = scan(["a", "--max-iterations", "0", "--completion-promise", "", "b"]).unwrap();
        assert!(!scanned.show_help);
        assert_eq!(scanned.prompt_words, vec!["a", "b"]);
        assert_eq!(scanned.max_iterations, Some(0));
        assert_eq!(scanned.completion_promise.as_deref(), Some(""));
    }

    #[test]
    fn test_defaults_fill_unset_flags() {
        let defaults = LoopDefaults {
            max_iterations: 25,
            completion_promise: Some("SHIPPED".to_string()),
        };

        let config = setup(&["go"]).into_loop_config(&defaults);
        assert_eq!(config.max_iterations, NonZeroU32::new(25));
        assert_eq!(config.completion_promise.as_deref(), Some("SHIPPED"));
    }

    #[test]
    fn test_explicit_flags_override_defaults() {
        let defaults = LoopDefaults {
            max_iterations: 25,
            completion_promise: Some("SHIPPED".to_string()),
        };

        let config = setup(&["go", "--max-iterations", "0", "--completion-promise", ""])
            .into_loop_config(&defaults);
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.completion_promise, None);
    }
}
