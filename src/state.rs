use anyhow::Result;
use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// State file read by the stop hook, relative to the project directory.
pub(crate) const STATE_FILE: &str = ".claude/ralph-loop.local.md";

/// `started_at` layout: UTC, second precision, literal `Z`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source of the current time, injected so state rendering stays deterministic.
pub(crate) trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fresh Ralph loop. Every setup creates a new one; nothing is resumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoopConfig {
    pub prompt: String,
    /// `None` means unlimited.
    pub max_iterations: Option<NonZeroU32>,
    /// `None` means the loop runs until the iteration limit, or forever.
    pub completion_promise: Option<String>,
}

impl LoopConfig {
    /// Iteration number written for a new loop.
    pub const FIRST_ITERATION: u32 = 1;

    /// Builds a config from raw values. A limit of 0 and an empty promise
    /// both mean "not set".
    pub fn new(prompt: String, max_iterations: u32, completion_promise: Option<String>) -> Self {
        Self {
            prompt,
            max_iterations: NonZeroU32::new(max_iterations),
            completion_promise: completion_promise.filter(|p| !p.is_empty()),
        }
    }

    /// Renders the state document: a YAML-style header followed by the prompt.
    ///
    /// The promise is wrapped in double quotes as-is. The stop hook strips the
    /// surrounding quotes and compares the rest literally, so escaping would
    /// change what it looks for.
    pub fn render(&self, started_at: DateTime<Utc>) -> String {
        let max_iterations = self.max_iterations.map_or(0, NonZeroU32::get);
        let completion_promise = self
            .completion_promise
            .as_deref()
            .map_or_else(|| "null".to_string(), |p| format!("\"{p}\""));

        format!(
            "---\n\
             active: true\n\
             iteration: {iteration}\n\
             max_iterations: {max_iterations}\n\
             completion_promise: {completion_promise}\n\
             started_at: \"{started_at}\"\n\
             ---\n\
             \n\
             {prompt}\n",
            iteration = Self::FIRST_ITERATION,
            started_at = started_at.format(TIMESTAMP_FORMAT),
            prompt = self.prompt,
        )
    }
}

/// Writes a fresh state file, replacing any previous one.
///
/// Takes closures for IO operations to enable testing:
/// - `create_dir`: creates a directory (and parents), must be idempotent
/// - `write_file`: writes content to a path, truncating what was there
///
/// Returns the relative path that was written.
pub(crate) fn write_state<D, W>(
    config: &LoopConfig,
    started_at: DateTime<Utc>,
    create_dir: D,
    write_file: W,
) -> Result<PathBuf>
where
    D: FnOnce(&Path) -> Result<()>,
    W: FnOnce(&Path, &str) -> Result<()>,
{
    let state_path = PathBuf::from(STATE_FILE);

    if let Some(parent) = state_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }

    write_file(&state_path, &config.render(started_at))?;

    Ok(state_path)
}

/// Header fields read back from a state document, the way the stop hook
/// reads them: one `key: value` per line between the `---` fences.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateHeader {
    pub active: bool,
    pub iteration: u32,
    pub max_iterations: Option<NonZeroU32>,
    pub completion_promise: Option<String>,
    pub started_at: DateTime<Utc>,
    pub prompt: String,
}

#[cfg(test)]
impl StateHeader {
    pub fn parse(document: &str) -> Result<Self> {
        use anyhow::{bail, Context};
        use std::collections::HashMap;

        let Some(rest) = document.strip_prefix("---\n") else {
            bail!("State document does not start with a header fence");
        };
        let Some((header, body)) = rest.split_once("\n---\n") else {
            bail!("State header is not closed");
        };

        let fields: HashMap<&str, &str> = header
            .lines()
            .filter_map(|line| line.split_once(": "))
            .collect();
        let field = |key: &str| {
            fields
                .get(key)
                .copied()
                .with_context(|| format!("Missing header field: {key}"))
        };
        let unquote = |value: &str| {
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .map(str::to_string)
        };

        let completion_promise = match field("completion_promise")? {
            "null" => None,
            quoted => Some(unquote(quoted).context("completion_promise is not quoted")?),
        };
        let started_at = unquote(field("started_at")?).context("started_at is not quoted")?;
        let started_at = chrono::NaiveDateTime::parse_from_str(&started_at, TIMESTAMP_FORMAT)
            .context("Invalid started_at")?
            .and_utc();

        let prompt = body
            .strip_prefix('\n')
            .and_then(|b| b.strip_suffix('\n'))
            .context("Prompt body is not framed by newlines")?
            .to_string();

        Ok(Self {
            active: field("active")?.parse::<bool>().context("Invalid active")?,
            iteration: field("iteration")?.parse::<u32>().context("Invalid iteration")?,
            max_iterations: NonZeroU32::new(
                field("max_iterations")?
                    .parse::<u32>()
                    .context("Invalid max_iterations")?,
            ),
            completion_promise,
            started_at,
            prompt,
        })
    }
}
