use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const CONFIG_FILE: &str = "ralph.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: LoopDefaults,
}

/// Project-wide defaults applied when a flag is not given on the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopDefaults {
    /// Maximum iterations before auto-stop
    /// - Default: 0 (unlimited)
    #[serde(default)]
    pub max_iterations: u32,

    /// Completion promise phrase (optional, none means the loop runs forever)
    #[serde(default)]
    pub completion_promise: Option<String>,
}

impl Config {
    /// Load configuration from file, using defaults if not found
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            debug!("No {} found, using built-in defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        debug!("Loaded {}: {:?}", config_path.display(), config.defaults);
        Ok(config)
    }
}
