//! Harness configuration
//!
//! Resolution priority:
//! 1. `--config <path>` flag (must exist)
//! 2. `$CYPHER_TCK_CONFIG` (must exist when set)
//! 3. `./cypher-tck.toml` if present
//! 4. Built-in defaults
//!
//! `$CYPHER_TCK_RESULTS_DIR` then overrides `results_dir`. Command-line
//! flags are applied on top by the caller.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::outcome::ReportOptions;

pub const CONFIG_ENV: &str = "CYPHER_TCK_CONFIG";
pub const RESULTS_DIR_ENV: &str = "CYPHER_TCK_RESULTS_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "cypher-tck.toml";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// When to colour terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColourMode {
    /// Colour when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColourMode {
    pub fn enabled(&self) -> bool {
        match self {
            ColourMode::Always => true,
            ColourMode::Never => false,
            ColourMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory holding persisted run-result files
    pub results_dir: PathBuf,

    /// File name of the golden baseline inside `results_dir`
    pub golden_file: String,
    pub colour: ColourMode,
    pub top_features: usize,
    pub top_details: usize,
    pub example_categories: usize,
    pub examples_shown: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            golden_file: "golden.json".to_string(),
            colour: ColourMode::Auto,
            top_features: 15,
            top_details: 5,
            example_categories: 10,
            examples_shown: 2,
        }
    }
}

impl HarnessConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Resolve configuration from the flag, the environment and the working
    /// directory
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve_from(
            explicit,
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            &cwd,
            std::env::var_os(RESULTS_DIR_ENV).map(PathBuf::from),
        )
    }

    /// [`HarnessConfig::resolve`] with the environment passed in
    pub fn resolve_from(
        explicit: Option<&Path>,
        env_config: Option<PathBuf>,
        cwd: &Path,
        env_results_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::load(path)?
        } else if let Some(path) = env_config {
            debug!(var = CONFIG_ENV, path = %path.display(), "config from environment");
            Self::load(&path)?
        } else {
            let local = cwd.join(DEFAULT_CONFIG_FILE);
            if local.is_file() {
                Self::load(&local)?
            } else {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };

        if let Some(dir) = env_results_dir {
            debug!(var = RESULTS_DIR_ENV, dir = %dir.display(), "results_dir override");
            config.results_dir = dir;
        }
        Ok(config)
    }

    /// Absolute-or-relative path of the golden baseline file
    pub fn golden_path(&self) -> PathBuf {
        self.results_dir.join(&self.golden_file)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            colour: self.colour.enabled(),
            top_details: self.top_details,
            top_features: self.top_features,
            example_categories: self.example_categories,
            examples_shown: self.examples_shown,
        }
    }
}
