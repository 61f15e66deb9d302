//! Configuration management for the fgagraph CLI.
//!
//! Configuration is layered from multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML), when `--config` is given
//! 3. Environment variables (override)
//!
//! Command-line flags are applied on top of the loaded configuration by the
//! binary.
//!
//! # Example
//!
//! ```ignore
//! use fgagraph_cli::config::CliConfig;
//!
//! // Load from file with env overrides
//! let config = CliConfig::load("fgagraph.yaml")?;
//!
//! // Or load from environment only
//! let config = CliConfig::from_env()?;
//! ```

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CliConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// DOT rendering settings
    #[serde(default)]
    pub render: RenderSettings,

    /// Cycle analysis settings
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format instead of human readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// DOT rendering settings.
///
/// Environment variable: `FGAGRAPH_RENDER__PRUNE`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RenderSettings {
    /// Drop nodes without edges from the DOT output.
    #[serde(default = "default_true")]
    pub prune: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { prune: true }
    }
}

fn default_true() -> bool {
    true
}

/// Cycle analysis settings.
///
/// Environment variable: `FGAGRAPH_ANALYSIS__FAIL_ON_DEFINITIVE_CYCLES`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AnalysisSettings {
    /// Exit with an error when the model contains a definitive cycle.
    #[serde(default)]
    pub fail_on_definitive_cycles: bool,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

const ENV_PREFIX: &str = "FGAGRAPH";

impl CliConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `FGAGRAPH_` and use `__` as separator.
    /// For example:
    /// - `FGAGRAPH_LOGGING__LEVEL=debug` overrides `logging.level`
    /// - `FGAGRAPH_RENDER__PRUNE=false` overrides `render.prune`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&CliConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let cli_config: CliConfig = config.try_deserialize()?;
        cli_config.validate()?;

        Ok(cli_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&CliConfig::default())?)
            .add_source(env_source())
            .build()?;

        let cli_config: CliConfig = config.try_deserialize()?;
        cli_config.validate()?;

        Ok(cli_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

// FGAGRAPH_RENDER__PRUNE -> render.prune
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
