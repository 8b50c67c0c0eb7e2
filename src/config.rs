use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AdapterError, Result};

const DEFAULT_CONFIG_PATH: &str = "mind_adapters.toml";
const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_LOG_FILTER: &str = "mind_adapters=info";

/// Main configuration structure loaded from mind_adapters.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub schema: SchemaConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    /// File the configuration was read from, `None` when defaults were used
    #[serde(skip)]
    pub source: Option<PathBuf>,
    /// MIND_ADAPTERS_* variables that overrode file values
    #[serde(skip)]
    pub env_overrides: Vec<String>,
}

/// Schema rewriting behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Model whose profile drives the rewrite
    pub model_name: String,
    /// Treat capability-loss warnings as a failed rewrite (CLI only)
    pub fail_on_warning: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            fail_on_warning: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing-subscriber EnvFilter directive, used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn env_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Config {
    /// Load configuration from file and environment variables.
    /// Uses MIND_ADAPTERS_CONFIG environment variable or defaults to "mind_adapters.toml"
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("MIND_ADAPTERS_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("MIND_ADAPTERS_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        // Missing file means defaults; the caller reports it once logging is up.
        let mut config = if Path::new(&config_path).exists() {
            Self::read_file(Path::new(&config_path))?
        } else {
            Self::default()
        };

        config.env_overrides = config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config file without consulting the environment
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML into a config. Validation is left to the caller so that
    /// env overrides can still fill in missing values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AdapterError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply MIND_ADAPTERS_* overrides from `lookup`, returning the keys that were set
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied: Vec<String> = Vec::new();
        if let Some(model) = lookup("MIND_ADAPTERS_MODEL") {
            self.schema.model_name = model;
            applied.push("MIND_ADAPTERS_MODEL".to_string());
        }
        if let Some(pretty) = lookup("MIND_ADAPTERS_PRETTY") {
            self.output.pretty = env_flag(&pretty);
            applied.push("MIND_ADAPTERS_PRETTY".to_string());
        }
        if let Some(fail) = lookup("MIND_ADAPTERS_FAIL_ON_WARNING") {
            self.schema.fail_on_warning = env_flag(&fail);
            applied.push("MIND_ADAPTERS_FAIL_ON_WARNING".to_string());
        }
        if let Some(filter) = lookup("MIND_ADAPTERS_LOG") {
            self.logging.filter = filter;
            applied.push("MIND_ADAPTERS_LOG".to_string());
        }
        applied
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema.model_name.trim().is_empty() {
            return Err(AdapterError::Config {
                message: "schema.model_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
