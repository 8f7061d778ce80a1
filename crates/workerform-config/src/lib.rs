//! Configuration for workerform.
//!
//! Values are layered, lowest priority first:
//!
//! 1. built-in defaults
//! 2. a TOML file (explicit path, or `workerform.toml` in the working directory)
//! 3. environment variables prefixed with `WORKERFORM`, using `__` as the
//!    section separator, e.g. `WORKERFORM__API__TOKEN` or
//!    `WORKERFORM__RETRY__MAX_RETRIES=2`

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "workerform.toml";
pub const ENV_PREFIX: &str = "WORKERFORM";

/// Upper bound on configured retries; anything above is almost certainly a typo.
const MAX_RETRIES_LIMIT: u32 = 20;

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config build error: {0}")]
    Build(#[source] config::ConfigError),

    #[error("config deserialize error: {0}")]
    Deserialize(#[source] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token. Prefer the environment over writing it into the file.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_max_retries() -> u32 {
    5
}

fn default_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::validation(format!("api.base_url is invalid: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "api.base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.retry.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::validation(format!(
                "retry.max_retries must be <= {MAX_RETRIES_LIMIT}"
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::validation("logging.level must not be empty"));
        }
        Ok(())
    }
}

pub mod loader {
    use std::path::PathBuf;

    use config::{Config, Environment, File};

    use super::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE, ENV_PREFIX, Result};

    pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., WORKERFORM__RETRY__DELAY_MS=250
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder.build().map_err(ConfigError::Build)?;
        let merged: AppConfig = cfg.try_deserialize().map_err(ConfigError::Deserialize)?;
        merged.validate()?;
        Ok(merged)
    }
}

pub use loader::load_config;
