//! Configuration management for tubechat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TubechatError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for tubechat
///
/// Holds everything the client needs: where the inference backend lives
/// and how the summary poller behaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Summary poller configuration
    #[serde(default)]
    pub poller: PollerConfig,
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the inference backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Summary poller configuration
///
/// The poller asks the backend for the summary at a fixed period; the
/// first attempt happens after one full interval has elapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between summary poll attempts
    #[serde(default = "default_poll_interval")]
    pub interval_seconds: u64,
}

fn default_poll_interval() -> u64 {
    5
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_poll_interval(),
        }
    }
}

impl PollerConfig {
    /// Poll interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TubechatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TubechatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("TUBECHAT_BACKEND_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(interval) = std::env::var("TUBECHAT_POLL_INTERVAL_SECONDS") {
            if let Ok(value) = interval.parse() {
                self.poller.interval_seconds = value;
            } else {
                tracing::warn!("Invalid TUBECHAT_POLL_INTERVAL_SECONDS: {}", interval);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(backend_url) = &cli.backend_url {
            self.backend.base_url = backend_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the backend URL is empty or the poll interval is zero
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(TubechatError::Config("backend.base_url must not be empty".to_string()).into());
        }

        if self.poller.interval_seconds == 0 {
            return Err(TubechatError::Config(
                "poller.interval_seconds must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            poller: PollerConfig::default(),
        }
    }
}
