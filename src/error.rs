//! Error types for tubechat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for tubechat operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, backend interactions, and session orchestration.
#[derive(Error, Debug)]
pub enum TubechatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend transport or protocol errors (unexpected status, bad body)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Video ingestion was rejected or network-failed; the session reverts
    /// to empty and the user must resubmit
    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for tubechat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
