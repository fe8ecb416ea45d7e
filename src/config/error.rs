//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidHost,

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Retry count exceeds maximum allowed (10): {0}")]
    TooManyRetries(&'static str),

    #[error("max_tool_rounds must be between 1 and 20")]
    InvalidToolRounds,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("search_max_results must be between 1 and 10")]
    InvalidSearchMaxResults,

    #[error("max_connections_per_host must be between 1 and 256")]
    InvalidConnectionLimit,
}
