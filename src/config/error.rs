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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),

    #[error("Poll interval must be greater than zero")]
    InvalidPollInterval,

    #[error("Maximum wait must be greater than zero")]
    InvalidMaxWait,

    #[error("Poll interval ({poll_interval_ms}ms) must be shorter than maximum wait ({max_wait_ms}ms)")]
    PollIntervalExceedsMaxWait {
        poll_interval_ms: u64,
        max_wait_ms: u64,
    },
}
