//! Convergence configuration - long-poll timing and push delivery

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Timing for the long poll and the push switch
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ConvergenceConfig {
    /// How often a waiting long poll re-reads the store
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Longest a long poll may block
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,

    /// Whether state is pushed to connected viewers
    #[serde(default = "default_push_enabled")]
    pub push_enabled: bool,
}

impl ConvergenceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    /// Validate convergence configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.max_wait_ms == 0 {
            return Err(ValidationError::InvalidMaxWait);
        }
        if self.poll_interval_ms >= self.max_wait_ms {
            return Err(ValidationError::PollIntervalExceedsMaxWait {
                poll_interval_ms: self.poll_interval_ms,
                max_wait_ms: self.max_wait_ms,
            });
        }
        Ok(())
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_ms: default_max_wait_ms(),
            push_enabled: default_push_enabled(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_wait_ms() -> u64 {
    5_000
}

fn default_push_enabled() -> bool {
    true
}
