//! Tool executor configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Per-invocation limits applied by the tool executor
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
    /// Timeout for a single tool invocation in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after a retryable tool failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds, doubled per attempt
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Validate executor configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 || self.timeout_ms > 120_000 {
            return Err(ValidationError::InvalidTimeout("executor.timeout_ms"));
        }
        if self.max_retries > 10 {
            return Err(ValidationError::TooManyRetries("executor.max_retries"));
        }
        Ok(())
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    200
}
