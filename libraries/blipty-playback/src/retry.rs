//! Exponential backoff policy for stream reloads

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry limits and delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts allowed before giving up
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

/// Attempt counter with capped exponential delay
///
/// The delay for the current attempt count `n` is
/// `min(base_delay * 2^n, max_delay)`. Overflow saturates at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    config: RetryConfig,
    attempt_count: u32,
}

impl RetryStrategy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            attempt_count: 0,
        }
    }

    /// Whether another attempt is allowed
    pub fn should_retry(&self) -> bool {
        self.attempt_count < self.config.max_retries
    }

    /// Delay to wait before the next attempt
    pub fn delay(&self) -> Duration {
        let base_ms = u64::try_from(self.config.base_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.config.max_delay.as_millis()).unwrap_or(u64::MAX);
        let factor = 2u64.saturating_pow(self.attempt_count);

        Duration::from_millis(base_ms.saturating_mul(factor).min(max_ms))
    }

    pub fn increment(&mut self) {
        self.attempt_count = self.attempt_count.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.attempt_count = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempt_count
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
