//! Backoff policy for optimistic-concurrency conflicts.

use std::time::Duration;

use crate::config::RetryConfig;

/// Governs how index-write conflicts are retried.
///
/// The default retries indefinitely with a capped exponential delay between
/// attempts, matching the expectation that conflicts are transient and rare.
/// An attempt ceiling is opt-in; past it the operation surfaces a contention
/// error instead of looping forever.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    base_delay: Duration,
    max_delay: Duration,
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry indefinitely with the default delay range.
    pub const fn unbounded() -> Self {
        Self {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(50),
            max_attempts: None,
        }
    }

    /// Retry at most `max_attempts` times before giving up.
    pub const fn bounded(max_attempts: u32) -> Self {
        Self {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(50),
            max_attempts: Some(max_attempts),
        }
    }

    /// Override the delay range.
    #[must_use]
    pub const fn with_delays(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    /// Build a policy from configuration values.
    pub const fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
            max_attempts: cfg.max_attempts,
        }
    }

    /// Whether another attempt is allowed after `attempts` conflicts so far.
    pub fn allows(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts <= max)
    }

    /// Delay before retry number `attempt` (1-based), exponentially increasing
    /// up to the configured ceiling.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1_u32 << exp);
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}
