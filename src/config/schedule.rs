//! Schedule and store backend configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    InMemory,
    /// File-backed store rooted at `data_dir`.
    File,
}

/// Conflict retry tuning for optimistic index writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry, milliseconds.
    pub base_delay_ms: u64,
    /// Ceiling for the exponential delay, milliseconds.
    pub max_delay_ms: u64,
    /// Maximum retry attempts; `None` retries indefinitely.
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1,
            max_delay_ms: 50,
            max_attempts: None,
        }
    }
}

/// Per-queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Advisory timeout stamped on jobs that do not carry their own, seconds.
    pub default_timeout_secs: u64,
    /// Conflict retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Root scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Store backend selection.
    pub store: StoreBackendConfig,
    /// Root directory for the file backend.
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Map of queue name to configuration.
    pub queues: HashMap<String, QueueConfig>,
}

impl QueueConfig {
    /// Validate per-queue values.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_timeout_secs == 0 {
            return Err("default_timeout_secs must be greater than 0".into());
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err("max_delay_ms must not be less than base_delay_ms".into());
        }
        if self.retry.max_attempts == Some(0) {
            return Err("max_attempts must be greater than 0 when set".into());
        }
        Ok(())
    }
}

impl SchedulerConfig {
    /// Validate all queues and backend requirements.
    pub fn validate(&self) -> Result<(), String> {
        if self.queues.is_empty() {
            return Err("at least one queue must be defined".into());
        }
        if matches!(self.store, StoreBackendConfig::File) && self.data_dir.is_none() {
            return Err("file store requires data_dir".into());
        }
        for (name, queue) in &self.queues {
            queue
                .validate()
                .map_err(|e| format!("queue `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the file named by `CHRONOQ_CONFIG`, honoring a
    /// local `.env` file.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let path =
            std::env::var("CHRONOQ_CONFIG").map_err(|_| "CHRONOQ_CONFIG is not set".to_string())?;
        let raw = std::fs::read_to_string(&path).map_err(|e| format!("read {path}: {e}"))?;
        Self::from_json_str(&raw)
    }
}
