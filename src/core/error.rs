//! Error types for schedule operations.

use thiserror::Error;

use crate::core::job::JobId;

/// Errors produced by schedule and store operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The requested job id has no backing record in the store.
    #[error("no such job: {0}")]
    NoSuchJob(JobId),
    /// A record exists but could not be decoded into a job.
    #[error("corrupt job record {id} in queue `{queue}`")]
    Corrupt {
        /// Queue the record belongs to.
        queue: String,
        /// The offending job id.
        id: JobId,
        /// Decode failure detail.
        #[source]
        source: serde_json::Error,
    },
    /// A bounded retry policy exhausted its attempts on index conflicts.
    #[error("index contention on queue `{queue}` after {attempts} attempts")]
    Contention {
        /// Queue whose index kept changing under the writer.
        queue: String,
        /// Conflicts observed before giving up.
        attempts: u32,
    },
    /// Backend-specific failure with context.
    #[error("store error: {0}")]
    Backend(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
