//! Job identity, callable reference, and the record codec.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::ScheduleError;
use crate::core::schedule::JobStore;

/// Opaque unique job identifier; doubles as the record key in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to the callable a worker should invoke, with its arguments.
///
/// The target is resolved by whatever executes the job, never here: the worker
/// usually lives in another process, so resolvability cannot be checked at
/// enqueue time and failures surface at execution time instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSpec {
    /// Dotted path or registry name of the callable.
    pub target: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    /// Keyword arguments.
    #[serde(default)]
    pub kwargs: serde_json::Map<String, serde_json::Value>,
}

impl CallSpec {
    /// Reference `target` with no arguments.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            args: Vec::new(),
            kwargs: serde_json::Map::new(),
        }
    }

    /// Replace the positional arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<serde_json::Value>) -> Self {
        self.args = args;
        self
    }

    /// Add a keyword argument.
    #[must_use]
    pub fn with_kwarg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }
}

/// Failure modes when materializing a job from its record.
///
/// Missing and corrupt records are distinct conditions with distinct handling
/// policies; callers match on the kind instead of inspecting error text.
#[derive(Debug)]
pub enum FetchError {
    /// The store has no record for the id (expired, deleted, or never saved).
    Missing,
    /// A record exists but could not be decoded into a job.
    Corrupt(serde_json::Error),
    /// The store itself failed.
    Store(ScheduleError),
}

impl FetchError {
    /// Promote to a [`ScheduleError`], attaching the owning queue and the id.
    #[must_use]
    pub fn into_schedule_error(self, queue: &str, id: JobId) -> ScheduleError {
        match self {
            Self::Missing => ScheduleError::NoSuchJob(id),
            Self::Corrupt(source) => ScheduleError::Corrupt {
                queue: queue.to_string(),
                id,
                source,
            },
            Self::Store(err) => err,
        }
    }
}

/// A unit of work scheduled for a point in time.
///
/// Records are effectively write-once: after `save` the job is read by id
/// until it is popped, and nothing mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier; doubles as the record key.
    pub id: JobId,
    /// Scheduled execution time; the sort key of the schedule. Past etas are
    /// legal and simply sort first.
    pub eta: DateTime<Utc>,
    /// Callable reference and arguments.
    pub call: CallSpec,
    /// Name of the schedule that enqueued this job; stamped at enqueue time.
    pub origin: Option<String>,
    /// When the job was enqueued; stamped at enqueue time.
    pub enqueued_at: Option<DateTime<Utc>>,
    /// Advisory execution timeout in seconds; enforced by workers, not here.
    pub timeout_secs: Option<u64>,
    /// Optional named destination for post-processing results.
    pub queue: Option<String>,
}

impl Job {
    /// Construct an unpersisted job bound to `call`, to run at `eta`.
    pub fn create(eta: DateTime<Utc>, call: CallSpec) -> Self {
        Self {
            id: JobId::new(),
            eta,
            call,
            origin: None,
            enqueued_at: None,
            timeout_secs: None,
            queue: None,
        }
    }

    /// Route the job's result to a named destination queue.
    #[must_use]
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Override the advisory timeout.
    #[must_use]
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Serialize into the record payload format.
    pub fn encode(&self) -> Result<Vec<u8>, ScheduleError> {
        serde_json::to_vec(self)
            .map_err(|e| ScheduleError::Backend(format!("encode job {}: {e}", self.id)))
    }

    /// Decode a record payload.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Retrieve a previously persisted job by identifier.
    pub fn fetch<S: JobStore + ?Sized>(store: &S, id: &JobId) -> Result<Self, FetchError> {
        match store.get_record(id) {
            Ok(Some(payload)) => Self::decode(&payload).map_err(FetchError::Corrupt),
            Ok(None) => Err(FetchError::Missing),
            Err(err) => Err(FetchError::Store(err)),
        }
    }

    /// Persist the job's current state, creating or overwriting its record.
    pub fn save<S: JobStore + ?Sized>(&self, store: &S) -> Result<(), ScheduleError> {
        store.put_record(&self.id, &self.encode()?)
    }
}
