//! Core scheduling abstractions: jobs, the schedule, and its store contract.

pub mod audit;
pub mod error;
pub mod job;
pub mod schedule;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, ScheduleError};
pub use job::{CallSpec, FetchError, Job, JobId};
pub use schedule::{
    EnqueueOptions, JobStore, Schedule, Version, VersionedIndex, WriteOutcome,
    DEFAULT_TIMEOUT_SECS,
};
