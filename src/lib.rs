//! # chronoq
//!
//! A date-ordered job queue backed by an optimistic-concurrency key-value store.
//!
//! Producers enqueue jobs with an execution time (`eta`); the schedule keeps a
//! persisted index of job ids in ascending eta order, and consumers pop the
//! earliest job. Every index mutation goes through a versioned read /
//! conditional write cycle that is retried on conflict, so arbitrary threads
//! and processes can share one schedule without a lock service and without ever
//! observing a torn index.
//!
//! ## Core Problem Solved
//!
//! Deferred work needs a shared, time-ordered queue with predictable failure
//! behavior:
//!
//! - **Chronological dispatch**: the next job out is always the earliest eta,
//!   regardless of enqueue order
//! - **No coordinator**: concurrent producers and consumers reconcile through
//!   compare-version-and-swap on the index, not through mutual exclusion
//! - **Orphan tolerance**: index entries whose records vanished are skipped on
//!   dequeue and pruned by compaction, without losing valid work
//! - **Corruption is loud**: an undecodable record aborts the dequeue with the
//!   queue and job identity attached, instead of being silently dropped
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use chronoq::core::{CallSpec, Schedule};
//! use chronoq::infra::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let schedule = Schedule::new("reports", store);
//!
//! let eta = Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap();
//! schedule.enqueue(eta, CallSpec::new("reports.build_daily"))?;
//!
//! if let Some(job) = schedule.dequeue()? {
//!     // hand job.call to whatever executes work
//! }
//! # Ok::<(), chronoq::core::ScheduleError>(())
//! ```
//!
//! For complete examples, see:
//! - `tests/schedule_test.rs` - End-to-end ordering and failure-policy tests
//! - `tests/concurrency_test.rs` - Concurrent producers/consumers and conflict retries

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: jobs, the schedule, and its store contract.
pub mod core;
/// Configuration models for schedules, store backends, and retry tuning.
pub mod config;
/// Builders to construct schedule components from configuration.
pub mod builders;
/// Infrastructure adapters for job store backends.
pub mod infra;
/// Shared utilities.
pub mod util;
