//! Configuration models for schedules, store backends, and retry tuning.

pub mod schedule;

pub use schedule::{QueueConfig, RetryConfig, SchedulerConfig, StoreBackendConfig};
