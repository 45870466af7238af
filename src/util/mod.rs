//! Shared utilities.

pub mod clock;
pub mod retry;
pub mod telemetry;

pub use clock::now_ms;
pub use retry::RetryPolicy;
pub use telemetry::init_tracing;
