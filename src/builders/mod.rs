//! Builders to construct schedule components from configuration.

pub mod schedule_builder;

pub use schedule_builder::build_schedules;
