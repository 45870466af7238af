//! Builders to construct schedules from configuration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{JobStore, Schedule, ScheduleError};
use crate::util::retry::RetryPolicy;

/// Build one schedule per configured queue over a shared store.
///
/// The factory receives the validated configuration and returns the store all
/// schedules share; each queue is namespaced by its index key, so one backend
/// serves every schedule.
pub fn build_schedules<S, F>(
    cfg: &SchedulerConfig,
    store_factory: F,
) -> Result<HashMap<String, Schedule<S>>, ScheduleError>
where
    S: JobStore,
    F: FnOnce(&SchedulerConfig) -> Result<Arc<S>, ScheduleError>,
{
    cfg.validate()
        .map_err(|e| ScheduleError::Backend(format!("config invalid: {e}")))?;

    let store = store_factory(cfg)?;
    let mut schedules = HashMap::new();
    for (name, queue_cfg) in &cfg.queues {
        let schedule = Schedule::new(name.clone(), Arc::clone(&store))
            .with_default_timeout(queue_cfg.default_timeout_secs)
            .with_retry_policy(RetryPolicy::from_config(&queue_cfg.retry));
        schedules.insert(name.clone(), schedule);
    }

    Ok(schedules)
}
