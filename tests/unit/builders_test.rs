//! Tests for schedule builders

use std::collections::HashMap;
use std::sync::Arc;

use chronoq::builders::build_schedules;
use chronoq::config::{QueueConfig, RetryConfig, SchedulerConfig, StoreBackendConfig};
use chronoq::infra::InMemoryStore;

fn config() -> SchedulerConfig {
    let mut queues = HashMap::new();
    queues.insert(
        "reports".to_string(),
        QueueConfig {
            default_timeout_secs: 60,
            retry: RetryConfig::default(),
        },
    );
    queues.insert(
        "mail".to_string(),
        QueueConfig {
            default_timeout_secs: 30,
            retry: RetryConfig::default(),
        },
    );
    SchedulerConfig {
        store: StoreBackendConfig::InMemory,
        data_dir: None,
        queues,
    }
}

#[test]
fn builds_one_schedule_per_queue_over_shared_store() {
    let schedules = build_schedules(&config(), |_| Ok(Arc::new(InMemoryStore::new()))).unwrap();
    assert_eq!(schedules.len(), 2);
    assert!(schedules.contains_key("reports"));
    assert!(schedules.contains_key("mail"));

    // the store is shared: a job enqueued through one handle is visible to a
    // second handle with the same queue name
    let reports = &schedules["reports"];
    let eta = chrono::Utc::now();
    reports
        .enqueue(eta, chronoq::core::CallSpec::new("reports.build"))
        .unwrap();
    assert_eq!(reports.len().unwrap(), 1);
    assert_eq!(schedules["mail"].len().unwrap(), 0);
}

#[test]
fn invalid_config_fails_before_the_factory_runs() {
    let cfg = SchedulerConfig {
        store: StoreBackendConfig::InMemory,
        data_dir: None,
        queues: HashMap::new(),
    };
    let result = build_schedules(&cfg, |_| Ok(Arc::new(InMemoryStore::new())));
    assert!(result.is_err());
}
