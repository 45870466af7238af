//! Tests for configuration validation

use std::collections::HashMap;

use chronoq::config::{QueueConfig, RetryConfig, SchedulerConfig, StoreBackendConfig};

fn queue_cfg() -> QueueConfig {
    QueueConfig {
        default_timeout_secs: 180,
        retry: RetryConfig::default(),
    }
}

fn scheduler_cfg(queues: HashMap<String, QueueConfig>) -> SchedulerConfig {
    SchedulerConfig {
        store: StoreBackendConfig::InMemory,
        data_dir: None,
        queues,
    }
}

#[test]
fn valid_config_passes() {
    let mut queues = HashMap::new();
    queues.insert("default".to_string(), queue_cfg());
    assert!(scheduler_cfg(queues).validate().is_ok());
}

#[test]
fn zero_timeout_rejected() {
    let mut cfg = queue_cfg();
    cfg.default_timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn inverted_delay_bounds_rejected() {
    let mut cfg = queue_cfg();
    cfg.retry.base_delay_ms = 10;
    cfg.retry.max_delay_ms = 5;
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_max_attempts_rejected() {
    let mut cfg = queue_cfg();
    cfg.retry.max_attempts = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn empty_queue_map_rejected() {
    assert!(scheduler_cfg(HashMap::new()).validate().is_err());
}

#[test]
fn queue_errors_name_the_queue() {
    let mut bad = queue_cfg();
    bad.default_timeout_secs = 0;
    let mut queues = HashMap::new();
    queues.insert("reports".to_string(), bad);

    let err = scheduler_cfg(queues).validate().unwrap_err();
    assert!(err.contains("reports"));
}

#[test]
fn file_store_requires_data_dir() {
    let mut queues = HashMap::new();
    queues.insert("default".to_string(), queue_cfg());
    let cfg = SchedulerConfig {
        store: StoreBackendConfig::File,
        data_dir: None,
        queues,
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn from_json_applies_defaults_and_validates() {
    let json = r#"{
        "store": "in_memory",
        "queues": {
            "default": {
                "default_timeout_secs": 180
            }
        }
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    let queue = &cfg.queues["default"];
    assert_eq!(queue.default_timeout_secs, 180);
    assert!(queue.retry.max_attempts.is_none());
}

#[test]
fn from_json_rejects_invalid_values() {
    let json = r#"{
        "store": "in_memory",
        "queues": {
            "default": {
                "default_timeout_secs": 0
            }
        }
    }"#;
    assert!(SchedulerConfig::from_json_str(json).is_err());
}
