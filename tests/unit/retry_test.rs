//! Tests for the conflict retry policy

use std::time::Duration;

use chronoq::config::RetryConfig;
use chronoq::util::RetryPolicy;

#[test]
fn delays_grow_exponentially_to_cap() {
    let policy =
        RetryPolicy::unbounded().with_delays(Duration::from_millis(2), Duration::from_millis(16));
    assert_eq!(policy.delay_for(1), Duration::from_millis(2));
    assert_eq!(policy.delay_for(2), Duration::from_millis(4));
    assert_eq!(policy.delay_for(3), Duration::from_millis(8));
    assert_eq!(policy.delay_for(4), Duration::from_millis(16));
    assert_eq!(policy.delay_for(10), Duration::from_millis(16));
}

#[test]
fn unbounded_always_allows() {
    let policy = RetryPolicy::unbounded();
    assert!(policy.allows(1));
    assert!(policy.allows(1_000_000));
}

#[test]
fn bounded_stops_allowing_past_ceiling() {
    let policy = RetryPolicy::bounded(3);
    assert!(policy.allows(1));
    assert!(policy.allows(3));
    assert!(!policy.allows(4));
}

#[test]
fn from_config_carries_values() {
    let policy = RetryPolicy::from_config(&RetryConfig {
        base_delay_ms: 5,
        max_delay_ms: 20,
        max_attempts: Some(7),
    });
    assert_eq!(policy.delay_for(1), Duration::from_millis(5));
    assert_eq!(policy.delay_for(3), Duration::from_millis(20));
    assert!(policy.allows(7));
    assert!(!policy.allows(8));
}
