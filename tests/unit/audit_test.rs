//! Tests for the audit sink

use chronoq::core::{build_audit_event, AuditSink, InMemoryAuditSink};

#[test]
fn bounded_buffer_drops_oldest() {
    let mut sink = InMemoryAuditSink::new(2);
    for action in ["enqueue", "dequeue", "compact"] {
        sink.record(build_audit_event("evt", "job-1", "q", action, None));
    }

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, "dequeue");
    assert_eq!(events[1].action, "compact");
}

#[test]
fn build_event_stamps_time_and_context() {
    let event = build_audit_event("evt-1", "job-1", "reports", "enqueue", Some("detail".into()));
    assert_eq!(event.queue, "reports");
    assert_eq!(event.job_id, "job-1");
    assert!(event.created_at_ms > 0);
    assert_eq!(event.detail.as_deref(), Some("detail"));
}
