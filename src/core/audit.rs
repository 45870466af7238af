//! Audit sink implementations.
//!
//! Records queue lifecycle events (enqueue, dequeue, orphan skips, compaction)
//! for operator diagnosis.

use std::collections::VecDeque;

use crate::util::clock::now_ms;

/// A recorded queue lifecycle event.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Related job identifier, or `batch` for maintenance sweeps.
    pub job_id: String,
    /// Queue the event happened on.
    pub queue: String,
    /// Action taken (enqueue, dequeue, skip_orphan, compact).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    event_id: impl Into<String>,
    job_id: impl Into<String>,
    queue: impl Into<String>,
    action: impl Into<String>,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: event_id.into(),
        job_id: job_id.into(),
        queue: queue.into(),
        action: action.into(),
        created_at_ms: now_ms(),
        detail,
    }
}
