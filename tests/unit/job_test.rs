//! Tests for job construction and the record codec

use chrono::{TimeZone, Utc};
use chronoq::core::{CallSpec, Job};
use serde_json::json;

fn eta() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
}

#[test]
fn create_leaves_enqueue_metadata_unset() {
    let job = Job::create(eta(), CallSpec::new("reports.build"));
    assert_eq!(job.eta, eta());
    assert!(job.origin.is_none());
    assert!(job.enqueued_at.is_none());
    assert!(job.timeout_secs.is_none());
    assert!(job.queue.is_none());
}

#[test]
fn ids_are_unique() {
    let a = Job::create(eta(), CallSpec::new("jobs.a"));
    let b = Job::create(eta(), CallSpec::new("jobs.b"));
    assert_ne!(a.id, b.id);
}

#[test]
fn builders_override_fields() {
    let job = Job::create(eta(), CallSpec::new("jobs.routed"))
        .with_queue("post")
        .with_timeout(30);
    assert_eq!(job.queue.as_deref(), Some("post"));
    assert_eq!(job.timeout_secs, Some(30));
}

#[test]
fn call_spec_collects_arguments() {
    let call = CallSpec::new("mailer.send")
        .with_args(vec![json!("ops@example.com")])
        .with_kwarg("retries", json!(3));
    assert_eq!(call.args, vec![json!("ops@example.com")]);
    assert_eq!(call.kwargs["retries"], json!(3));
}

#[test]
fn record_codec_roundtrips() {
    let job = Job::create(
        eta(),
        CallSpec::new("mailer.send").with_kwarg("subject", json!("hi")),
    )
    .with_timeout(45);

    let decoded = Job::decode(&job.encode().unwrap()).unwrap();
    assert_eq!(decoded, job);
}

#[test]
fn decode_rejects_junk() {
    assert!(Job::decode(b"definitely not json").is_err());
    assert!(Job::decode(b"{\"eta\": \"not a timestamp\"}").is_err());
}
