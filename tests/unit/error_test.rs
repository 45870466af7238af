//! Tests for error types

use chronoq::core::{FetchError, Job, JobId, ScheduleError};

#[test]
fn no_such_job_display() {
    let id = JobId::new();
    let err = ScheduleError::NoSuchJob(id);
    assert_eq!(format!("{err}"), format!("no such job: {id}"));
}

#[test]
fn corrupt_display_names_queue_and_id() {
    let id = JobId::new();
    let source = Job::decode(b"junk").unwrap_err();
    let err = ScheduleError::Corrupt {
        queue: "reports".into(),
        id,
        source,
    };
    assert_eq!(
        format!("{err}"),
        format!("corrupt job record {id} in queue `reports`")
    );
}

#[test]
fn contention_display() {
    let err = ScheduleError::Contention {
        queue: "busy".into(),
        attempts: 7,
    };
    assert_eq!(
        format!("{err}"),
        "index contention on queue `busy` after 7 attempts"
    );
}

#[test]
fn backend_display() {
    let err = ScheduleError::Backend("connection refused".into());
    assert_eq!(format!("{err}"), "store error: connection refused");
}

#[test]
fn fetch_error_promotes_missing_to_no_such_job() {
    let id = JobId::new();
    let err = FetchError::Missing.into_schedule_error("q", id);
    assert!(matches!(err, ScheduleError::NoSuchJob(got) if got == id));
}

#[test]
fn fetch_error_promotes_corrupt_with_context() {
    let id = JobId::new();
    let source = Job::decode(b"{").unwrap_err();
    let err = FetchError::Corrupt(source).into_schedule_error("q", id);
    assert!(
        matches!(err, ScheduleError::Corrupt { ref queue, id: got, .. } if queue == "q" && got == id)
    );
}
