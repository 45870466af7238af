//! Date-ordered schedule and its store contract.
//!
//! A [`Schedule`] keeps a persisted index of job ids in ascending eta order
//! under its name. It is a passive structure: no threads of its own, no
//! blocking waits. Concurrent mutators reconcile through the conditional-write
//! primitive of the [`JobStore`], retrying from a fresh read whenever the index
//! changed under them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::core::audit::{build_audit_event, AuditSink};
use crate::core::error::ScheduleError;
use crate::core::job::{CallSpec, FetchError, Job, JobId};
use crate::util::retry::RetryPolicy;

/// Advisory execution timeout stamped on jobs that do not carry their own,
/// in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Monotonic version attached to an index read, compared at write time.
pub type Version = u64;

/// An index snapshot paired with the version observed at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedIndex {
    /// Ordered job ids under the schedule's key.
    pub ids: Vec<JobId>,
    /// Version the backend attached to this read.
    pub version: Version,
}

/// Outcome of a conditional index write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write was applied and the version advanced.
    Committed,
    /// The key changed since the observed version; retry from a fresh read.
    Conflict,
}

/// Abstraction for the key-value backend that persists schedules.
///
/// The index operations are the optimistic transaction primitive: a read
/// returns the current id list with a version, and a write applies only if the
/// version is unchanged. Job records are independent opaque blobs.
pub trait JobStore: Send + Sync {
    /// Read the ordered id list stored under `name` with its current version.
    /// A missing key reads as an empty index at version 0.
    fn read_index(&self, name: &str) -> Result<VersionedIndex, ScheduleError>;

    /// Replace the id list under `name` only if it is still at `expected`.
    fn write_index(
        &self,
        name: &str,
        ids: &[JobId],
        expected: Version,
    ) -> Result<WriteOutcome, ScheduleError>;

    /// Create or overwrite a job record.
    fn put_record(&self, id: &JobId, payload: &[u8]) -> Result<(), ScheduleError>;

    /// Read a job record, `None` when absent.
    fn get_record(&self, id: &JobId) -> Result<Option<Vec<u8>>, ScheduleError>;

    /// Delete a job record; returns whether one existed.
    fn delete_record(&self, id: &JobId) -> Result<bool, ScheduleError>;

    /// Existence check for a job record.
    fn record_exists(&self, id: &JobId) -> Result<bool, ScheduleError>;
}

/// Options applied to a job by the enqueue convenience wrappers.
#[derive(Debug, Clone, Default)]
pub struct EnqueueOptions {
    /// Destination queue for post-processing, overriding the job's own.
    pub queue: Option<String>,
    /// Advisory timeout in seconds; falls back to the schedule default.
    pub timeout_secs: Option<u64>,
}

/// A date-ordered job queue named by its index key in the store.
///
/// Cheap to construct; holds only the store handle and policy knobs. Any
/// number of `Schedule` values with the same name over the same store refer to
/// the same queue.
pub struct Schedule<S> {
    name: String,
    store: Arc<S>,
    default_timeout_secs: u64,
    retry: RetryPolicy,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S: JobStore> Schedule<S> {
    /// Create a schedule named `name` over `store`.
    pub fn new(name: impl Into<String>, store: Arc<S>) -> Self {
        Self {
            name: name.into(),
            store,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
            audit: None,
        }
    }

    /// Override the default advisory timeout.
    #[must_use]
    pub fn with_default_timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    /// Override the conflict retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(sink)));
        self
    }

    /// The queue name this schedule indexes under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries currently in the ordered index, orphans included.
    pub fn len(&self) -> Result<usize, ScheduleError> {
        Ok(self.store.read_index(&self.name)?.ids.len())
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> Result<bool, ScheduleError> {
        Ok(self.len()? == 0)
    }

    /// Create and enqueue a job to run at `eta`.
    pub fn enqueue(&self, eta: DateTime<Utc>, call: CallSpec) -> Result<Job, ScheduleError> {
        self.enqueue_with(eta, call, EnqueueOptions::default())
    }

    /// Create and enqueue a job with per-call overrides.
    pub fn enqueue_with(
        &self,
        eta: DateTime<Utc>,
        call: CallSpec,
        opts: EnqueueOptions,
    ) -> Result<Job, ScheduleError> {
        let mut job = Job::create(eta, call);
        if let Some(queue) = opts.queue {
            job.queue = Some(queue);
        }
        if let Some(secs) = opts.timeout_secs {
            job.timeout_secs = Some(secs);
        }
        self.enqueue_job(job, eta, true)
    }

    /// Persist `job` and insert its id into the ordered index at `eta`.
    ///
    /// Metadata (`origin`, `enqueued_at`) is stamped before the job becomes
    /// visible in the index, so concurrent readers only ever see a fully
    /// populated record. The insert itself is a read-merge-sort-write cycle:
    /// the whole index is refetched, the new job appended, everything
    /// stable-sorted by eta, and the result written conditionally. Conflicts
    /// restart the cycle from the read.
    ///
    /// Orphaned ids met during the merge are dropped (the compaction
    /// guarantee: ids without records are never valid); a corrupt record
    /// aborts the enqueue, since its eta is unknowable and no honest total
    /// order containing it can be written.
    pub fn enqueue_job(
        &self,
        mut job: Job,
        eta: DateTime<Utc>,
        set_meta: bool,
    ) -> Result<Job, ScheduleError> {
        job.eta = eta;
        if set_meta {
            job.origin = Some(self.name.clone());
            job.enqueued_at = Some(Utc::now());
        }
        if job.timeout_secs.is_none() {
            job.timeout_secs = Some(self.default_timeout_secs);
        }
        job.save(self.store.as_ref())?;

        let mut attempts = 0;
        loop {
            let VersionedIndex { ids, version } = self.store.read_index(&self.name)?;
            let mut jobs = Vec::with_capacity(ids.len() + 1);
            for id in &ids {
                if *id == job.id {
                    continue;
                }
                match Job::fetch(self.store.as_ref(), id) {
                    Ok(existing) => jobs.push(existing),
                    Err(FetchError::Missing) => {
                        tracing::debug!(queue = %self.name, id = %id, "dropping orphaned index entry during merge");
                    }
                    Err(err) => return Err(err.into_schedule_error(&self.name, *id)),
                }
            }
            jobs.push(job.clone());
            jobs.sort_by_key(|j| j.eta);
            let merged: Vec<JobId> = jobs.iter().map(|j| j.id).collect();
            match self.store.write_index(&self.name, &merged, version)? {
                WriteOutcome::Committed => break,
                WriteOutcome::Conflict => {
                    attempts += 1;
                    tracing::debug!(queue = %self.name, attempts, "index changed under enqueue, retrying");
                    self.backoff(attempts)?;
                }
            }
        }

        self.record_audit(&job.id.to_string(), "enqueue", None);
        tracing::debug!(queue = %self.name, id = %job.id, eta = %job.eta, "job enqueued");
        Ok(job)
    }

    /// Pop and return the earliest-eta valid job, `None` when the schedule is
    /// empty.
    ///
    /// The front id is removed with a conditional index write before its
    /// record is fetched. A missing record is a normal condition (orphan left
    /// by a race or external deletion): the scan moves on to the next front
    /// id. A corrupt record is not skipped; it propagates with this queue's
    /// identity and the offending id attached. After a successful pop with
    /// entries remaining, the index is compacted.
    pub fn dequeue(&self) -> Result<Option<Job>, ScheduleError> {
        let mut attempts = 0;
        loop {
            let VersionedIndex { ids, version } = self.store.read_index(&self.name)?;
            let Some((front, rest)) = ids.split_first() else {
                return Ok(None);
            };
            match self.store.write_index(&self.name, rest, version)? {
                WriteOutcome::Conflict => {
                    attempts += 1;
                    self.backoff(attempts)?;
                    continue;
                }
                WriteOutcome::Committed => {}
            }
            match Job::fetch(self.store.as_ref(), front) {
                Ok(job) => {
                    if !rest.is_empty() {
                        self.compact()?;
                    }
                    self.record_audit(&front.to_string(), "dequeue", None);
                    tracing::debug!(queue = %self.name, id = %front, "job dequeued");
                    return Ok(Some(job));
                }
                Err(FetchError::Missing) => {
                    self.record_audit(&front.to_string(), "skip_orphan", None);
                    tracing::debug!(queue = %self.name, id = %front, "skipping orphaned index entry");
                }
                Err(err) => {
                    tracing::warn!(queue = %self.name, id = %front, "corrupt job record at queue front");
                    return Err(err.into_schedule_error(&self.name, *front));
                }
            }
        }
    }

    /// Read-only look at the earliest entry without removing it.
    ///
    /// Returns `None` on an empty index, and also when the front record is
    /// missing (no scan-forward: a peek must not mutate, and pretending the
    /// second entry is the front would). Corrupt records propagate as in
    /// [`Schedule::dequeue`].
    pub fn peek(&self) -> Result<Option<Job>, ScheduleError> {
        let index = self.store.read_index(&self.name)?;
        let Some(front) = index.ids.first() else {
            return Ok(None);
        };
        match Job::fetch(self.store.as_ref(), front) {
            Ok(job) => Ok(Some(job)),
            Err(FetchError::Missing) => Ok(None),
            Err(err) => Err(err.into_schedule_error(&self.name, *front)),
        }
    }

    /// Ordered best-effort listing of the currently valid jobs.
    ///
    /// Ids whose record is missing or corrupt are skipped with a log line;
    /// backend failures still propagate.
    pub fn jobs(&self) -> Result<Vec<Job>, ScheduleError> {
        let index = self.store.read_index(&self.name)?;
        let mut jobs = Vec::with_capacity(index.ids.len());
        for id in &index.ids {
            match Job::fetch(self.store.as_ref(), id) {
                Ok(job) => jobs.push(job),
                Err(FetchError::Missing) => {
                    tracing::debug!(queue = %self.name, id = %id, "listing skips orphaned index entry");
                }
                Err(FetchError::Corrupt(_)) => {
                    tracing::warn!(queue = %self.name, id = %id, "listing skips corrupt job record");
                }
                Err(FetchError::Store(err)) => return Err(err),
            }
        }
        Ok(jobs)
    }

    /// Fetch a job by id in isolation.
    ///
    /// A missing record reads as `None`; a corrupt record is surfaced with
    /// this schedule's identity attached.
    pub fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, ScheduleError> {
        match Job::fetch(self.store.as_ref(), id) {
            Ok(job) => Ok(Some(job)),
            Err(FetchError::Missing) => Ok(None),
            Err(err) => Err(err.into_schedule_error(&self.name, *id)),
        }
    }

    /// Drop ids without a backing record from the persisted index.
    ///
    /// Survivors keep their relative order. The filter-and-write runs under
    /// the same conditional-write discipline as every other index mutation, so
    /// a concurrent enqueue can never be lost to a compaction racing it.
    /// Returns the number of entries pruned; an already-clean index is left
    /// untouched.
    pub fn compact(&self) -> Result<usize, ScheduleError> {
        let mut attempts = 0;
        loop {
            let VersionedIndex { ids, version } = self.store.read_index(&self.name)?;
            let mut survivors = Vec::with_capacity(ids.len());
            for id in &ids {
                if self.store.record_exists(id)? {
                    survivors.push(*id);
                }
            }
            let pruned = ids.len() - survivors.len();
            if pruned == 0 {
                return Ok(0);
            }
            match self.store.write_index(&self.name, &survivors, version)? {
                WriteOutcome::Committed => {
                    self.record_audit(
                        "batch",
                        "compact",
                        Some(format!("pruned {pruned} orphaned entries")),
                    );
                    tracing::debug!(queue = %self.name, pruned, "index compacted");
                    return Ok(pruned);
                }
                WriteOutcome::Conflict => {
                    attempts += 1;
                    self.backoff(attempts)?;
                }
            }
        }
    }

    fn backoff(&self, attempts: u32) -> Result<(), ScheduleError> {
        if !self.retry.allows(attempts) {
            return Err(ScheduleError::Contention {
                queue: self.name.clone(),
                attempts,
            });
        }
        let delay = self.retry.delay_for(attempts);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        Ok(())
    }

    fn record_audit(&self, job_id: &str, action: &str, detail: Option<String>) {
        if let Some(sink) = &self.audit {
            let mut sink = sink.lock();
            sink.record(build_audit_event(
                format!("{job_id}-{action}-{}", crate::util::clock::now_ms()),
                job_id,
                self.name.as_str(),
                action,
                detail,
            ));
        }
    }
}
