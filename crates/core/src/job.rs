//! Asynchronous job registry with passive time-based eviction.
//!
//! A handler that decides a payload is too large to return inline creates a
//! job here, hands the payload builder to [`execute`], and returns the job id
//! to the client. Status and result reads go through [`JobRegistry::get`]
//! snapshots; the stored payload is immutable once the job reaches a terminal
//! state, which is what makes chunked retrieval idempotent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// How long a job record is kept after its last activity timestamp.
pub const JOB_TTL: Duration = Duration::from_secs(600);

/// Opaque job handle, random 128-bit. Rendered without hyphens on the wire.
pub type JobId = Uuid;

/// Lifecycle state of a job.
///
/// `Pending` and `Running` are transient; `Done` and `Error` are terminal and
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Error,
}

impl JobStatus {
    /// Wire representation used in status responses and not-ready envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

#[derive(Debug)]
struct JobRecord {
    status: JobStatus,
    result: Option<Arc<str>>,
    total_chars: usize,
    error: Option<String>,
    created_at: Instant,
}

impl JobRecord {
    fn new() -> Self {
        Self {
            status: JobStatus::Pending,
            result: None,
            total_chars: 0,
            error: None,
            created_at: Instant::now(),
        }
    }
}

/// Point-in-time copy of a job's externally visible fields.
///
/// The payload is shared as `Arc<str>` so a snapshot never borrows into the
/// registry and a large result is not copied on every poll.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub result: Option<Arc<str>>,
    /// Length of the stored result in characters. Zero unless `Done`.
    pub total_chars: usize,
    pub error: Option<String>,
}

/// Table of asynchronous jobs keyed by opaque id.
///
/// One mutex guards the whole map; job traffic is low-volume and short-lived,
/// so coarse locking wins over per-job granularity. Expired entries are swept
/// by every operation that takes the lock -- there is no timer, cleanup
/// happens soon after any registry traffic rather than on a fixed cadence.
///
/// Constructed explicitly and shared by the owner (no process-global state);
/// callers hold only job ids.
#[derive(Debug)]
pub struct JobRegistry {
    ttl: Duration,
    jobs: Mutex<HashMap<JobId, JobRecord>>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::with_ttl(JOB_TTL)
    }

    /// Registry with a caller-chosen time-to-live. The server wires its
    /// configured TTL through here; expiry tests pass very small values so
    /// they never have to wait.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a fresh `Pending` job and return its id.
    ///
    /// Ids are never reused; collisions across 128 random bits are treated as
    /// negligible and not handled.
    pub fn create(&self) -> JobId {
        let id = Uuid::new_v4();
        let mut jobs = self.lock();
        Self::sweep(&mut jobs, self.ttl);
        jobs.insert(id, JobRecord::new());
        id
    }

    /// Transition a job into `Running` and refresh its activity timestamp,
    /// so a job cannot expire while entering execution. Any previous outcome
    /// is cleared. No-op for unknown ids.
    pub fn begin_running(&self, id: JobId) {
        let mut jobs = self.lock();
        Self::sweep(&mut jobs, self.ttl);
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Running;
            job.created_at = Instant::now();
            job.result = None;
            job.total_chars = 0;
            job.error = None;
        }
    }

    /// Store a result and transition to `Done`.
    ///
    /// If the id no longer exists (evicted mid-flight) the write is silently
    /// dropped: the original client has long since abandoned its poll loop,
    /// so there is nobody left to tell.
    pub fn complete(&self, id: JobId, result: String) {
        let mut jobs = self.lock();
        Self::sweep(&mut jobs, self.ttl);
        if let Some(job) = jobs.get_mut(&id) {
            job.total_chars = result.chars().count();
            job.result = Some(Arc::from(result));
            job.error = None;
            job.status = JobStatus::Done;
        }
    }

    /// Store an error and transition to `Error`. The text is kept verbatim.
    /// Same silent-drop semantics as [`complete`](Self::complete).
    pub fn fail(&self, id: JobId, error: String) {
        let mut jobs = self.lock();
        Self::sweep(&mut jobs, self.ttl);
        if let Some(job) = jobs.get_mut(&id) {
            job.error = Some(error);
            job.result = None;
            job.total_chars = 0;
            job.status = JobStatus::Error;
        }
    }

    /// Snapshot read. `None` for unknown or expired ids -- an ordinary
    /// outcome of late polling, never a fault.
    pub fn get(&self, id: JobId) -> Option<JobSnapshot> {
        let mut jobs = self.lock();
        Self::sweep(&mut jobs, self.ttl);
        jobs.get(&id).map(|job| JobSnapshot {
            status: job.status,
            result: job.result.clone(),
            total_chars: job.total_chars,
            error: job.error.clone(),
        })
    }

    /// Drop every record whose activity timestamp is older than the TTL.
    /// Runs under the registry lock; infallible, so it can never block or
    /// fail job creation.
    fn sweep(jobs: &mut HashMap<JobId, JobRecord>, ttl: Duration) {
        jobs.retain(|_, job| job.created_at.elapsed() <= ttl);
    }

    /// A poisoned map is still structurally sound; recover the guard.
    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, JobRecord>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewind a job's activity timestamp. Test hook for expiry behavior.
    #[cfg(test)]
    fn backdate(&self, id: JobId, by: Duration) {
        let mut jobs = self.lock();
        if let Some(job) = jobs.get_mut(&id) {
            job.created_at = job.created_at.checked_sub(by).expect("backdate underflow");
        }
    }

    /// Membership check that does not sweep. Test hook.
    #[cfg(test)]
    fn peek(&self, id: JobId) -> bool {
        self.lock().contains_key(&id)
    }
}

/// Drive a job to a terminal state.
///
/// Marks the job `Running`, invokes the payload builder exactly once, and
/// stores the outcome; the builder's error text is preserved verbatim. The
/// caller picks the execution context -- the builder runs wherever `execute`
/// is called from.
pub fn execute<F>(registry: &JobRegistry, id: JobId, build: F)
where
    F: FnOnce() -> Result<String, String>,
{
    registry.begin_running(id);
    match build() {
        Ok(payload) => registry.complete(id, payload),
        Err(error) => registry.fail(id, error),
    }
}
