//! Transcoding jobs
//!
//! A job binds one engine invocation to a pair of callbacks: periodic
//! statistics while the engine runs and exactly one result delivery when it
//! finishes. Jobs are created idle, scheduled on a [`JobHost`], and
//! cancelled cooperatively from any thread.

pub mod host;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::{CancelToken, Engine, Statistics};

pub use host::JobHost;

/// Callback receiving progress snapshots
pub type StatisticsCallback = Box<dyn Fn(Statistics) + Send + Sync>;

/// Callback receiving the terminal result code
pub type ResultCallback = Box<dyn FnOnce(i32) + Send>;

/// Observable job lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Built but not yet scheduled
    Created,
    /// Scheduled or executing
    Running,
    /// Engine finished with this code (success or plain failure)
    Completed(i32),
    /// Cancellation was observed before or during the run
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed(_) | JobState::Cancelled)
    }
}

struct JobInner {
    engine: Arc<dyn Engine>,
    arguments: Vec<String>,
    on_statistics: StatisticsCallback,
    on_result: Mutex<Option<ResultCallback>>,
    state: Mutex<JobState>,
    cancel: CancelToken,
    started: AtomicBool,
}

/// A single cancellable engine invocation
///
/// The handle is cheap to clone; all clones observe the same job. A job
/// executes at most once: `start` schedules it on a host, repeated starts
/// are ignored, and there is no reuse after the terminal state.
#[derive(Clone)]
pub struct TranscodeJob {
    inner: Arc<JobInner>,
}

impl TranscodeJob {
    /// Create an idle job bound to its engine, arguments, and callbacks
    pub fn new(
        engine: Arc<dyn Engine>,
        arguments: Vec<String>,
        on_statistics: impl Fn(Statistics) + Send + Sync + 'static,
        on_result: impl FnOnce(i32) + Send + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(JobInner {
                engine,
                arguments,
                on_statistics: Box::new(on_statistics),
                on_result: Mutex::new(Some(Box::new(on_result))),
                state: Mutex::new(JobState::Created),
                cancel: CancelToken::new(),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Schedule the job on a host and return immediately
    ///
    /// The first call wins; calling again is a logged no-op. A job cancelled
    /// before this point still schedules, but the engine is never entered
    /// and the terminal state is Cancelled.
    pub fn start(&self, host: &JobHost) {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Job already started, ignoring start request");
            return;
        }

        if !self.inner.cancel.is_cancelled() {
            *self.inner.state.lock() = JobState::Running;
        }

        if let Err(job) = host.submit(self.clone()) {
            tracing::warn!("Job host is shut down, reporting cancellation");
            let code = job.inner.engine.cancel_code();
            job.finish(code);
        }
    }

    /// Request cooperative cancellation
    ///
    /// Safe from any thread and idempotent; after the terminal state it has
    /// no effect. The engine notices at its next checkpoint.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
    }

    pub fn state(&self) -> JobState {
        *self.inner.state.lock()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    pub fn arguments(&self) -> &[String] {
        &self.inner.arguments
    }

    /// Execute on the current thread; called by the host worker
    pub(crate) fn run(&self) {
        let inner = &self.inner;

        let code = if inner.cancel.is_cancelled() {
            tracing::debug!("Job cancelled before engine entry");
            inner.engine.cancel_code()
        } else {
            let on_statistics = &inner.on_statistics;
            let cancel = &inner.cancel;
            inner.engine.execute(
                &inner.arguments,
                &|stats| {
                    // stop forwarding once cancellation has been observed,
                    // whatever the engine keeps sending
                    if !cancel.is_cancelled() {
                        on_statistics(stats);
                    }
                },
                cancel,
            )
        };

        self.finish(code);
    }

    /// Record the terminal state and deliver the result exactly once
    fn finish(&self, code: i32) {
        let terminal = if self.inner.engine.is_cancel(code) {
            JobState::Cancelled
        } else {
            JobState::Completed(code)
        };
        *self.inner.state.lock() = terminal;
        tracing::debug!("Job finished with code {} ({:?})", code, terminal);

        if let Some(on_result) = self.inner.on_result.lock().take() {
            on_result(code);
        }
    }
}
