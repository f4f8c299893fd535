//! Job host
//!
//! Runs submitted jobs on a small pool of worker threads. The pool size
//! bounds how many engine invocations run at once; everything beyond it
//! waits in the queue in submission order.

use crossbeam_channel::{Receiver, Sender};

use super::TranscodeJob;
use crate::config::HostConfig;

/// Worker pool executing transcoding jobs
///
/// Dropping the host disconnects the queue; the detached workers drain the
/// jobs already submitted, so every started job still receives its terminal
/// callback, then exit. Use [`shutdown`](JobHost::shutdown) to block until
/// that drain has finished.
pub struct JobHost {
    queue: Sender<TranscodeJob>,
    workers: Vec<std::thread::JoinHandle<()>>,
}

impl JobHost {
    /// Host with the default single worker
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    /// Host with a caller-configured worker count
    pub fn with_config(config: HostConfig) -> Self {
        let worker_count = config.max_concurrent.max(1);
        let (queue, jobs) = crossbeam_channel::unbounded::<TranscodeJob>();

        let workers = (0..worker_count)
            .map(|index| {
                let jobs: Receiver<TranscodeJob> = jobs.clone();
                std::thread::spawn(move || {
                    while let Ok(job) = jobs.recv() {
                        job.run();
                    }
                    tracing::debug!("Worker {} exiting", index);
                })
            })
            .collect();

        tracing::debug!("Job host started with {} worker(s)", worker_count);
        Self { queue, workers }
    }

    /// Hand a job to the pool; gives the job back if the queue is gone
    pub(crate) fn submit(&self, job: TranscodeJob) -> Result<(), TranscodeJob> {
        self.queue.send(job).map_err(|e| e.0)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Disconnect the queue and wait until the workers have drained it
    pub fn shutdown(self) {
        let Self { queue, workers } = self;
        drop(queue);
        for handle in workers {
            let _ = handle.join();
        }
    }
}

impl Default for JobHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CancelToken, Engine, Statistics};
    use crate::job::JobState;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    /// Returns success immediately, optionally after a pause
    struct PauseEngine {
        pause: Duration,
    }

    impl Engine for PauseEngine {
        fn execute(
            &self,
            _arguments: &[String],
            _on_statistics: &(dyn Fn(Statistics) + Sync),
            _cancel: &CancelToken,
        ) -> i32 {
            if !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
            0
        }
    }

    /// Blocks until every expected participant has arrived
    struct MeetEngine {
        gate: Barrier,
    }

    impl Engine for MeetEngine {
        fn execute(
            &self,
            _arguments: &[String],
            _on_statistics: &(dyn Fn(Statistics) + Sync),
            _cancel: &CancelToken,
        ) -> i32 {
            self.gate.wait();
            0
        }
    }

    fn job_with_order_log(
        engine: Arc<dyn Engine>,
        id: i32,
        log: &Arc<Mutex<Vec<i32>>>,
    ) -> TranscodeJob {
        let log = log.clone();
        TranscodeJob::new(engine, vec![], |_| {}, move |_| log.lock().push(id))
    }

    #[test]
    fn test_single_worker_runs_jobs_in_submission_order() {
        let engine: Arc<dyn Engine> = Arc::new(PauseEngine {
            pause: Duration::from_millis(10),
        });
        let log = Arc::new(Mutex::new(Vec::new()));

        let host = JobHost::new();
        assert_eq!(host.worker_count(), 1);
        for id in 1..=3 {
            job_with_order_log(engine.clone(), id, &log).start(&host);
        }
        host.shutdown();

        assert_eq!(*log.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn test_drop_still_drains_queued_jobs() {
        let engine: Arc<dyn Engine> = Arc::new(PauseEngine {
            pause: Duration::from_millis(20),
        });
        let (done_tx, done_rx) = crossbeam_channel::unbounded();

        let host = JobHost::new();
        for _ in 0..3 {
            let done = done_tx.clone();
            let job = TranscodeJob::new(engine.clone(), vec![], |_| {}, move |code| {
                done.send(code).unwrap();
            });
            job.start(&host);
        }
        drop(host);

        for _ in 0..3 {
            let code = done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(code, 0);
        }
    }

    #[test]
    fn test_configured_workers_run_concurrently() {
        // both jobs must be inside the engine at once to pass the barrier
        let engine: Arc<dyn Engine> = Arc::new(MeetEngine {
            gate: Barrier::new(2),
        });
        let completed = Arc::new(AtomicUsize::new(0));

        let host = JobHost::with_config(HostConfig::default().with_max_concurrent(2));
        assert_eq!(host.worker_count(), 2);

        let jobs: Vec<_> = (0..2)
            .map(|_| {
                let count = completed.clone();
                TranscodeJob::new(engine.clone(), vec![], |_| {}, move |_| {
                    count.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        for job in &jobs {
            job.start(&host);
        }
        host.shutdown();

        assert_eq!(completed.load(Ordering::SeqCst), 2);
        for job in &jobs {
            assert_eq!(job.state(), JobState::Completed(0));
        }
    }

    #[test]
    fn test_zero_concurrency_still_gets_one_worker() {
        let host = JobHost::with_config(HostConfig::default().with_max_concurrent(0));
        assert_eq!(host.worker_count(), 1);
        host.shutdown();
    }
}
