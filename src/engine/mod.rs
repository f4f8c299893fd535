//! Media engine boundary
//!
//! The engine is an external, executable-like collaborator: it takes an
//! argument vector, emits periodic statistics while it runs, and finishes
//! with an integer result code. Everything behind `Engine::execute` is
//! opaque; the crate only schedules, cancels, and classifies.

pub mod ffmpeg_cli;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub use ffmpeg_cli::FfmpegCliEngine;

/// Result code reported by a run that completed its work
pub const RETURN_CODE_SUCCESS: i32 = 0;

/// Result code reported by a run that was cancelled cooperatively
pub const RETURN_CODE_CANCEL: i32 = 255;

/// Progress snapshot emitted by a running engine
///
/// Fields mirror the ffmpeg progress record. Deliveries are one-at-a-time
/// and best-effort; the only guarantee is that progress within a single run
/// never goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    /// Frames processed so far
    pub frame: u64,
    /// Current processing rate in frames per second
    pub fps: f64,
    /// Encoder quality factor for the first stream
    pub quality: f64,
    /// Output size so far in bytes
    pub size_bytes: u64,
    /// Media time processed so far
    pub time: Duration,
    /// Current output bitrate in kbit/s
    pub bitrate_kbps: f64,
    /// Processing speed relative to media rate (1.0 = realtime)
    pub speed: f64,
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame={} fps={:.1} size={}kB time={:.1}s bitrate={:.1}kbit/s speed={:.2}x",
            self.frame,
            self.fps,
            self.size_bytes / 1024,
            self.time.as_secs_f64(),
            self.bitrate_kbps,
            self.speed
        )
    }
}

/// Cooperative cancellation flag shared between a job handle and its worker
///
/// Cloning yields another handle to the same flag. Setting it is a request,
/// not an interrupt: the engine notices at its own checkpoints, so there is
/// no bound on teardown latency.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; safe from any thread, idempotent
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Trait for media engines
///
/// `execute` runs one invocation synchronously on the calling thread and
/// always produces a result code: argument errors, I/O failures, and spawn
/// failures all map to failure codes rather than panics. The classification
/// methods are the engine's own contract and default to the stock table
/// (`RETURN_CODE_SUCCESS` / `RETURN_CODE_CANCEL`, mutually exclusive, every
/// other code a plain failure).
pub trait Engine: Send + Sync {
    /// Run the engine with the given argument vector
    ///
    /// Statistics are pushed through `on_statistics` at engine-defined
    /// checkpoints. The cancel token is observed cooperatively at those same
    /// checkpoints; a run that honors it reports `cancel_code()`.
    fn execute(
        &self,
        arguments: &[String],
        on_statistics: &(dyn Fn(Statistics) + Sync),
        cancel: &CancelToken,
    ) -> i32;

    /// Did this code signal a successful run?
    fn is_success(&self, code: i32) -> bool {
        code == RETURN_CODE_SUCCESS
    }

    /// Did this code signal a cancelled run?
    fn is_cancel(&self, code: i32) -> bool {
        code == RETURN_CODE_CANCEL
    }

    /// The code reported for a run cancelled before any work happened
    fn cancel_code(&self) -> i32 {
        RETURN_CODE_CANCEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullEngine;

    impl Engine for NullEngine {
        fn execute(
            &self,
            _arguments: &[String],
            _on_statistics: &(dyn Fn(Statistics) + Sync),
            _cancel: &CancelToken,
        ) -> i32 {
            RETURN_CODE_SUCCESS
        }
    }

    #[test]
    fn test_default_classification() {
        let engine = NullEngine;
        assert!(engine.is_success(0));
        assert!(!engine.is_cancel(0));
        assert!(engine.is_cancel(255));
        assert!(!engine.is_success(255));
        // anything else is a plain failure
        for code in [-1, 1, 2, 69, 254] {
            assert!(!engine.is_success(code));
            assert!(!engine.is_cancel(code));
        }
        assert_eq!(engine.cancel_code(), RETURN_CODE_CANCEL);
    }

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        let handle = std::thread::spawn(move || clone.cancel());
        handle.join().unwrap();

        assert!(token.is_cancelled());
        // setting again is a no-op
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_statistics_display() {
        let stats = Statistics {
            frame: 120,
            fps: 29.97,
            quality: 28.0,
            size_bytes: 2048,
            time: Duration::from_secs(4),
            bitrate_kbps: 1800.5,
            speed: 1.25,
        };
        let line = stats.to_string();
        assert!(line.contains("frame=120"));
        assert!(line.contains("speed=1.25x"));
    }
}
