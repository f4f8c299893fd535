//! FFmpeg CLI engine
//!
//! Drives the ffmpeg binary as a child process. Progress reporting is
//! requested with `-progress pipe:1` and parsed from the key=value stream on
//! stdout; the cancel token is polled while the child runs and trips a kill.

use std::io::{BufRead, BufReader};
use std::process::{ChildStdout, Command, Stdio};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;

use super::{CancelToken, Engine, Statistics, RETURN_CODE_CANCEL};
use crate::config::EngineConfig;

/// Reported when the binary cannot be spawned (shell convention for a
/// missing executable)
const SPAWN_FAILURE_CODE: i32 = 127;

/// Reported when the child dies to a signal nobody sent on purpose
const SIGNAL_FAILURE_CODE: i32 = -1;

/// How often the worker polls the child and the cancel token
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Engine backed by the ffmpeg command-line binary
pub struct FfmpegCliEngine {
    binary: String,
}

impl FfmpegCliEngine {
    /// Engine using `ffmpeg` from PATH
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    /// Engine using a specific binary
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Engine using the binary named in the configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_binary(config.binary.clone())
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Check if the configured binary runs at all
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Version banner reported by the binary (first line of `-version`)
    pub fn version(&self) -> Option<String> {
        Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .map(|line| line.trim().to_string())
            })
    }
}

impl Default for FfmpegCliEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for FfmpegCliEngine {
    fn execute(
        &self,
        arguments: &[String],
        on_statistics: &(dyn Fn(Statistics) + Sync),
        cancel: &CancelToken,
    ) -> i32 {
        let mut command = Command::new(&self.binary);
        command
            .args(["-progress", "pipe:1", "-nostats"])
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        tracing::debug!("Spawning {} with {} arguments", self.binary, arguments.len());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to spawn {}: {}", self.binary, e);
                return SPAWN_FAILURE_CODE;
            }
        };

        let (progress_tx, progress_rx) = crossbeam_channel::unbounded();
        let reader = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || read_progress(stdout, progress_tx)));

        let mut killed = false;
        let status = loop {
            while let Ok(stats) = progress_rx.try_recv() {
                if !cancel.is_cancelled() {
                    on_statistics(stats);
                }
            }

            if cancel.is_cancelled() && !killed {
                tracing::debug!("Cancel requested, killing engine process");
                let _ = child.kill();
                killed = true;
            }

            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    tracing::warn!("Failed to poll engine process: {}", e);
                    let _ = child.kill();
                    let _ = child.wait();
                    break None;
                }
            }
        };

        if let Some(handle) = reader {
            let _ = handle.join();
        }

        // snapshots parsed between the last poll and pipe close
        while let Ok(stats) = progress_rx.try_recv() {
            if !cancel.is_cancelled() {
                on_statistics(stats);
            }
        }

        // a child that exited on its own before the kill landed keeps its
        // real code; only a signal death counts as the cancel outcome
        let code = match status.and_then(|status| status.code()) {
            Some(code) => code,
            None if killed => RETURN_CODE_CANCEL,
            None => SIGNAL_FAILURE_CODE,
        };
        tracing::debug!("Engine process exited with code {}", code);
        code
    }
}

/// Parse the key=value progress stream, emitting one snapshot per
/// `progress=` terminator line
fn read_progress(stdout: ChildStdout, tx: Sender<Statistics>) {
    let mut reader = BufReader::new(stdout);
    let mut line = String::new();
    let mut current = Statistics::default();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value == "N/A" {
            continue;
        }

        match key {
            "frame" => {
                if let Ok(v) = value.parse() {
                    current.frame = v;
                }
            }
            "fps" => {
                if let Ok(v) = value.parse() {
                    current.fps = v;
                }
            }
            "stream_0_0_q" => {
                if let Ok(v) = value.parse() {
                    current.quality = v;
                }
            }
            "total_size" => {
                if let Ok(v) = value.parse() {
                    current.size_bytes = v;
                }
            }
            // despite the name, both keys carry microseconds
            "out_time_us" | "out_time_ms" => {
                if let Ok(us) = value.parse::<i64>() {
                    current.time = Duration::from_micros(us.max(0) as u64);
                }
            }
            "out_time" => {
                if let Some(time) = parse_clock_time(value) {
                    current.time = time;
                }
            }
            "bitrate" => {
                if let Ok(v) = value.trim_end_matches("kbits/s").parse() {
                    current.bitrate_kbps = v;
                }
            }
            "speed" => {
                if let Ok(v) = value.trim_end_matches('x').parse() {
                    current.speed = v;
                }
            }
            "progress" => {
                if tx.send(current).is_err() {
                    break;
                }
            }
            _ => {}
        }
    }
}

/// Parse the HH:MM:SS.micro clock form emitted for `out_time`
fn parse_clock_time(raw: &str) -> Option<Duration> {
    let mut parts = raw.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let (seconds, micros) = match seconds_part.split_once('.') {
        Some((s, frac)) => (s.parse::<u64>().ok()?, fraction_micros(frac)),
        None => (seconds_part.parse::<u64>().ok()?, 0),
    };
    Some(Duration::from_secs(hours * 3600 + minutes * 60 + seconds) + Duration::from_micros(micros))
}

/// Fractional seconds scaled to microseconds, whatever the digit count
fn fraction_micros(frac: &str) -> u64 {
    let digits = frac.len().min(6);
    match frac.get(..digits).and_then(|head| head.parse::<u64>().ok()) {
        Some(value) => value * 10u64.pow((6 - digits) as u32),
        None => 0,
    }
}
