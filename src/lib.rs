//! ReelKit — transcoding jobs and frame presentation
//!
//! The two halves of a mobile video tool's processing core: cancellable
//! transcoding jobs driving an external command-line media engine, and a
//! render surface that places decoded frames inside a host view with
//! aspect-aware geometry.
//!
//! # Features
//!
//! - **Jobs**: argument vector in, periodic statistics and exactly one
//!   result code out, cooperative cancellation from any thread
//! - **Engine**: pluggable behind a trait; ships an ffmpeg CLI engine with
//!   progress parsing and kill-on-cancel
//! - **Presentation**: fit/fill geometry with a software compositing
//!   backend and a GPU-texture backend behind one draw interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reelkit::{FfmpegCliEngine, JobHost, TranscodeJob};
//!
//! let engine = Arc::new(FfmpegCliEngine::new());
//! let host = JobHost::new();
//!
//! let job = TranscodeJob::new(
//!     engine,
//!     vec!["-i".into(), "in.mov".into(), "out.mp4".into()],
//!     |stats| println!("{stats}"),
//!     |code| println!("finished with code {code}"),
//! );
//! job.start(&host);
//!
//! // ... later, from any thread
//! job.cancel();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod job;
pub mod render;
pub mod types;

// Re-exports for convenience
pub use config::{Config, EngineConfig, HostConfig};
pub use engine::{CancelToken, Engine, FfmpegCliEngine, Statistics};
pub use error::{Error, Result};
pub use job::{JobHost, JobState, TranscodeJob};
pub use render::{
    AspectMode, DisplayGeometry, Rect, RenderSurface, Renderer, Size, SoftwareRenderer,
    TextureDevice, TextureRenderer,
};
pub use types::VideoFrame;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
