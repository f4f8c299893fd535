//! Frame presentation
//!
//! A [`RenderSurface`] owns one rendering backend and the geometry that
//! places decoded frames inside the host view. Frames arrive one at a time
//! through [`RenderSurface::render`]; the most recent frame is retained so
//! the host can ask for a redraw after layout changes without new pixels.
//!
//! Backends implement [`Renderer`] and are chosen at construction: a
//! compositing backend that blits into a CPU canvas, and a texture backend
//! that uploads into a GPU texture owned by an external device. The surface
//! never switches backends at runtime.

pub mod geometry;
pub mod software;
pub mod texture;

use crate::error::Result;
use crate::types::VideoFrame;

pub use geometry::{AspectMode, DisplayGeometry, Rect, Size};
pub use software::SoftwareRenderer;
pub use texture::{TextureDevice, TextureRenderer};

/// Trait for rendering backends
pub trait Renderer {
    /// Draw a frame into the destination rectangle
    fn draw(&mut self, frame: &VideoFrame, dest: Rect) -> Result<()>;

    /// Present an empty target (playback stopped)
    fn clear(&mut self) -> Result<()>;

    /// The viewport changed size
    fn resize(&mut self, viewport: Size) -> Result<()>;
}

/// Presentation surface for decoded frames
///
/// The surface is single-threaded by UI convention: all mutation happens on
/// the rendering thread, so there is no internal locking. Frame dimensions
/// are fixed at construction; a frame with different dimensions is a
/// programming error and panics at the `render` call.
pub struct RenderSurface {
    renderer: Box<dyn Renderer>,
    viewport: Size,
    aspect_mode: AspectMode,
    frame_width: u32,
    frame_height: u32,
    geometry: DisplayGeometry,
    last_frame: Option<VideoFrame>,
}

impl RenderSurface {
    /// Create a surface for frames of a fixed size
    pub fn new(
        viewport: Size,
        renderer: Box<dyn Renderer>,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let aspect_mode = AspectMode::default();
        let geometry = DisplayGeometry::compute(viewport, frame_width, frame_height, aspect_mode);
        Self {
            renderer,
            viewport,
            aspect_mode,
            frame_width,
            frame_height,
            geometry,
            last_frame: None,
        }
    }

    /// Draw a frame, or present an empty target when playback stopped
    ///
    /// `Some(frame)` draws at the precomputed display rect and retains the
    /// frame for later redraws. `None` clears the target and drops the
    /// retained frame, so a following `update_view` has nothing to redraw.
    pub fn render(&mut self, frame: Option<VideoFrame>) -> Result<()> {
        match frame {
            Some(frame) => {
                assert!(
                    frame.width == self.frame_width && frame.height == self.frame_height,
                    "frame is {}x{}, surface expects {}x{}",
                    frame.width,
                    frame.height,
                    self.frame_width,
                    self.frame_height,
                );
                self.renderer.draw(&frame, self.geometry.video_frame)?;
                self.last_frame = Some(frame);
                Ok(())
            }
            None => {
                self.last_frame = None;
                self.renderer.clear()
            }
        }
    }

    /// Redraw the retained frame with the current geometry
    ///
    /// No-op when nothing is retained.
    pub fn update_view(&mut self) -> Result<()> {
        if let Some(frame) = &self.last_frame {
            self.renderer.draw(frame, self.geometry.video_frame)?;
        }
        Ok(())
    }

    /// Adopt a new viewport from the host layout pass
    pub fn set_viewport(&mut self, viewport: Size) -> Result<()> {
        self.viewport = viewport;
        self.recompute_geometry();
        self.renderer.resize(viewport)
    }

    /// Switch between letterboxed and cropped presentation
    pub fn set_aspect_mode(&mut self, mode: AspectMode) {
        if self.aspect_mode != mode {
            self.aspect_mode = mode;
            self.recompute_geometry();
        }
    }

    /// Where the frame is drawn under the current mode
    pub fn video_frame(&self) -> Rect {
        self.geometry.video_frame
    }

    /// The letterboxed rect, independent of the current mode
    pub fn aspect_fit_video_frame(&self) -> Rect {
        self.geometry.aspect_fit_video_frame
    }

    pub fn aspect_mode(&self) -> AspectMode {
        self.aspect_mode
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn has_frame(&self) -> bool {
        self.last_frame.is_some()
    }

    fn recompute_geometry(&mut self) {
        self.geometry = DisplayGeometry::compute(
            self.viewport,
            self.frame_width,
            self.frame_height,
            self.aspect_mode,
        );
    }
}
