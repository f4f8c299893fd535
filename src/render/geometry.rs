//! Viewport geometry for frame presentation
//!
//! All rectangle math lives here so the draw path never computes layout.
//! Coordinates are in the host view's point space, origin top-left.

use serde::{Deserialize, Serialize};

/// A 2D size in view points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative, or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle in view points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` rect centered inside `container`
    pub fn centered_in(container: Size, width: f32, height: f32) -> Self {
        Self {
            x: (container.width - width) / 2.0,
            y: (container.height - height) / 2.0,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

/// How the frame fills the viewport when aspect ratios differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectMode {
    /// Letterbox: whole frame visible, bars on the shorter axis
    #[default]
    Fit,
    /// Crop: whole viewport covered, frame overflows the longer axis
    Fill,
}

/// The two display rectangles derived from viewport, frame size, and mode
///
/// `aspect_fit_video_frame` is always the letterboxed rect and never depends
/// on the mode; `video_frame` is where the frame is actually drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayGeometry {
    pub video_frame: Rect,
    pub aspect_fit_video_frame: Rect,
}

impl DisplayGeometry {
    /// Compute both rectangles for the given viewport and frame dimensions
    ///
    /// Degenerate inputs (zero frame dimension, non-positive viewport) yield
    /// zero rects rather than a fault.
    pub fn compute(viewport: Size, frame_width: u32, frame_height: u32, mode: AspectMode) -> Self {
        if frame_width == 0 || frame_height == 0 || viewport.is_degenerate() {
            return Self::default();
        }

        let fw = frame_width as f32;
        let fh = frame_height as f32;
        let scale_x = viewport.width / fw;
        let scale_y = viewport.height / fh;

        let scale_fit = scale_x.min(scale_y);
        let aspect_fit_video_frame = Rect::centered_in(viewport, fw * scale_fit, fh * scale_fit);

        let video_frame = match mode {
            AspectMode::Fit => aspect_fit_video_frame,
            AspectMode::Fill => {
                let scale_fill = scale_x.max(scale_y);
                Rect::centered_in(viewport, fw * scale_fill, fh * scale_fill)
            }
        };

        Self {
            video_frame,
            aspect_fit_video_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_viewport() {
        let geo = DisplayGeometry::compute(Size::new(200.0, 100.0), 100, 100, AspectMode::Fit);
        assert_eq!(geo.aspect_fit_video_frame, Rect::new(50.0, 0.0, 100.0, 100.0));
        assert_eq!(geo.video_frame, geo.aspect_fit_video_frame);
    }

    #[test]
    fn test_fill_wide_viewport() {
        let geo = DisplayGeometry::compute(Size::new(200.0, 100.0), 100, 100, AspectMode::Fill);
        assert_eq!(geo.video_frame, Rect::new(0.0, -50.0, 200.0, 200.0));
        // the fit rect is unchanged by the mode
        assert_eq!(geo.aspect_fit_video_frame, Rect::new(50.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_fit_tall_viewport() {
        let geo = DisplayGeometry::compute(Size::new(100.0, 200.0), 100, 100, AspectMode::Fit);
        assert_eq!(geo.aspect_fit_video_frame, Rect::new(0.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_matching_aspect_ratios() {
        let fit = DisplayGeometry::compute(Size::new(1920.0, 1080.0), 1920, 1080, AspectMode::Fit);
        let fill = DisplayGeometry::compute(Size::new(1920.0, 1080.0), 1920, 1080, AspectMode::Fill);
        assert_eq!(fit.video_frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(fit.video_frame, fill.video_frame);
    }

    #[test]
    fn test_degenerate_viewport() {
        let geo = DisplayGeometry::compute(Size::ZERO, 100, 100, AspectMode::Fit);
        assert_eq!(geo.video_frame, Rect::ZERO);
        assert_eq!(geo.aspect_fit_video_frame, Rect::ZERO);

        let geo = DisplayGeometry::compute(Size::new(-10.0, 50.0), 100, 100, AspectMode::Fill);
        assert_eq!(geo.video_frame, Rect::ZERO);
    }

    #[test]
    fn test_degenerate_frame() {
        let geo = DisplayGeometry::compute(Size::new(200.0, 100.0), 0, 100, AspectMode::Fit);
        assert_eq!(geo.video_frame, Rect::ZERO);
        assert_eq!(geo.aspect_fit_video_frame, Rect::ZERO);
    }

    #[test]
    fn test_fill_rect_covers_viewport() {
        let viewport = Size::new(375.0, 667.0);
        let geo = DisplayGeometry::compute(viewport, 1920, 1080, AspectMode::Fill);
        assert!(geo.video_frame.x <= 0.0);
        assert!(geo.video_frame.y <= 0.0);
        assert!(geo.video_frame.x + geo.video_frame.width >= viewport.width);
        assert!(geo.video_frame.y + geo.video_frame.height >= viewport.height);
        // fit rect stays inside the viewport
        assert!(geo.aspect_fit_video_frame.x >= 0.0);
        assert!(geo.aspect_fit_video_frame.y >= 0.0);
    }

    #[test]
    fn test_centered_in() {
        let rect = Rect::centered_in(Size::new(100.0, 100.0), 40.0, 20.0);
        assert_eq!(rect, Rect::new(30.0, 40.0, 40.0, 20.0));
    }
}
