//! Software compositing backend
//!
//! Owns an RGBA canvas sized to the viewport and blits frames into it with
//! nearest-neighbor sampling. The host compositor presents `canvas()`;
//! letterbox and pillarbox bars keep whatever the last clear painted.

use crate::error::{Error, Result};
use crate::render::{Rect, Renderer, Size};
use crate::types::VideoFrame;

/// Opaque black, the conventional video background
const DEFAULT_BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// CPU rendering backend over an RGBA8 canvas
pub struct SoftwareRenderer {
    canvas: Vec<u8>,
    canvas_width: u32,
    canvas_height: u32,
    background: [u8; 4],
}

impl SoftwareRenderer {
    /// Create a canvas matching the viewport, filled with the background
    pub fn new(viewport: Size) -> Self {
        let (canvas_width, canvas_height) = canvas_dimensions(viewport);
        let mut renderer = Self {
            canvas: vec![0u8; canvas_width as usize * canvas_height as usize * 4],
            canvas_width,
            canvas_height,
            background: DEFAULT_BACKGROUND,
        };
        renderer.fill_background();
        renderer
    }

    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self.fill_background();
        self
    }

    /// The composited RGBA pixels, row-major, tightly packed
    pub fn canvas(&self) -> &[u8] {
        &self.canvas
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// One canvas pixel, if inside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas_width || y >= self.canvas_height {
            return None;
        }
        let idx = (y as usize * self.canvas_width as usize + x as usize) * 4;
        self.canvas
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    fn fill_background(&mut self) {
        for px in self.canvas.chunks_exact_mut(4) {
            px.copy_from_slice(&self.background);
        }
    }
}

impl Renderer for SoftwareRenderer {
    fn draw(&mut self, frame: &VideoFrame, dest: Rect) -> Result<()> {
        if frame.width == 0 || frame.height == 0 {
            return Ok(());
        }

        let stride = frame.stride as usize;
        let required = (frame.height as usize - 1) * stride + frame.width as usize * 4;
        if frame.data.len() < required {
            return Err(Error::InvalidFrame("Frame buffer too small".into()));
        }

        let dest_x = dest.x.round() as i64;
        let dest_y = dest.y.round() as i64;
        let dest_w = dest.width.round() as i64;
        let dest_h = dest.height.round() as i64;
        if dest_w <= 0 || dest_h <= 0 {
            return Ok(());
        }

        // visible part of the destination, clipped to the canvas
        let x0 = dest_x.max(0);
        let y0 = dest_y.max(0);
        let x1 = (dest_x + dest_w).min(self.canvas_width as i64);
        let y1 = (dest_y + dest_h).min(self.canvas_height as i64);

        let src_w = frame.width as i64;
        let src_h = frame.height as i64;
        let canvas_w = self.canvas_width as i64;

        for cy in y0..y1 {
            let src_y = ((cy - dest_y) * src_h / dest_h) as usize;
            for cx in x0..x1 {
                let src_x = ((cx - dest_x) * src_w / dest_w) as usize;

                let src_idx = src_y * stride + src_x * 4;
                let dst_idx = ((cy * canvas_w + cx) * 4) as usize;

                self.canvas[dst_idx..dst_idx + 4]
                    .copy_from_slice(&frame.data[src_idx..src_idx + 4]);
            }
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.fill_background();
        Ok(())
    }

    fn resize(&mut self, viewport: Size) -> Result<()> {
        let (canvas_width, canvas_height) = canvas_dimensions(viewport);
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        self.canvas = vec![0u8; canvas_width as usize * canvas_height as usize * 4];
        self.fill_background();
        Ok(())
    }
}

fn canvas_dimensions(viewport: Size) -> (u32, u32) {
    if viewport.is_degenerate() {
        (0, 0)
    } else {
        (
            viewport.width.round() as u32,
            viewport.height.round() as u32,
        )
    }
}
