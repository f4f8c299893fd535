//! GPU texture backend
//!
//! Owns the texture-upload step between decoded frames and the host's GPU
//! drawing primitives. The primitives themselves live behind
//! [`TextureDevice`], implemented by the embedding application; this backend
//! decides when textures exist and what goes into them.

use crate::error::{Error, Result};
use crate::render::{Rect, Renderer, Size};
use crate::types::VideoFrame;

/// Handle for a texture minted by a [`TextureDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// External GPU boundary owning the actual drawing primitives
///
/// Uploads hand over tightly packed RGBA rows; the pixel format on the GPU
/// side is the device's contract.
pub trait TextureDevice {
    /// Allocate a texture, returning the device's handle for it
    fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureId>;

    /// Copy packed RGBA rows into the texture
    fn upload(&mut self, texture: TextureId, data: &[u8]) -> Result<()>;

    /// Draw the texture into the destination rectangle
    fn draw_texture(&mut self, texture: TextureId, dest: Rect) -> Result<()>;

    /// Present an empty target
    fn clear(&mut self) -> Result<()>;

    /// The render target changed size
    fn resize(&mut self, viewport: Size) -> Result<()>;
}

/// Rendering backend that drives a [`TextureDevice`]
///
/// One texture is created lazily at the fixed frame dimensions and reused
/// for the surface's lifetime; every draw re-uploads the frame payload
/// first, so the device always samples current pixels.
pub struct TextureRenderer {
    device: Box<dyn TextureDevice>,
    texture: Option<TextureId>,
    frame_width: u32,
    frame_height: u32,
    upload_buffer: Vec<u8>,
}

impl TextureRenderer {
    pub fn new(device: Box<dyn TextureDevice>, frame_width: u32, frame_height: u32) -> Self {
        Self {
            device,
            texture: None,
            frame_width,
            frame_height,
            upload_buffer: Vec::new(),
        }
    }
}

impl Renderer for TextureRenderer {
    fn draw(&mut self, frame: &VideoFrame, dest: Rect) -> Result<()> {
        if frame.width != self.frame_width || frame.height != self.frame_height {
            return Err(Error::InvalidFrame(format!(
                "frame is {}x{}, texture is {}x{}",
                frame.width, frame.height, self.frame_width, self.frame_height
            )));
        }

        let texture = match self.texture {
            Some(texture) => texture,
            None => {
                let texture = self
                    .device
                    .create_texture(self.frame_width, self.frame_height)?;
                self.texture = Some(texture);
                texture
            }
        };

        let tight = self.frame_width as usize * 4;
        let tight_len = tight * self.frame_height as usize;
        if frame.stride as usize == tight && frame.data.len() >= tight_len {
            self.device.upload(texture, &frame.data[..tight_len])?;
        } else {
            // padded rows: repack before handing bytes to the device
            self.upload_buffer.clear();
            self.upload_buffer.reserve(tight_len);
            for y in 0..frame.height {
                let row = frame
                    .row(y)
                    .ok_or_else(|| Error::InvalidFrame("Frame buffer too small".into()))?;
                self.upload_buffer.extend_from_slice(row);
            }
            self.device.upload(texture, &self.upload_buffer)?;
        }

        self.device.draw_texture(texture, dest)
    }

    fn clear(&mut self) -> Result<()> {
        self.device.clear()
    }

    fn resize(&mut self, viewport: Size) -> Result<()> {
        self.device.resize(viewport)
    }
}
