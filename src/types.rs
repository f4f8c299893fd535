//! Common types used throughout ReelKit

use std::time::Duration;

/// A decoded video frame handed to the render surface
///
/// The payload layout is the pixel agreement between the frame producer and
/// the rendering backend: tightly packed 4-byte RGBA rows for the software
/// compositor, device-defined for the texture path. `stride` is the byte
/// distance between row starts and may exceed `width * 4` for padded buffers.
#[derive(Debug)]
pub struct VideoFrame {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Row stride in bytes
    pub stride: u32,
    /// Presentation timestamp
    pub pts: Duration,
}

impl VideoFrame {
    /// Create a new frame with a zeroed RGBA buffer
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width * 4;
        Self {
            data: vec![0u8; (stride * height) as usize],
            width,
            height,
            stride,
            pts: Duration::ZERO,
        }
    }

    /// Create a frame from existing data
    pub fn from_data(data: Vec<u8>, width: u32, height: u32, stride: u32, pts: Duration) -> Self {
        Self {
            data,
            width,
            height,
            stride,
            pts,
        }
    }

    /// Payload size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// One row of pixel data, honoring stride
    ///
    /// Returns `None` when `y` is out of range or the payload is shorter
    /// than the stride/height it claims.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.stride as usize);
        let end = start + (self.width as usize) * 4;
        self.data.get(start..end)
    }
}
