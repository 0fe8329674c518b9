//! RGB pixel buffers handed to and produced by the software exporter.

use crate::types::ImageInfo;

/// An RGB image with 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    ///
    /// The buffer is taken as given; consumers check [`Self::is_consistent`]
    /// and report a mismatch as an error.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An image of a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgb.iter().copied().cycle().take(count * 3).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build from RGBA data (canvas `ImageData` layout), dropping alpha.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        let pixels = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Expand to RGBA with opaque alpha, for canvas `ImageData`.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect()
    }

    /// Dimensions as the geometry engine sees them.
    pub fn info(&self) -> ImageInfo {
        ImageInfo::new(self.width, self.height)
    }

    /// Pixel at `(x, y)`; the caller keeps the coordinates in range.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// True if the buffer length matches the dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * 3
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
