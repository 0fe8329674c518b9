//! WASM-compatible wrapper types for pixel data.
//!
//! Hosts decode the picture themselves (an `<img>` drawn to an offscreen
//! canvas) and hand the RGB bytes over as a [`JsDecodedImage`] when they want
//! the export rasterized in WASM instead of on a native canvas.

use snapcrop_core::pixels::DecodedImage;
use wasm_bindgen::prelude::*;

/// An RGB image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`; keep the image on the WASM side when it is only fed back
/// into the cropper.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from RGB pixel data (3 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    /// Create an image from RGBA pixel data, as returned by
    /// `CanvasRenderingContext2D.getImageData`. Alpha is dropped.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<JsDecodedImage, JsValue> {
        DecodedImage::from_rgba(width, height, rgba)
            .map(Self::from_decoded)
            .ok_or_else(|| {
                JsValue::from_str(&format!(
                    "Invalid RGBA data: {} bytes for a {}x{} image",
                    rgba.len(),
                    width,
                    height
                ))
            })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGB pixel data as a `Uint8Array` (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// RGBA pixel data with opaque alpha, ready for `new ImageData(...)`.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.to_decoded().to_rgba()
    }

    /// Explicitly release the WASM memory. Optional, the finalizer does the
    /// same.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage::new(self.width, self.height, self.pixels.clone())
    }
}
