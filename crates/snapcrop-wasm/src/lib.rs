//! Snapcrop WASM - WebAssembly bindings for Snapcrop
//!
//! This crate exposes the snapcrop-core cropper to JavaScript/TypeScript
//! hosts that own a canvas and its touch events.
//!
//! # Module Structure
//!
//! - `cropper` - The `JsCropper` controller (gestures, render plans, export)
//! - `types` - WASM-compatible wrapper types for image data
//! - `encode` - JPEG / PNG encoding of exported images
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@snapcrop/wasm';
//!
//! await init();
//!
//! const cropper = new JsCropper({ fitPolicy: 'cover' });
//! cropper.image_loaded(img.naturalWidth, img.naturalHeight);
//! const plan = cropper.render_plan();
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod encode;
mod types;

// Re-export public types
pub use cropper::JsCropper;
pub use encode::{encode_jpeg, encode_png};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
