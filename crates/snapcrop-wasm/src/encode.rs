//! Image encoding WASM bindings.
//!
//! Encodes an exported raster so the host can hand it to a `Blob` or an
//! upload without going through `canvas.toBlob`.
//!
//! ```typescript
//! const out = cropper.export_image(source, 1024, 1024, true);
//! const jpeg = encode_jpeg(out, 90);
//! const blob = new Blob([jpeg], { type: 'image/jpeg' });
//! ```

use crate::types::JsDecodedImage;
use snapcrop_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an image to JPEG bytes. `quality` is 1-100 (recommended: 90).
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsDecodedImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    let img = image.to_decoded();
    encode::encode(&img, encode::OutputFormat::Jpeg { quality })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image to lossless PNG bytes.
#[wasm_bindgen]
pub fn encode_png(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    let img = image.to_decoded();
    encode::encode(&img, encode::OutputFormat::Png).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Tests for encode bindings.
///
/// Only the success paths run natively; error paths build a `JsValue` and
/// are covered by the core's encode tests.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_from_image() {
        let img = JsDecodedImage::new(10, 10, vec![128u8; 10 * 10 * 3]);
        let jpeg = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_from_image() {
        let img = JsDecodedImage::new(3, 2, vec![50u8; 3 * 2 * 3]);
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_quality_extremes_encode() {
        let img = JsDecodedImage::new(8, 8, vec![200u8; 8 * 8 * 3]);
        let low = encode_jpeg(&img, 1).unwrap();
        let high = encode_jpeg(&img, 100).unwrap();
        assert!(!low.is_empty());
        assert!(!high.is_empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_rejects_bad_buffer() {
        let img = JsDecodedImage::new(10, 10, vec![0u8; 7]);
        assert!(encode_jpeg(&img, 90).is_err());
        assert!(encode_png(&img).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_rejects_empty_image() {
        let img = JsDecodedImage::new(0, 0, Vec::new());
        assert!(encode_png(&img).is_err());
    }
}
