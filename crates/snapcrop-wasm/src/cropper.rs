//! WASM bindings for the cropper controller.
//!
//! [`JsCropper`] wraps [`snapcrop_core::Cropper`]. Structured values (touch
//! lists, render plans, events, transforms) cross the boundary as plain JS
//! objects through `serde-wasm-bindgen`; keys are camelCase.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsCropper({ viewportWidth: 350, viewportHeight: 350 });
//! img.onload = () => cropper.image_loaded(img.naturalWidth, img.naturalHeight);
//!
//! canvas.addEventListener('touchmove', (e) => {
//!   const touches = [...e.touches].map((t) => ({ id: t.identifier, x: t.clientX, y: t.clientY }));
//!   if (cropper.touch_move(touches)) {
//!     requestAnimationFrame(() => {
//!       const plan = cropper.request_redraw();
//!       if (plan) replay(ctx, plan);
//!     });
//!   }
//! });
//! ```

use crate::types::JsDecodedImage;
use serde::Serialize;
use snapcrop_core::{
    CropBox, Cropper, CropperConfig, CropperError, EditMode, ImageInfo, InterpolationFilter,
    SessionKind, SoftwareRasterizer, Touch,
};
use wasm_bindgen::prelude::*;

/// Interactive cropper for JavaScript hosts.
#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper. `config` is a partial `CropperConfig` object, or
    /// `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?
        };
        Self::from_config(config).map_err(to_js_error)
    }

    /// The host finished loading an image of the given natural size.
    pub fn image_loaded(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .image_loaded(ImageInfo::new(width, height))
            .map_err(to_js_error)
    }

    pub fn image_load_failed(&mut self, reason: String) {
        self.inner.image_load_failed(reason);
    }

    pub fn image_load_timed_out(&mut self) {
        self.inner.image_load_timed_out();
    }

    /// `touches` is every active touch as `{ id, x, y }`.
    pub fn touch_start(&mut self, touches: JsValue) -> Result<(), JsValue> {
        let touches = parse_touches(touches)?;
        self.inner.touch_start(&touches);
        Ok(())
    }

    /// Returns true if the frame changed the transform or the crop box.
    pub fn touch_move(&mut self, touches: JsValue) -> Result<bool, JsValue> {
        let touches = parse_touches(touches)?;
        Ok(self.inner.touch_move(&touches))
    }

    /// `remaining` is the touches still down after the lift.
    pub fn touch_end(&mut self, remaining: JsValue) -> Result<(), JsValue> {
        let remaining = parse_touches(remaining)?;
        self.inner.touch_end(&remaining);
        Ok(())
    }

    pub fn touch_cancel(&mut self) {
        self.inner.touch_cancel();
    }

    pub fn rotate_clockwise(&mut self) -> Result<(), JsValue> {
        self.inner.rotate_clockwise().map_err(to_js_error)
    }

    pub fn rotate_counter_clockwise(&mut self) -> Result<(), JsValue> {
        self.inner.rotate_counter_clockwise().map_err(to_js_error)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(to_js_error)
    }

    /// `"image"` or `"crop"` for explicit routing, `"auto"` to go back to
    /// the configured routing.
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        if mode == "auto" {
            self.inner.clear_edit_mode();
            return Ok(());
        }
        let mode = edit_mode_from_str(mode)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown edit mode: {}", mode)))?;
        self.inner.set_edit_mode(mode);
        Ok(())
    }

    /// Draw instructions for the current state.
    pub fn render_plan(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.render_plan())
    }

    /// Throttled render plan, `null` when the previous redraw was too
    /// recent. `now_ms` defaults to `Date.now()`.
    pub fn request_redraw(&mut self, now_ms: Option<f64>) -> Result<JsValue, JsValue> {
        let now = now_ms.unwrap_or_else(js_sys::Date::now);
        match self.inner.request_redraw(now) {
            Some(plan) => to_js(&plan),
            None => Ok(JsValue::NULL),
        }
    }

    /// Export plan for a native canvas. With one dimension given the other
    /// follows the crop box aspect; with none, the crop box at the device
    /// pixel ratio.
    pub fn export_plan(
        &self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let size = export_size(self.inner.crop_box(), width, height);
        let plan = self.inner.export_plan(size).map_err(to_js_error)?;
        to_js(&plan)
    }

    /// Rasterize the crop window from `source` in WASM.
    pub fn export_image(
        &mut self,
        source: &JsDecodedImage,
        width: Option<u32>,
        height: Option<u32>,
        use_lanczos: bool,
    ) -> Result<JsDecodedImage, JsValue> {
        self.export_decoded(source, width, height, use_lanczos)
            .map_err(to_js_error)
    }

    /// Drain pending notifications as an array of `{ type, ... }` objects.
    pub fn take_events(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.take_events())
    }

    #[wasm_bindgen(getter)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// `{ center: { x, y }, scale, rotation }`
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.transform())
    }

    /// `{ x, y, width, height, cornerRadius }`
    pub fn crop_box(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.crop_box())
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform().scale
    }

    /// Rotation in degrees: 0, 90, 180 or 270.
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> u16 {
        self.inner.transform().rotation.degrees()
    }

    /// Active gesture: `idle`, `panImage`, `pinchImage`, `moveCrop` or
    /// `resizeCrop`.
    #[wasm_bindgen(getter)]
    pub fn gesture(&self) -> String {
        gesture_name(self.inner.gesture()).to_string()
    }
}

impl JsCropper {
    pub(crate) fn from_config(config: CropperConfig) -> Result<Self, CropperError> {
        Ok(Self {
            inner: Cropper::new(config)?,
        })
    }

    fn export_decoded(
        &mut self,
        source: &JsDecodedImage,
        width: Option<u32>,
        height: Option<u32>,
        use_lanczos: bool,
    ) -> Result<JsDecodedImage, CropperError> {
        let filter = if use_lanczos {
            InterpolationFilter::Lanczos3
        } else {
            InterpolationFilter::Bilinear
        };
        let size = export_size(self.inner.crop_box(), width, height);
        let mut rasterizer = SoftwareRasterizer::new(filter);
        let out = self
            .inner
            .export(&source.to_decoded(), size, &mut rasterizer)?;
        Ok(JsDecodedImage::from_decoded(out))
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js_error(err: CropperError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_touches(value: JsValue) -> Result<Vec<Touch>, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid touch list: {}", e)))
}

pub(crate) fn edit_mode_from_str(mode: &str) -> Option<EditMode> {
    match mode {
        "image" => Some(EditMode::EditImage),
        "crop" => Some(EditMode::Crop),
        _ => None,
    }
}

pub(crate) fn gesture_name(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Idle => "idle",
        SessionKind::PanImage => "panImage",
        SessionKind::PinchImage { .. } => "pinchImage",
        SessionKind::MoveCrop => "moveCrop",
        SessionKind::ResizeCrop { .. } => "resizeCrop",
    }
}

/// Resolve a possibly partial output size against the crop box aspect.
pub(crate) fn export_size(
    crop: &CropBox,
    width: Option<u32>,
    height: Option<u32>,
) -> Option<(u32, u32)> {
    let follow = |given: u32, num: f64, den: f64| -> u32 {
        if den > 0.0 {
            ((f64::from(given) * num / den).round() as u32).max(1)
        } else {
            given
        }
    };
    match (width, height) {
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => Some((w, follow(w, crop.height, crop.width))),
        (None, Some(h)) => Some((follow(h, crop.width, crop.height), h)),
        (None, None) => None,
    }
}
