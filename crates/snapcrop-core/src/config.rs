//! Construction-time configuration for the cropper.
//!
//! Every field has a default, and the struct deserializes with
//! `#[serde(default)]`, so hosts can pass a partial object such as
//! `{ viewportWidth: 300, maxScale: 8 }`.

use crate::types::Viewport;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a [`CropperConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Viewport width or height is zero, negative or not finite.
    #[error("Invalid viewport: {width}x{height} must be finite and positive")]
    InvalidViewport { width: f64, height: f64 },

    /// Device pixel ratio is zero, negative or not finite.
    #[error("Invalid device pixel ratio: {0}")]
    InvalidPixelRatio(f64),

    /// Scale limits are not a non-empty positive range.
    #[error("Invalid scale range: min ({min}) must be positive and not exceed max ({max})")]
    InvalidScaleRange { min: f64, max: f64 },

    /// Minimum crop size cannot fit inside the viewport.
    #[error("Minimum crop size {min_crop_size} does not fit a {width}x{height} viewport")]
    CropSizeTooLarge {
        min_crop_size: f64,
        width: f64,
        height: f64,
    },

    /// A length setting is negative or not finite.
    #[error("Invalid value for {name}: {value}")]
    InvalidLength { name: &'static str, value: f64 },
}

/// How the image is fitted when loaded or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitPolicy {
    /// Scale the image so it fully covers a default crop box, and keep it
    /// covering the crop box after every gesture.
    #[default]
    Cover,
    /// Scale the image to fit inside the viewport with a margin and derive the
    /// crop box from the image bounds. The image is kept inside the viewport.
    Contain,
}

/// How dragging a crop box corner changes its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizePolicy {
    /// Square box, the opposite corner stays fixed.
    #[default]
    Square,
    /// The two edges meeting at the dragged corner move independently.
    FreeAspect,
}

/// What single-finger gestures operate on when routing is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    /// Gestures pan and zoom the image.
    #[default]
    EditImage,
    /// Gestures move and resize the crop box.
    Crop,
}

/// How touch sequences are classified into interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoutingMode {
    /// Hit-test crop box corners and interior at touch start.
    #[default]
    Auto,
    /// A host-controlled mode toggle decides; two fingers always pinch.
    Explicit(EditMode),
}

/// An RGBA colour with straight alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` notation, for canvas 2D hosts.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Colours and line widths of the crop overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayStyle {
    /// Fill outside the crop window
    pub mask_color: Color,
    /// Crop window outline
    pub border_color: Color,
    pub border_width: f64,
    /// Rule-of-thirds lines
    pub grid_color: Color,
    pub grid_width: f64,
    /// Corner handle fill and outline
    pub handle_fill: Color,
    pub handle_stroke: Color,
    pub handle_stroke_width: f64,
    /// Background shown while no image is loaded
    pub placeholder_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            mask_color: Color::rgba(0, 0, 0, 0.6),
            border_color: Color::WHITE,
            border_width: 2.0,
            grid_color: Color::rgba(255, 255, 255, 0.5),
            grid_width: 1.0,
            handle_fill: Color::WHITE,
            handle_stroke: Color::rgb(0, 122, 255),
            handle_stroke_width: 2.0,
            placeholder_color: Color::rgb(245, 245, 245),
        }
    }
}

/// Cropper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperConfig {
    /// Canvas width in logical units
    pub viewport_width: f64,
    /// Canvas height in logical units
    pub viewport_height: f64,
    /// Physical pixels per logical unit (default export resolution)
    pub device_pixel_ratio: f64,
    /// Smallest allowed zoom
    pub min_scale: f64,
    /// Largest allowed zoom
    pub max_scale: f64,
    /// Smallest crop window edge
    pub min_crop_size: f64,
    /// Corner handle draw radius, also the base hit radius
    pub handle_hit_radius: f64,
    /// Extra slack added to the corner hit radius
    pub corner_hit_tolerance: f64,
    /// Extra margin kept between the image edge and the crop window (cover)
    /// or the viewport edge (contain)
    pub boundary_padding: f64,
    /// Margin used by the fit-on-load policy
    pub initial_padding: f64,
    /// Crop window rounding
    pub corner_radius: f64,
    /// Pan motion below this many units per frame is ignored
    pub touch_threshold: f64,
    /// Minimum time between two redraws
    pub redraw_interval_ms: f64,
    pub fit_policy: FitPolicy,
    pub resize_policy: ResizePolicy,
    pub routing: RoutingMode,
    pub overlay: OverlayStyle,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            viewport_width: 350.0,
            viewport_height: 350.0,
            device_pixel_ratio: 1.0,
            min_scale: 0.01,
            max_scale: 5.0,
            min_crop_size: 50.0,
            handle_hit_radius: 12.0,
            corner_hit_tolerance: 5.0,
            boundary_padding: 0.0,
            initial_padding: 40.0,
            corner_radius: 0.0,
            touch_threshold: 1.0,
            redraw_interval_ms: 8.0,
            fit_policy: FitPolicy::default(),
            resize_policy: ResizePolicy::default(),
            routing: RoutingMode::default(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl CropperConfig {
    /// Create a default configuration for a viewport of the given size.
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.viewport_width,
            self.viewport_height,
            self.device_pixel_ratio,
        )
    }

    /// Radius within which a touch grabs a corner handle.
    #[inline]
    pub fn corner_grab_radius(&self) -> f64 {
        self.handle_hit_radius + self.corner_hit_tolerance
    }

    /// Check that the configuration describes a usable cropper.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.viewport_width, self.viewport_height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }

        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(ConfigError::InvalidPixelRatio(self.device_pixel_ratio));
        }

        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidScaleRange { min, max });
        }

        let lengths = [
            ("min_crop_size", self.min_crop_size),
            ("handle_hit_radius", self.handle_hit_radius),
            ("corner_hit_tolerance", self.corner_hit_tolerance),
            ("boundary_padding", self.boundary_padding),
            ("initial_padding", self.initial_padding),
            ("corner_radius", self.corner_radius),
            ("touch_threshold", self.touch_threshold),
            ("redraw_interval_ms", self.redraw_interval_ms),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidLength { name, value });
            }
        }

        if self.min_crop_size > width.min(height) {
            return Err(ConfigError::CropSizeTooLarge {
                min_crop_size: self.min_crop_size,
                width,
                height,
            });
        }

        Ok(())
    }
}
