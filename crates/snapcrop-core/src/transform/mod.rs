//! Geometry engine: image transform and crop box math.
//!
//! Everything in this module is a pure function of its inputs. Mutable state
//! lives in [`crate::state::EditorState`], which composes these functions.
//!
//! # Coordinate System
//!
//! - Viewport coordinates in logical units, origin top-left, y down
//! - The image is drawn centered on [`Transform::center`], rotated by
//!   [`Transform::rotation`] (positive = clockwise on screen), then scaled
//! - Image sizes are in source pixels; `scale` maps source pixels to
//!   viewport units
//!
//! # Constraints
//!
//! After every operation the engine restores:
//! - **No gap** (cover fit): the rotated image bounding box contains the crop box
//! - **Bounds**: the crop box lies inside the viewport and is at least
//!   `min_crop_size` on each side
//! - **Scale**: `min_scale <= scale <= max_scale`

mod clamp;
mod crop;
mod fit;
mod motion;
mod rotation;

pub use clamp::{clamp_to_cover, clamp_to_viewport, constrain, covers, scale_bounds};
pub use crop::{
    crop_box_from_bounds, hit_test_corner, move_crop_box, resize_crop_box, resize_free,
    resize_square, shrink_to_coverage, ShrinkAnchor,
};
pub use fit::{contain_scale, cover_scale, default_crop_box, fit_on_load};
pub use motion::{pan, pinch, rotate, RotateDirection};
pub use rotation::{
    rotated_dimensions, rotated_half_extent, ExtentCache, ExtentKey, HalfExtent, Rotation,
};

use crate::types::{ImageInfo, Point};
use serde::{Deserialize, Serialize};

/// Placement of the image inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Image center in viewport units
    pub center: Point,
    /// Viewport units per source pixel
    pub scale: f64,
    pub rotation: Rotation,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            center: Point::default(),
            scale: 1.0,
            rotation: Rotation::R0,
        }
    }
}

impl Transform {
    pub fn new(center: Point, scale: f64, rotation: Rotation) -> Self {
        Self {
            center,
            scale,
            rotation,
        }
    }

    /// Unrotated on-screen size of the image.
    pub fn displayed_size(&self, image: ImageInfo) -> (f64, f64) {
        (
            f64::from(image.width) * self.scale,
            f64::from(image.height) * self.scale,
        )
    }

    /// Rotated half extents at this transform.
    pub fn half_extent(&self, image: ImageInfo) -> HalfExtent {
        rotated_half_extent(image, self.scale, self.rotation)
    }
}
