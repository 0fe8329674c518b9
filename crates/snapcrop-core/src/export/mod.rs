//! Export: rasterize exactly what is visible inside the crop window.
//!
//! An [`ExportPlan`] reuses the on-screen image blit and prefixes it with a
//! crop-window-to-destination mapping:
//!
//! ```text
//! scale(dest / crop) → translate(-crop.x, -crop.y)
//!   → translate(center) → rotate → scale(s) → draw_image centered
//! ```
//!
//! Only the destination size depends on the device pixel ratio; the
//! geometry is the same at any output resolution.
//!
//! Rasterization itself is behind the [`Rasterizer`] trait so hosts can use
//! a native canvas. [`SoftwareRasterizer`] renders plans in pure Rust.

mod affine;
mod raster;

pub use affine::Affine;
pub use raster::{InterpolationFilter, SoftwareRasterizer};

use crate::render::{blit_ops, DrawOp};
use crate::transform::Transform;
use crate::types::{CropBox, ImageInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while exporting.
#[derive(Debug, Error, PartialEq)]
pub enum ExportError {
    /// No image is loaded.
    #[error("No image loaded")]
    NoImage,

    /// Destination width or height is zero.
    #[error("Invalid export dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The pixels handed to the rasterizer are not the loaded image.
    #[error("Source image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    SourceMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The rasterizer failed.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
}

/// Drawing instructions for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub dest_width: u32,
    pub dest_height: u32,
    pub crop_box: CropBox,
    pub image: ImageInfo,
    pub ops: Vec<DrawOp>,
}

impl ExportPlan {
    /// Plan an export of `crop` into a `dest_width × dest_height` raster.
    pub fn new(
        transform: &Transform,
        crop: &CropBox,
        image: ImageInfo,
        dest_width: u32,
        dest_height: u32,
    ) -> Result<Self, ExportError> {
        if dest_width == 0 || dest_height == 0 {
            return Err(ExportError::InvalidDimensions {
                width: dest_width,
                height: dest_height,
            });
        }

        let mut ops = Vec::with_capacity(8);
        ops.push(DrawOp::Scale {
            x: f64::from(dest_width) / crop.width,
            y: f64::from(dest_height) / crop.height,
        });
        ops.push(DrawOp::Translate {
            x: -crop.x,
            y: -crop.y,
        });
        ops.extend(blit_ops(transform, image));

        Ok(Self {
            dest_width,
            dest_height,
            crop_box: *crop,
            image,
            ops,
        })
    }

    /// Destination size for a device pixel ratio: the crop box in physical
    /// pixels, at least 1×1.
    pub fn default_size(crop: &CropBox, device_pixel_ratio: f64) -> (u32, u32) {
        let side = |len: f64| (len * device_pixel_ratio).round().max(1.0) as u32;
        (side(crop.width), side(crop.height))
    }

    /// Matrix from source pixel coordinates to destination pixels.
    ///
    /// Folds the plan's transform ops up to the image draw, honouring
    /// save/restore. Returns `None` if the plan draws no image.
    pub fn image_to_dest(&self) -> Option<Affine> {
        let mut current = Affine::IDENTITY;
        let mut stack = Vec::new();
        for op in &self.ops {
            match *op {
                DrawOp::Save => stack.push(current),
                DrawOp::Restore => current = stack.pop().unwrap_or(Affine::IDENTITY),
                DrawOp::Translate { x, y } => current = current.translate(x, y),
                DrawOp::Rotate { radians } => current = current.rotate(radians),
                DrawOp::Scale { x, y } => current = current.scale(x, y),
                DrawOp::DrawImage {
                    x,
                    y,
                    width,
                    height,
                } => {
                    return Some(current.translate(x, y).scale(
                        width / f64::from(self.image.width),
                        height / f64::from(self.image.height),
                    ));
                }
                _ => {}
            }
        }
        None
    }
}

/// Renders an [`ExportPlan`] from the host's image.
pub trait Rasterizer {
    /// The image the plan is drawn from
    type Source: ?Sized;
    /// The produced raster
    type Output;

    fn rasterize(
        &mut self,
        plan: &ExportPlan,
        source: &Self::Source,
    ) -> Result<Self::Output, ExportError>;
}
