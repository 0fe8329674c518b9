//! Crop box operations: hit testing, moving and resizing.
//!
//! All operations start from the crop box captured when the gesture began
//! plus the total pointer motion since then, so a drag that wanders off and
//! comes back restores the original box exactly.
//!
//! # Resize policies
//!
//! - **Square**: the corner opposite the dragged one is the anchor. The new
//!   side is the larger of the pointer's horizontal and vertical distance
//!   from the anchor, limited by `min_crop_size` and by the room between the
//!   anchor and the viewport edges in the drag direction.
//! - **Free aspect**: the two edges meeting at the dragged corner follow the
//!   pointer independently; the other two edges stay put.

use super::rotation::{rotated_dimensions, HalfExtent, Rotation};
use crate::config::{CropperConfig, ResizePolicy};
use crate::types::{Corner, CropBox, ImageInfo, Point, Viewport};

/// Which point of the crop box stays fixed when it has to shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkAnchor {
    Center,
    Corner(Corner),
}

/// Find the corner handle under a touch point.
///
/// Corners are tested in the order TL, TR, BR, BL; the first one within
/// `radius` (inclusive) wins.
pub fn hit_test_corner(crop: &CropBox, point: Point, radius: f64) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|&corner| crop.corner(corner).distance(point) <= radius)
}

/// Translate the crop box, keeping it inside the viewport.
pub fn move_crop_box(start: &CropBox, delta: Point, viewport: &Viewport) -> CropBox {
    CropBox {
        x: (start.x + delta.x).clamp(0.0, (viewport.width - start.width).max(0.0)),
        y: (start.y + delta.y).clamp(0.0, (viewport.height - start.height).max(0.0)),
        ..*start
    }
}

/// Square resize around the corner opposite to `corner`.
pub fn resize_square(
    start: &CropBox,
    corner: Corner,
    pointer: Point,
    viewport: &Viewport,
    min_size: f64,
) -> CropBox {
    let anchor = start.corner(corner.opposite());

    let room_x = if corner.is_left() {
        anchor.x
    } else {
        viewport.width - anchor.x
    };
    let room_y = if corner.is_top() {
        anchor.y
    } else {
        viewport.height - anchor.y
    };

    let size = (pointer.x - anchor.x)
        .abs()
        .max((pointer.y - anchor.y).abs())
        .min(room_x.min(room_y))
        .max(min_size);

    let x = if corner.is_left() { anchor.x - size } else { anchor.x };
    let y = if corner.is_top() { anchor.y - size } else { anchor.y };

    // Only moves the box when the anchor sits closer than min_size to an edge
    CropBox {
        x: x.clamp(0.0, (viewport.width - size).max(0.0)),
        y: y.clamp(0.0, (viewport.height - size).max(0.0)),
        width: size,
        height: size,
        corner_radius: start.corner_radius,
    }
}

/// Free-aspect resize: the edges at `corner` follow the pointer motion.
pub fn resize_free(
    start: &CropBox,
    corner: Corner,
    delta: Point,
    viewport: &Viewport,
    min_size: f64,
) -> CropBox {
    let (mut left, mut top) = (start.x, start.y);
    let (mut right, mut bottom) = (start.right(), start.bottom());

    if corner.is_left() {
        left = (start.x + delta.x).min(right - min_size).max(0.0);
    } else {
        right = (start.right() + delta.x).max(left + min_size).min(viewport.width);
    }

    if corner.is_top() {
        top = (start.y + delta.y).min(bottom - min_size).max(0.0);
    } else {
        bottom = (start.bottom() + delta.y).max(top + min_size).min(viewport.height);
    }

    CropBox {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
        corner_radius: start.corner_radius,
    }
}

/// Resize according to the configured policy.
pub fn resize_crop_box(
    start: &CropBox,
    corner: Corner,
    start_pointer: Point,
    pointer: Point,
    viewport: &Viewport,
    config: &CropperConfig,
) -> CropBox {
    match config.resize_policy {
        ResizePolicy::Square => {
            resize_square(start, corner, pointer, viewport, config.min_crop_size)
        }
        ResizePolicy::FreeAspect => {
            let delta = Point::new(pointer.x - start_pointer.x, pointer.y - start_pointer.y);
            resize_free(start, corner, delta, viewport, config.min_crop_size)
        }
    }
}

/// Crop box hugging the on-screen image bounds, clamped into the viewport.
pub fn crop_box_from_bounds(
    center: Point,
    extent: HalfExtent,
    viewport: &Viewport,
    min_size: f64,
) -> CropBox {
    let width = (extent.half_width * 2.0).min(viewport.width).max(min_size);
    let height = (extent.half_height * 2.0).min(viewport.height).max(min_size);

    CropBox::new(
        (center.x - width / 2.0).clamp(0.0, (viewport.width - width).max(0.0)),
        (center.y - height / 2.0).clamp(0.0, (viewport.height - height).max(0.0)),
        width,
        height,
    )
}

/// Shrink a crop box to the largest size the image can cover at `max_scale`.
///
/// Never goes below `min_crop_size`; when even that cannot be covered the
/// image clamp falls back to centering (see [`super::clamp_to_cover`]).
pub fn shrink_to_coverage(
    crop: CropBox,
    image: ImageInfo,
    rotation: Rotation,
    viewport: &Viewport,
    config: &CropperConfig,
    anchor: ShrinkAnchor,
) -> CropBox {
    let (rw, rh) = rotated_dimensions(image, rotation);
    let padding = 2.0 * config.boundary_padding;
    let coverable_w = rw * config.max_scale - padding;
    let coverable_h = rh * config.max_scale - padding;

    let mut width = crop.width.min(coverable_w).max(config.min_crop_size);
    let mut height = crop.height.min(coverable_h).max(config.min_crop_size);
    if config.resize_policy == ResizePolicy::Square {
        let side = width.min(height);
        width = side;
        height = side;
    }

    let (x, y) = match anchor {
        ShrinkAnchor::Center => {
            let c = crop.center();
            (c.x - width / 2.0, c.y - height / 2.0)
        }
        ShrinkAnchor::Corner(fixed) => {
            let p = crop.corner(fixed);
            let x = if fixed.is_left() { p.x } else { p.x - width };
            let y = if fixed.is_top() { p.y } else { p.y - height };
            (x, y)
        }
    };

    CropBox {
        x: x.clamp(0.0, (viewport.width - width).max(0.0)),
        y: y.clamp(0.0, (viewport.height - height).max(0.0)),
        width,
        height,
        corner_radius: crop.corner_radius,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
