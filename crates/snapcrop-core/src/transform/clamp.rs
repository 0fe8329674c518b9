//! Position and scale clamping.
//!
//! Two clamp regimes, chosen by [`FitPolicy`]:
//!
//! - **Cover**: the image center is kept where the rotated image bounding box
//!   contains the crop box plus `boundary_padding` on every side. When an axis
//!   cannot be satisfied (image narrower than the crop box, only possible when
//!   the scale is pinned at `max_scale`) the image is centered on the crop box
//!   along that axis instead.
//! - **Contain**: the image is kept inside the viewport inset by
//!   `boundary_padding`. If the image is larger than the viewport on an axis,
//!   it is kept overlapping the whole viewport on that axis instead.

use super::crop::{shrink_to_coverage, ShrinkAnchor};
use super::fit::cover_scale;
use super::rotation::{ExtentCache, HalfExtent};
use super::Transform;
use crate::config::{CropperConfig, FitPolicy};
use crate::types::{CropBox, ImageInfo, Point, Viewport};
use tracing::warn;

/// Tolerance for coverage checks after chained floating point operations.
const COVER_EPSILON: f64 = 1e-6;

#[inline]
fn clamp_axis(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if lo <= hi {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

/// Clamp the image center so the rotated image covers the crop box.
pub fn clamp_to_cover(center: Point, extent: HalfExtent, crop: &CropBox, padding: f64) -> Point {
    let crop_center = crop.center();
    Point::new(
        clamp_axis(
            center.x,
            crop.right() + padding - extent.half_width,
            crop.x - padding + extent.half_width,
            crop_center.x,
        ),
        clamp_axis(
            center.y,
            crop.bottom() + padding - extent.half_height,
            crop.y - padding + extent.half_height,
            crop_center.y,
        ),
    )
}

/// Clamp the image center so the rotated image stays inside the viewport.
pub fn clamp_to_viewport(
    center: Point,
    extent: HalfExtent,
    viewport: &Viewport,
    padding: f64,
) -> Point {
    let axis = |value: f64, half: f64, size: f64| {
        let a = half + padding;
        let b = size - half - padding;
        value.clamp(a.min(b), a.max(b))
    };
    Point::new(
        axis(center.x, extent.half_width, viewport.width),
        axis(center.y, extent.half_height, viewport.height),
    )
}

/// Returns true if an image with these half extents, centered at `center`,
/// fully covers the crop box.
pub fn covers(center: Point, extent: HalfExtent, crop: &CropBox) -> bool {
    center.x - extent.half_width <= crop.x + COVER_EPSILON
        && center.x + extent.half_width >= crop.right() - COVER_EPSILON
        && center.y - extent.half_height <= crop.y + COVER_EPSILON
        && center.y + extent.half_height >= crop.bottom() - COVER_EPSILON
}

/// Allowed `(min, max)` scale for the current crop box and rotation.
///
/// Under the cover policy the lower bound is raised to the smallest scale
/// that still covers the crop box, so zooming out stops at an exact fit.
pub fn scale_bounds(
    config: &CropperConfig,
    image: ImageInfo,
    transform: &Transform,
    crop: &CropBox,
) -> (f64, f64) {
    match config.fit_policy {
        FitPolicy::Cover => {
            let required = cover_scale(
                image,
                transform.rotation,
                crop.width,
                crop.height,
                config.boundary_padding,
            );
            (
                required.max(config.min_scale).min(config.max_scale),
                config.max_scale,
            )
        }
        FitPolicy::Contain => (config.min_scale, config.max_scale),
    }
}

/// Restore every invariant after the transform or crop box changed.
///
/// Under the cover policy this raises the scale until the image covers the
/// crop box. If even `max_scale` is not enough, the crop box is shrunk to the
/// largest size the image can cover, holding `anchor` in place. The image
/// center is clamped last.
pub fn constrain(
    transform: Transform,
    crop: CropBox,
    image: ImageInfo,
    viewport: &Viewport,
    config: &CropperConfig,
    anchor: ShrinkAnchor,
    cache: &mut ExtentCache,
) -> (Transform, CropBox) {
    let mut transform = transform;
    let mut crop = crop;

    match config.fit_policy {
        FitPolicy::Cover => {
            let padding = config.boundary_padding;
            let required = cover_scale(
                image,
                transform.rotation,
                crop.width,
                crop.height,
                padding,
            );
            if required > config.max_scale {
                crop = shrink_to_coverage(crop, image, transform.rotation, viewport, config, anchor);
                warn!(
                    width = crop.width,
                    height = crop.height,
                    "Crop box cannot be covered at max scale, shrinking"
                );
            }

            let (min_scale, max_scale) = scale_bounds(config, image, &transform, &crop);
            transform.scale = transform.scale.max(min_scale).min(max_scale);

            let extent = cache.get(image, transform.scale, transform.rotation);
            transform.center = clamp_to_cover(transform.center, extent, &crop, padding);
        }
        FitPolicy::Contain => {
            transform.scale = transform.scale.clamp(config.min_scale, config.max_scale);
            let extent = cache.get(image, transform.scale, transform.rotation);
            transform.center =
                clamp_to_viewport(transform.center, extent, viewport, config.boundary_padding);
        }
    }

    (transform, crop)
}
