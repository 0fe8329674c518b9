//! Fit-on-load policies.
//!
//! - **Cover** (default): a default crop box is placed in the viewport and the
//!   image is scaled so it covers that box on both axes.
//! - **Contain**: the image is scaled to fit the viewport minus a margin, and
//!   the crop box is derived from the image's on-screen bounds.

use super::clamp::constrain;
use super::crop::{crop_box_from_bounds, ShrinkAnchor};
use super::rotation::{rotated_dimensions, ExtentCache, Rotation};
use super::Transform;
use crate::config::{CropperConfig, FitPolicy};
use crate::types::{CropBox, ImageInfo, Viewport};

/// Smallest scale at which the rotated image covers a `width × height` box
/// with `padding` to spare on every side.
///
/// With zero padding and no rotation this is
/// `max(width / image.width, height / image.height)`.
pub fn cover_scale(
    image: ImageInfo,
    rotation: Rotation,
    width: f64,
    height: f64,
    padding: f64,
) -> f64 {
    let (rw, rh) = rotated_dimensions(image, rotation);
    ((width + 2.0 * padding) / rw).max((height + 2.0 * padding) / rh)
}

/// Scale at which the image fits the viewport minus `padding`, never
/// enlarging it beyond 1:1.
///
/// `padding` is the total margin per axis, so a 350-unit viewport with a
/// padding of 40 leaves 310 units for the image.
pub fn contain_scale(image: ImageInfo, viewport: &Viewport, padding: f64) -> f64 {
    let available_w = viewport.width - padding;
    let available_h = viewport.height - padding;
    let scale_x = available_w / f64::from(image.width);
    let scale_y = available_h / f64::from(image.height);
    scale_x.min(scale_y).min(1.0)
}

/// The load-time crop box of the cover policy: a centered square inset by
/// `initial_padding` (total), within `[min_crop_size, shorter side]`.
pub fn default_crop_box(viewport: &Viewport, config: &CropperConfig) -> CropBox {
    let min_side = viewport.min_side();
    let side = (min_side - config.initial_padding)
        .max(config.min_crop_size)
        .min(min_side);

    CropBox::new(
        (viewport.width - side) / 2.0,
        (viewport.height - side) / 2.0,
        side,
        side,
    )
    .with_corner_radius(config.corner_radius)
}

/// Compute the initial transform and crop box for a freshly loaded image.
///
/// Rotation always starts at 0°. Calling this twice with the same inputs
/// gives identical results, which is what reset relies on.
pub fn fit_on_load(
    image: ImageInfo,
    viewport: &Viewport,
    config: &CropperConfig,
    cache: &mut ExtentCache,
) -> (Transform, CropBox) {
    match config.fit_policy {
        FitPolicy::Cover => {
            let crop = default_crop_box(viewport, config);
            let scale = cover_scale(
                image,
                Rotation::R0,
                crop.width,
                crop.height,
                config.boundary_padding,
            )
            .clamp(config.min_scale, config.max_scale);
            let transform = Transform::new(crop.center(), scale, Rotation::R0);
            constrain(
                transform,
                crop,
                image,
                viewport,
                config,
                ShrinkAnchor::Center,
                cache,
            )
        }
        FitPolicy::Contain => {
            let scale = contain_scale(image, viewport, config.initial_padding)
                .clamp(config.min_scale, config.max_scale);
            let transform = Transform::new(viewport.center(), scale, Rotation::R0);
            let extent = cache.get(image, scale, Rotation::R0);
            let crop = crop_box_from_bounds(
                transform.center,
                extent,
                viewport,
                config.min_crop_size,
            )
            .with_corner_radius(config.corner_radius);
            constrain(
                transform,
                crop,
                image,
                viewport,
                config,
                ShrinkAnchor::Center,
                cache,
            )
        }
    }
}
