//! Software rasterizer with bilinear and Lanczos3 interpolation.
//!
//! # Algorithm
//!
//! Inverse mapping: for each destination pixel center the plan's matrix is
//! inverted to find the source point it shows, which is then sampled.
//! Source pixel `(i, j)` covers `[i, i+1) × [j, j+1)`, so its center is at
//! `(i + 0.5, j + 0.5)`. Destination pixels outside the image get the
//! background colour.

use super::{ExportError, ExportPlan, Rasterizer};
use crate::pixels::DecodedImage;
use crate::types::Point;
use tracing::debug;

/// Interpolation filter for export sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation.
    Lanczos3,
}

/// Slack for destination pixels whose center falls exactly on the image edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Renders export plans from RGB pixel buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftwareRasterizer {
    pub filter: InterpolationFilter,
    /// Fill for destination pixels not covered by the image
    pub background: [u8; 3],
}

impl Default for SoftwareRasterizer {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::Lanczos3,
            background: [255, 255, 255],
        }
    }
}

impl SoftwareRasterizer {
    pub fn new(filter: InterpolationFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

impl Rasterizer for SoftwareRasterizer {
    type Source = DecodedImage;
    type Output = DecodedImage;

    fn rasterize(
        &mut self,
        plan: &ExportPlan,
        source: &DecodedImage,
    ) -> Result<DecodedImage, ExportError> {
        if source.width != plan.image.width || source.height != plan.image.height {
            return Err(ExportError::SourceMismatch {
                expected_width: plan.image.width,
                expected_height: plan.image.height,
                actual_width: source.width,
                actual_height: source.height,
            });
        }
        if source.is_empty() || !source.is_consistent() {
            return Err(ExportError::Rasterize(format!(
                "pixel buffer holds {} bytes for a {}x{} image",
                source.pixels.len(),
                source.width,
                source.height
            )));
        }

        let inverse = plan
            .image_to_dest()
            .and_then(|m| m.inverse())
            .ok_or_else(|| ExportError::Rasterize("export transform is not invertible".into()))?;

        let (dst_w, dst_h) = (plan.dest_width, plan.dest_height);
        let (src_w, src_h) = (f64::from(source.width), f64::from(source.height));
        let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);

        for dst_y in 0..dst_h {
            for dst_x in 0..dst_w {
                let center = Point::new(f64::from(dst_x) + 0.5, f64::from(dst_y) + 0.5);
                let src = inverse.apply(center);

                let pixel = if src.x < -EDGE_EPSILON
                    || src.y < -EDGE_EPSILON
                    || src.x > src_w + EDGE_EPSILON
                    || src.y > src_h + EDGE_EPSILON
                {
                    self.background
                } else {
                    // Shift to pixel-center coordinates
                    let (x, y) = (src.x - 0.5, src.y - 0.5);
                    match self.filter {
                        InterpolationFilter::Bilinear => sample_bilinear(source, x, y),
                        InterpolationFilter::Lanczos3 => sample_lanczos3(source, x, y),
                    }
                };
                output.extend_from_slice(&pixel);
            }
        }

        debug!(width = dst_w, height = dst_h, filter = ?self.filter, "Rasterized export");
        Ok(DecodedImage::new(dst_w, dst_h, output))
    }
}

/// Get a pixel as [f64; 3], clamping coordinates to the image.
#[inline]
fn get_pixel_f64(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let x = px.clamp(0, i64::from(image.width) - 1) as u32;
    let y = py.clamp(0, i64::from(image.height) - 1) as u32;
    image.pixel(x, y).map(f64::from)
}

/// Bilinear interpolation over the 4 nearest pixel centers.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Lanczos3 interpolation over a 6x6 neighborhood, edges clamped.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let py = y0 + ky;
        let wy = lanczos_weight(y - py as f64, 3.0);
        if wy == 0.0 {
            continue;
        }
        for kx in -2..=3 {
            let px = x0 + kx;
            let weight = lanczos_weight(x - px as f64, 3.0) * wy;
            if weight == 0.0 {
                continue;
            }
            let pixel = get_pixel_f64(image, px, py);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum.abs() > f64::EPSILON {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }
    result
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
