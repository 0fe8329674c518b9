//! Quarter-turn rotation and rotated image bounds.
//!
//! The cropper only rotates in 90° steps, so every trigonometric value is
//! exactly 0 or ±1. [`Rotation::abs_cos_sin`] returns those values directly
//! instead of going through `f64::cos`, which keeps four consecutive turns
//! bit-exact.
//!
//! # Bounding box
//!
//! For an image of `w × h` source pixels drawn at `scale`, rotated by θ, the
//! axis-aligned half extents are:
//!
//! ```text
//! half_width  = (w·s/2)·|cos θ| + (h·s/2)·|sin θ|
//! half_height = (w·s/2)·|sin θ| + (h·s/2)·|cos θ|
//! ```

use crate::types::ImageInfo;
use serde::{Deserialize, Serialize};

/// Image rotation in quarter turns, positive = clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotation angle in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Rotation angle in radians, for drawing contexts.
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// Build a rotation from any multiple of 90 degrees, taken mod 360.
    ///
    /// Returns `None` for angles that are not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    /// Rotate a further 90° clockwise.
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    /// Rotate a further 90° counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R270,
            Rotation::R90 => Rotation::R0,
            Rotation::R180 => Rotation::R90,
            Rotation::R270 => Rotation::R180,
        }
    }

    /// Exact `(cos θ, sin θ)`.
    pub fn cos_sin(self) -> (f64, f64) {
        match self {
            Rotation::R0 => (1.0, 0.0),
            Rotation::R90 => (0.0, 1.0),
            Rotation::R180 => (-1.0, 0.0),
            Rotation::R270 => (0.0, -1.0),
        }
    }

    /// Exact `(|cos θ|, |sin θ|)`.
    pub fn abs_cos_sin(self) -> (f64, f64) {
        let (cos, sin) = self.cos_sin();
        (cos.abs(), sin.abs())
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(i64::from(degrees))
            .ok_or_else(|| format!("rotation must be a multiple of 90 degrees, got {degrees}"))
    }
}

/// Image dimensions in source pixels after rotation.
pub fn rotated_dimensions(image: ImageInfo, rotation: Rotation) -> (f64, f64) {
    let (w, h) = (f64::from(image.width), f64::from(image.height));
    if rotation.swaps_dimensions() {
        (h, w)
    } else {
        (w, h)
    }
}

/// Half size of the axis-aligned box around the rotated, scaled image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HalfExtent {
    pub half_width: f64,
    pub half_height: f64,
}

/// Compute the rotated half extents of an image drawn at `scale`.
pub fn rotated_half_extent(image: ImageInfo, scale: f64, rotation: Rotation) -> HalfExtent {
    let (cos, sin) = rotation.abs_cos_sin();
    let half_w = f64::from(image.width) * scale / 2.0;
    let half_h = f64::from(image.height) * scale / 2.0;

    HalfExtent {
        half_width: half_w * cos + half_h * sin,
        half_height: half_w * sin + half_h * cos,
    }
}

/// Key of the rotated-bounds memo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentKey {
    pub rotation: Rotation,
    pub scale: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl ExtentKey {
    pub fn new(image: ImageInfo, scale: f64, rotation: Rotation) -> Self {
        Self {
            rotation,
            scale,
            image_width: image.width,
            image_height: image.height,
        }
    }
}

/// Single-entry memo for [`rotated_half_extent`].
///
/// The entry is replaced whenever the requested key differs from the stored
/// one, so callers never invalidate it by hand. It is never a source of truth:
/// every lookup returns exactly what a fresh computation would.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtentCache {
    entry: Option<(ExtentKey, HalfExtent)>,
    computations: u64,
}

impl ExtentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotated half extents for the given key, computing them on a miss.
    pub fn get(&mut self, image: ImageInfo, scale: f64, rotation: Rotation) -> HalfExtent {
        let key = ExtentKey::new(image, scale, rotation);
        if let Some((cached_key, extent)) = self.entry {
            if cached_key == key {
                return extent;
            }
        }

        let extent = rotated_half_extent(image, scale, rotation);
        self.entry = Some((key, extent));
        self.computations += 1;
        extent
    }

    /// Key of the currently memoized entry, if any.
    pub fn key(&self) -> Option<ExtentKey> {
        self.entry.map(|(key, _)| key)
    }

    /// Number of cache misses so far.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
