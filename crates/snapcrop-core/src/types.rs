//! Core value types shared by the geometry engine, router and renderer.
//!
//! All coordinates are logical viewport units (CSS pixels). The host is
//! responsible for converting raw touch positions (device pixel ratio,
//! surface offset) before handing them to the cropper.

use serde::{Deserialize, Serialize};

/// A point in logical viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between two points.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// The drawing surface the cropper lives in.
///
/// Immutable once the surface is sized; resizing is owned by the host, which
/// builds a new cropper for the new size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Width in logical units
    pub width: f64,
    /// Height in logical units
    pub height: f64,
    /// Physical pixels per logical unit. Only affects output resolution.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Intrinsic size of the image currently being edited.
///
/// The drawable handle itself stays with the host; the core only needs the
/// source pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One of the four crop box corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Hit-test order: first match wins.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// The diagonally opposite corner (the resize anchor).
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    /// True if dragging this corner moves the left edge.
    #[inline]
    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// True if dragging this corner moves the top edge.
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// The crop window, in logical viewport units.
///
/// # Invariants
///
/// Maintained by every operation in [`crate::transform`]:
/// - `width >= min_crop_size` and `height >= min_crop_size`
/// - `x >= 0`, `y >= 0`
/// - `x + width <= viewport.width`, `y + height <= viewport.height`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rounding of the crop window outline (drawing only)
    #[serde(default)]
    pub corner_radius: f64,
}

impl CropBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            corner_radius: 0.0,
        }
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Position of a corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.right(), self.y),
            Corner::BottomRight => Point::new(self.right(), self.bottom()),
            Corner::BottomLeft => Point::new(self.x, self.bottom()),
        }
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check the bounds invariant against a viewport and minimum size.
    ///
    /// A small epsilon absorbs floating point noise from chained clamps.
    pub fn is_within(&self, viewport: &Viewport, min_size: f64) -> bool {
        const EPS: f64 = 1e-9;
        self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= viewport.width + EPS
            && self.bottom() <= viewport.height + EPS
            && self.width >= min_size - EPS
            && self.height >= min_size - EPS
    }
}
