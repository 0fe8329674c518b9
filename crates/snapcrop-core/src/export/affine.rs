//! 2D affine matrices in canvas convention.
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```
//!
//! `translate`, `rotate` and `scale` post-multiply, exactly like the canvas
//! methods of the same name: the most recently added step is applied to
//! points first.

use crate::types::Point;
use std::f64::consts::FRAC_PI_2;

/// Tolerance for snapping quarter-turn angles to exact values.
const QUARTER_TURN_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// `self · other`: apply `other`, then `self`.
    pub fn then(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translate(&self, x: f64, y: f64) -> Affine {
        self.then(&Affine {
            e: x,
            f: y,
            ..Self::IDENTITY
        })
    }

    pub fn scale(&self, x: f64, y: f64) -> Affine {
        self.then(&Affine {
            a: x,
            d: y,
            ..Self::IDENTITY
        })
    }

    /// Rotate by `radians`, clockwise on a y-down surface.
    ///
    /// Multiples of 90° produce exact 0/±1 coefficients.
    pub fn rotate(&self, radians: f64) -> Affine {
        let (cos, sin) = quarter_turn(radians).unwrap_or((radians.cos(), radians.sin()));
        self.then(&Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            ..Self::IDENTITY
        })
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse matrix, or `None` if this one is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

fn quarter_turn(radians: f64) -> Option<(f64, f64)> {
    let turns = radians / FRAC_PI_2;
    let rounded = turns.round();
    if (turns - rounded).abs() > QUARTER_TURN_EPSILON {
        return None;
    }
    Some(match (rounded as i64).rem_euclid(4) {
        0 => (1.0, 0.0),
        1 => (0.0, 1.0),
        2 => (-1.0, 0.0),
        _ => (0.0, -1.0),
    })
}
