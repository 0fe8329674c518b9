//! Image motion: pan, pinch-zoom and quarter-turn rotation.
//!
//! These functions only move the transform. Clamping back into a valid
//! position is done afterwards by [`super::constrain`].

use super::Transform;
use crate::types::Point;

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Translate the image by the total pointer motion since the pan started.
pub fn pan(start: &Transform, delta: Point) -> Transform {
    Transform {
        center: Point::new(start.center.x + delta.x, start.center.y + delta.y),
        ..*start
    }
}

/// Zoom about the two-finger centroid.
///
/// The new scale is `start.scale * distance / start_distance`, clamped to
/// `bounds`. The image point under the starting centroid stays under the
/// current centroid, so the fingers appear to hold the image.
///
/// Returns `None` when the starting distance is zero or not finite (both
/// fingers landed on the same spot).
pub fn pinch(
    start: &Transform,
    start_distance: f64,
    start_centroid: Point,
    distance: f64,
    centroid: Point,
    bounds: (f64, f64),
) -> Option<Transform> {
    if !(start_distance.is_finite() && start_distance > 0.0 && distance.is_finite()) {
        return None;
    }

    let (lo, hi) = bounds;
    let scale = (start.scale * distance / start_distance).max(lo).min(hi);
    let ratio = scale / start.scale;

    Some(Transform {
        center: Point::new(
            centroid.x - (start_centroid.x - start.center.x) * ratio,
            centroid.y - (start_centroid.y - start.center.y) * ratio,
        ),
        scale,
        rotation: start.rotation,
    })
}

/// Turn the image a quarter turn about its own center.
pub fn rotate(transform: &Transform, direction: RotateDirection) -> Transform {
    let rotation = match direction {
        RotateDirection::Clockwise => transform.rotation.clockwise(),
        RotateDirection::CounterClockwise => transform.rotation.counter_clockwise(),
    };
    Transform {
        rotation,
        ..*transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Rotation;

    #[test]
    fn test_pan_uses_total_delta() {
        let start = Transform::new(Point::new(100.0, 100.0), 0.5, Rotation::R90);
        let moved = pan(&start, Point::new(15.0, -5.0));
        assert_eq!(moved.center, Point::new(115.0, 95.0));
        assert_eq!(moved.scale, 0.5);
        assert_eq!(moved.rotation, Rotation::R90);
    }

    #[test]
    fn test_pinch_doubles_scale() {
        let start = Transform::new(Point::new(175.0, 175.0), 1.0, Rotation::R0);
        let c = Point::new(175.0, 175.0);
        let zoomed = pinch(&start, 100.0, c, 200.0, c, (0.01, 5.0)).unwrap();
        assert_eq!(zoomed.scale, 2.0);
        assert_eq!(zoomed.center, Point::new(175.0, 175.0));
    }

    #[test]
    fn test_pinch_keeps_point_under_centroid() {
        let start = Transform::new(Point::new(100.0, 100.0), 1.0, Rotation::R0);
        let c0 = Point::new(150.0, 120.0);
        let zoomed = pinch(&start, 100.0, c0, 200.0, c0, (0.01, 5.0)).unwrap();
        // Offset from centroid to center doubles
        assert_eq!(zoomed.center, Point::new(50.0, 80.0));
    }

    #[test]
    fn test_pinch_follows_centroid_motion() {
        let start = Transform::new(Point::new(100.0, 100.0), 1.0, Rotation::R0);
        let zoomed = pinch(
            &start,
            100.0,
            Point::new(100.0, 100.0),
            100.0,
            Point::new(130.0, 90.0),
            (0.01, 5.0),
        )
        .unwrap();
        assert_eq!(zoomed.scale, 1.0);
        assert_eq!(zoomed.center, Point::new(130.0, 90.0));
    }

    #[test]
    fn test_pinch_clamps_scale() {
        let start = Transform::new(Point::new(0.0, 0.0), 2.0, Rotation::R0);
        let c = Point::new(0.0, 0.0);
        let zoomed = pinch(&start, 10.0, c, 1000.0, c, (0.01, 5.0)).unwrap();
        assert_eq!(zoomed.scale, 5.0);
        let shrunk = pinch(&start, 1000.0, c, 1.0, c, (0.5, 5.0)).unwrap();
        assert_eq!(shrunk.scale, 0.5);
    }

    #[test]
    fn test_pinch_zero_start_distance_is_ignored() {
        let start = Transform::default();
        let c = Point::new(0.0, 0.0);
        assert!(pinch(&start, 0.0, c, 50.0, c, (0.01, 5.0)).is_none());
        assert!(pinch(&start, f64::NAN, c, 50.0, c, (0.01, 5.0)).is_none());
    }

    #[test]
    fn test_rotate_keeps_center_and_scale() {
        let start = Transform::new(Point::new(120.0, 80.0), 0.7, Rotation::R270);
        let turned = rotate(&start, RotateDirection::Clockwise);
        assert_eq!(turned.rotation, Rotation::R0);
        assert_eq!(turned.center, start.center);
        assert_eq!(rotate(&turned, RotateDirection::CounterClockwise), start);
    }
}
