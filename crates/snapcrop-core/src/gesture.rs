//! Touch gesture routing.
//!
//! A touch sequence, from first contact until the last finger lifts, is one
//! [`GestureSession`]. Its [`SessionKind`] is decided when it starts and
//! drives every move event until it ends:
//!
//! | Touches at start | Auto routing                         | Explicit routing            |
//! |------------------|--------------------------------------|-----------------------------|
//! | 1                | corner → resize, inside → move, else pan | image mode → pan, crop mode → resize or move |
//! | 2                | pinch                                | pinch                       |
//! | other            | idle                                 | idle                        |
//!
//! The only reclassification is a second finger landing during a pan, which
//! turns the session into a pinch.

use crate::config::{CropperConfig, EditMode, RoutingMode};
use crate::state::{Changes, EditorState};
use crate::transform::{hit_test_corner, Transform};
use crate::types::{Corner, CropBox, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One active touch point, in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    /// Host-assigned identifier, stable for the lifetime of the touch
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

impl Touch {
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The interaction a touch sequence was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionKind {
    Idle,
    PanImage,
    #[serde(rename_all = "camelCase")]
    PinchImage {
        start_distance: f64,
        start_centroid: Point,
        start_scale: f64,
    },
    MoveCrop,
    ResizeCrop {
        corner: Corner,
    },
}

/// Working state of one touch sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub kind: SessionKind,
    /// Touches as they were when the session (re)started
    pub anchor_touches: Vec<Touch>,
    pub start_transform: Transform,
    pub start_crop_box: CropBox,
    /// Pointer position of the last single-touch update that was applied
    pub last_applied: Option<Point>,
}

impl GestureSession {
    fn begin(kind: SessionKind, touches: &[Touch], state: &EditorState) -> Self {
        Self {
            kind,
            anchor_touches: touches.to_vec(),
            start_transform: *state.transform(),
            start_crop_box: *state.crop_box(),
            last_applied: None,
        }
    }

    /// Current positions of the anchored touches, in anchor order.
    ///
    /// Returns `None` unless the active touches are exactly the anchored ones.
    fn match_touches(&self, touches: &[Touch]) -> Option<Vec<Point>> {
        if touches.len() != self.anchor_touches.len() {
            return None;
        }
        self.anchor_touches
            .iter()
            .map(|anchor| {
                touches
                    .iter()
                    .find(|t| t.id == anchor.id)
                    .map(Touch::point)
            })
            .collect()
    }
}

fn pinch_kind(a: Point, b: Point, scale: f64) -> SessionKind {
    SessionKind::PinchImage {
        start_distance: a.distance(b),
        start_centroid: a.midpoint(b),
        start_scale: scale,
    }
}

/// Classify a new touch sequence.
///
/// With no image loaded every sequence is idle.
pub fn classify(
    touches: &[Touch],
    state: &EditorState,
    config: &CropperConfig,
    routing: RoutingMode,
) -> SessionKind {
    if state.image().is_none() {
        return SessionKind::Idle;
    }

    match touches {
        [touch] => {
            let p = touch.point();
            let crop = state.crop_box();
            let corner = hit_test_corner(crop, p, config.corner_grab_radius());
            match routing {
                RoutingMode::Auto => match corner {
                    Some(corner) => SessionKind::ResizeCrop { corner },
                    None if crop.contains(p) => SessionKind::MoveCrop,
                    None => SessionKind::PanImage,
                },
                RoutingMode::Explicit(EditMode::EditImage) => SessionKind::PanImage,
                RoutingMode::Explicit(EditMode::Crop) => match corner {
                    Some(corner) => SessionKind::ResizeCrop { corner },
                    None => SessionKind::MoveCrop,
                },
            }
        }
        [a, b] => pinch_kind(a.point(), b.point(), state.transform().scale),
        _ => SessionKind::Idle,
    }
}

/// Turns touch events into editor state updates.
#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    session: Option<GestureSession>,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the active session, `Idle` when there is none.
    pub fn kind(&self) -> SessionKind {
        self.session
            .as_ref()
            .map_or(SessionKind::Idle, |session| session.kind)
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// A finger touched down. `touches` is every active touch.
    ///
    /// The kind is fixed when the gesture begins. The one exception: a second
    /// finger landing during an image pan or pinch re-anchors the session as
    /// a pinch. Crop box gestures ignore extra fingers.
    pub fn touch_start(
        &mut self,
        touches: &[Touch],
        state: &EditorState,
        config: &CropperConfig,
        routing: RoutingMode,
    ) {
        if let Some(session) = &mut self.session {
            if let [a, b] = touches {
                if matches!(
                    session.kind,
                    SessionKind::PanImage | SessionKind::PinchImage { .. }
                ) {
                    let kind = pinch_kind(a.point(), b.point(), state.transform().scale);
                    debug!(?kind, "Gesture re-anchored as pinch");
                    *session = GestureSession::begin(kind, touches, state);
                }
            }
            return;
        }

        let kind = classify(touches, state, config, routing);
        debug!(?kind, touches = touches.len(), "Gesture started");
        self.session = Some(GestureSession::begin(kind, touches, state));
    }

    /// Touches moved. Frames whose touches do not match the session's
    /// anchors are ignored.
    pub fn touch_move(
        &mut self,
        touches: &[Touch],
        state: &mut EditorState,
        config: &CropperConfig,
    ) -> Changes {
        let Some(session) = &mut self.session else {
            return Changes::NONE;
        };
        if session.kind == SessionKind::Idle {
            return Changes::NONE;
        }
        let Some(points) = session.match_touches(touches) else {
            debug!(
                expected = session.anchor_touches.len(),
                got = touches.len(),
                "Ignoring touch frame"
            );
            return Changes::NONE;
        };

        let start_transform = session.start_transform;
        let start_crop_box = session.start_crop_box;

        match (session.kind, points.as_slice()) {
            (SessionKind::PanImage, [p]) => {
                let origin = session.anchor_touches[0].point();
                let last = session.last_applied.unwrap_or(origin);
                if (p.x - last.x).abs() < config.touch_threshold
                    && (p.y - last.y).abs() < config.touch_threshold
                {
                    return Changes::NONE;
                }
                session.last_applied = Some(*p);
                let delta = Point::new(p.x - origin.x, p.y - origin.y);
                state.pan(&start_transform, delta, config)
            }
            (
                SessionKind::PinchImage {
                    start_distance,
                    start_centroid,
                    ..
                },
                [a, b],
            ) => state.pinch(
                &start_transform,
                start_distance,
                start_centroid,
                a.distance(*b),
                a.midpoint(*b),
                config,
            ),
            (SessionKind::MoveCrop, [p]) => {
                let origin = session.anchor_touches[0].point();
                let delta = Point::new(p.x - origin.x, p.y - origin.y);
                state.move_crop_box(&start_transform, &start_crop_box, delta, config)
            }
            (SessionKind::ResizeCrop { corner }, [p]) => {
                let origin = session.anchor_touches[0].point();
                state.resize_crop_box(
                    &start_transform,
                    &start_crop_box,
                    corner,
                    origin,
                    *p,
                    config,
                )
            }
            _ => Changes::NONE,
        }
    }

    /// A finger lifted. `remaining` is every touch still down; the session
    /// ends when it is empty.
    pub fn touch_end(&mut self, remaining: &[Touch]) {
        if remaining.is_empty() && self.session.take().is_some() {
            debug!("Gesture ended");
        }
    }

    /// The host lost the touch sequence. Always returns to idle.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("Gesture cancelled");
        }
    }
}
