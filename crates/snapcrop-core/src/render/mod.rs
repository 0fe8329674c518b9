//! Render plans: ordered draw instructions for a 2D drawing context.
//!
//! The core never draws. It describes a frame as a list of [`DrawOp`]s that a
//! host replays on its canvas, either by walking the list (the ops serialize
//! to tagged JSON objects) or through a [`DrawContext`] implementation and
//! [`RenderPlan::replay`].
//!
//! # Frame layout
//!
//! 1. Clear the viewport
//! 2. Image blit: `save → translate(center) → rotate → scale → draw_image
//!    centered → restore`
//! 3. Mask: translucent fill over the viewport with the crop window cut out
//!    using the `destination-out` composite
//! 4. Crop window outline
//! 5. Rule-of-thirds grid, two lines per axis
//! 6. Four corner handles
//!
//! Steps 3 to 6 form the overlay. The cut-out in step 3 erases whatever lies
//! under the crop window on the target surface, so hosts drawing on a single
//! canvas should send the overlay to a separate layer stacked above the
//! image. [`RenderPlan::overlay_start`] marks where the overlay begins.

mod throttle;

pub use throttle::RedrawThrottle;

use crate::config::{Color, CropperConfig, EditMode, RoutingMode};
use crate::state::EditorState;
use crate::transform::Transform;
use crate::types::{Corner, CropBox, ImageInfo};
use serde::{Deserialize, Serialize};

/// Canvas compositing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    SourceOver,
    DestinationOut,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DrawOp {
    Clear {
        width: f64,
        height: f64,
    },
    Save,
    Restore,
    Translate {
        x: f64,
        y: f64,
    },
    Rotate {
        radians: f64,
    },
    Scale {
        x: f64,
        y: f64,
    },
    /// Draw the whole image into the given rectangle (current transform)
    DrawImage {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Fill a rectangle, rounded by `radius` when non-zero
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        color: Color,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        color: Color,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        line_width: f64,
    },
    SetComposite {
        mode: CompositeMode,
    },
    /// Full circle, filled then stroked
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        fill: Color,
        stroke: Color,
        line_width: f64,
    },
}

/// Drawing surface the plan is replayed on. One method per primitive.
pub trait DrawContext {
    fn clear(&mut self, width: f64, height: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, x: f64, y: f64);
    fn draw_image(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64, color: Color);
    #[allow(clippy::too_many_arguments)]
    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        color: Color,
        line_width: f64,
    );
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, line_width: f64);
    fn set_composite(&mut self, mode: CompositeMode);
    fn arc(&mut self, x: f64, y: f64, radius: f64, fill: Color, stroke: Color, line_width: f64);
}

impl DrawOp {
    /// Issue this instruction on a drawing context.
    pub fn apply<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        match *self {
            DrawOp::Clear { width, height } => ctx.clear(width, height),
            DrawOp::Save => ctx.save(),
            DrawOp::Restore => ctx.restore(),
            DrawOp::Translate { x, y } => ctx.translate(x, y),
            DrawOp::Rotate { radians } => ctx.rotate(radians),
            DrawOp::Scale { x, y } => ctx.scale(x, y),
            DrawOp::DrawImage {
                x,
                y,
                width,
                height,
            } => ctx.draw_image(x, y, width, height),
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                radius,
                color,
            } => ctx.fill_rect(x, y, width, height, radius, color),
            DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                radius,
                color,
                line_width,
            } => ctx.stroke_rect(x, y, width, height, radius, color, line_width),
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                line_width,
            } => ctx.line(x1, y1, x2, y2, color, line_width),
            DrawOp::SetComposite { mode } => ctx.set_composite(mode),
            DrawOp::Arc {
                x,
                y,
                radius,
                fill,
                stroke,
                line_width,
            } => ctx.arc(x, y, radius, fill, stroke, line_width),
        }
    }
}

/// Whether the crop overlay is shown under the given routing.
///
/// With an explicit mode toggle the overlay only appears in crop mode.
pub fn overlay_visible(routing: RoutingMode) -> bool {
    !matches!(routing, RoutingMode::Explicit(EditMode::EditImage))
}

/// Instructions for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub ops: Vec<DrawOp>,
    /// Index of the first overlay op, `None` when there is no overlay
    pub overlay_start: Option<usize>,
}

impl RenderPlan {
    /// Build the plan for the current state.
    pub fn build(state: &EditorState, config: &CropperConfig, routing: RoutingMode) -> Self {
        let viewport = state.viewport();
        let mut ops = vec![DrawOp::Clear {
            width: viewport.width,
            height: viewport.height,
        }];

        let Some(image) = state.image() else {
            ops.push(DrawOp::FillRect {
                x: 0.0,
                y: 0.0,
                width: viewport.width,
                height: viewport.height,
                radius: 0.0,
                color: config.overlay.placeholder_color,
            });
            return Self {
                ops,
                overlay_start: None,
            };
        };

        ops.extend(blit_ops(state.transform(), image));

        let overlay_start = if overlay_visible(routing) {
            let start = ops.len();
            push_overlay(&mut ops, state.crop_box(), viewport.width, viewport.height, config);
            Some(start)
        } else {
            None
        };

        Self { ops, overlay_start }
    }

    /// Issue every op on a drawing context, in order.
    pub fn replay<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        for op in &self.ops {
            op.apply(ctx);
        }
    }

    /// Ops that draw the image only.
    pub fn image_ops(&self) -> &[DrawOp] {
        let end = self.overlay_start.unwrap_or(self.ops.len());
        &self.ops[..end]
    }

    /// Ops that draw the overlay only.
    pub fn overlay_ops(&self) -> &[DrawOp] {
        match self.overlay_start {
            Some(start) => &self.ops[start..],
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// `save → translate → rotate → scale → draw centered → restore`.
///
/// Shared with the exporter so the export matches what is on screen.
pub(crate) fn blit_ops(transform: &Transform, image: ImageInfo) -> [DrawOp; 6] {
    let (w, h) = (f64::from(image.width), f64::from(image.height));
    [
        DrawOp::Save,
        DrawOp::Translate {
            x: transform.center.x,
            y: transform.center.y,
        },
        DrawOp::Rotate {
            radians: transform.rotation.radians(),
        },
        DrawOp::Scale {
            x: transform.scale,
            y: transform.scale,
        },
        DrawOp::DrawImage {
            x: -w / 2.0,
            y: -h / 2.0,
            width: w,
            height: h,
        },
        DrawOp::Restore,
    ]
}

fn push_overlay(
    ops: &mut Vec<DrawOp>,
    crop: &CropBox,
    width: f64,
    height: f64,
    config: &CropperConfig,
) {
    let style = &config.overlay;

    // Mask with the crop window cut out
    ops.extend([
        DrawOp::Save,
        DrawOp::FillRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            radius: 0.0,
            color: style.mask_color,
        },
        DrawOp::SetComposite {
            mode: CompositeMode::DestinationOut,
        },
        DrawOp::FillRect {
            x: crop.x,
            y: crop.y,
            width: crop.width,
            height: crop.height,
            radius: crop.corner_radius,
            color: Color::BLACK,
        },
        DrawOp::SetComposite {
            mode: CompositeMode::SourceOver,
        },
        DrawOp::Restore,
    ]);

    ops.push(DrawOp::StrokeRect {
        x: crop.x,
        y: crop.y,
        width: crop.width,
        height: crop.height,
        radius: crop.corner_radius,
        color: style.border_color,
        line_width: style.border_width,
    });

    for i in 1..=2 {
        let t = f64::from(i) / 3.0;
        let x = crop.x + crop.width * t;
        let y = crop.y + crop.height * t;
        ops.push(DrawOp::Line {
            x1: x,
            y1: crop.y,
            x2: x,
            y2: crop.bottom(),
            color: style.grid_color,
            line_width: style.grid_width,
        });
        ops.push(DrawOp::Line {
            x1: crop.x,
            y1: y,
            x2: crop.right(),
            y2: y,
            color: style.grid_color,
            line_width: style.grid_width,
        });
    }

    for corner in Corner::ALL {
        let p = crop.corner(corner);
        ops.push(DrawOp::Arc {
            x: p.x,
            y: p.y,
            radius: config.handle_hit_radius,
            fill: style.handle_fill,
            stroke: style.handle_stroke,
            line_width: style.handle_stroke_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitPolicy;
    use crate::transform::{RotateDirection, Rotation};
    use crate::types::ImageInfo;

    /// Records every call as the op it came from.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<DrawOp>,
        depth: i32,
    }

    impl DrawContext for Recorder {
        fn clear(&mut self, width: f64, height: f64) {
            self.ops.push(DrawOp::Clear { width, height });
        }
        fn save(&mut self) {
            self.depth += 1;
            self.ops.push(DrawOp::Save);
        }
        fn restore(&mut self) {
            self.depth -= 1;
            self.ops.push(DrawOp::Restore);
        }
        fn translate(&mut self, x: f64, y: f64) {
            self.ops.push(DrawOp::Translate { x, y });
        }
        fn rotate(&mut self, radians: f64) {
            self.ops.push(DrawOp::Rotate { radians });
        }
        fn scale(&mut self, x: f64, y: f64) {
            self.ops.push(DrawOp::Scale { x, y });
        }
        fn draw_image(&mut self, x: f64, y: f64, width: f64, height: f64) {
            self.ops.push(DrawOp::DrawImage {
                x,
                y,
                width,
                height,
            });
        }
        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64, color: Color) {
            self.ops.push(DrawOp::FillRect {
                x,
                y,
                width,
                height,
                radius,
                color,
            });
        }
        fn stroke_rect(
            &mut self,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
            radius: f64,
            color: Color,
            line_width: f64,
        ) {
            self.ops.push(DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                radius,
                color,
                line_width,
            });
        }
        fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, line_width: f64) {
            self.ops.push(DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                line_width,
            });
        }
        fn set_composite(&mut self, mode: CompositeMode) {
            self.ops.push(DrawOp::SetComposite { mode });
        }
        fn arc(&mut self, x: f64, y: f64, radius: f64, fill: Color, stroke: Color, line_width: f64) {
            self.ops.push(DrawOp::Arc {
                x,
                y,
                radius,
                fill,
                stroke,
                line_width,
            });
        }
    }

    fn loaded() -> (EditorState, CropperConfig) {
        let config = CropperConfig::default();
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(1000, 500), &config);
        (state, config)
    }

    #[test]
    fn test_placeholder_without_image() {
        let config = CropperConfig::default();
        let state = EditorState::new(&config);
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);

        assert_eq!(plan.len(), 2);
        assert!(matches!(plan.ops[0], DrawOp::Clear { .. }));
        assert!(matches!(
            plan.ops[1],
            DrawOp::FillRect { color, .. } if color == Color::rgb(245, 245, 245)
        ));
        assert!(plan.overlay_ops().is_empty());
    }

    #[test]
    fn test_plan_order() {
        let (state, config) = loaded();
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);

        // clear + 6 image + 6 mask + stroke + 4 grid + 4 handles
        assert_eq!(plan.len(), 22);
        assert_eq!(plan.overlay_start, Some(7));
        assert_eq!(plan.image_ops().len(), 7);
        assert!(matches!(plan.ops[0], DrawOp::Clear { width, height } if width == 350.0 && height == 350.0));
        assert!(matches!(plan.ops[1], DrawOp::Save));
        assert!(matches!(plan.ops[2], DrawOp::Translate { x, y } if x == 175.0 && y == 175.0));
        assert!(matches!(plan.ops[3], DrawOp::Rotate { radians } if radians == 0.0));
        assert!(matches!(plan.ops[5], DrawOp::DrawImage { x, y, .. } if x == -500.0 && y == -250.0));
        assert!(matches!(plan.ops[6], DrawOp::Restore));
        assert!(matches!(
            plan.ops[9],
            DrawOp::SetComposite {
                mode: CompositeMode::DestinationOut
            }
        ));
        assert!(matches!(plan.ops[13], DrawOp::StrokeRect { .. }));
        assert!(plan.ops[14..18].iter().all(|op| matches!(op, DrawOp::Line { .. })));
        assert!(plan.ops[18..].iter().all(|op| matches!(op, DrawOp::Arc { .. })));
    }

    #[test]
    fn test_grid_lines_at_thirds() {
        let (state, config) = loaded();
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);
        let crop = *state.crop_box();

        match plan.ops[14] {
            DrawOp::Line { x1, x2, y1, y2, .. } => {
                assert!((x1 - (crop.x + crop.width / 3.0)).abs() < 1e-9);
                assert_eq!(x1, x2);
                assert_eq!(y1, crop.y);
                assert_eq!(y2, crop.bottom());
            }
            ref other => panic!("expected a grid line, got {other:?}"),
        }
    }

    #[test]
    fn test_handles_at_corners() {
        let (state, config) = loaded();
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);
        let crop = *state.crop_box();

        for (op, corner) in plan.ops[18..].iter().zip(Corner::ALL) {
            match *op {
                DrawOp::Arc { x, y, radius, .. } => {
                    assert_eq!((x, y), (crop.corner(corner).x, crop.corner(corner).y));
                    assert_eq!(radius, config.handle_hit_radius);
                }
                ref other => panic!("expected a handle, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_explicit_image_mode_hides_overlay() {
        let (state, config) = loaded();
        let plan = RenderPlan::build(&state, &config, RoutingMode::Explicit(EditMode::EditImage));
        assert_eq!(plan.len(), 7);
        assert_eq!(plan.overlay_start, None);

        let plan = RenderPlan::build(&state, &config, RoutingMode::Explicit(EditMode::Crop));
        assert_eq!(plan.len(), 22);
    }

    #[test]
    fn test_rotation_in_blit() {
        let (mut state, config) = loaded();
        state.rotate(RotateDirection::Clockwise, &config);
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);
        assert!(matches!(
            plan.ops[3],
            DrawOp::Rotate { radians } if radians == Rotation::R90.radians()
        ));
    }

    #[test]
    fn test_rounded_crop_window() {
        let mut config = CropperConfig::default();
        config.corner_radius = 8.0;
        config.fit_policy = FitPolicy::Cover;
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(800, 800), &config);
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);

        assert!(matches!(plan.ops[10], DrawOp::FillRect { radius, .. } if radius == 8.0));
        assert!(matches!(plan.ops[13], DrawOp::StrokeRect { radius, .. } if radius == 8.0));
    }

    #[test]
    fn test_replay_issues_every_op() {
        let (state, config) = loaded();
        let plan = RenderPlan::build(&state, &config, RoutingMode::Auto);
        let mut recorder = Recorder::default();
        plan.replay(&mut recorder);

        assert_eq!(recorder.ops, plan.ops);
        assert_eq!(recorder.depth, 0);
    }
}
