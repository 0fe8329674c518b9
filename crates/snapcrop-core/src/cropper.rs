//! The cropper controller.
//!
//! [`Cropper`] owns the configuration, the editor state, the gesture router
//! and the redraw throttle, and is the single entry point a host talks to.
//! Every call runs to completion synchronously; the host's event loop
//! serializes them.
//!
//! # Notifications
//!
//! State changes and collaborator outcomes are queued as [`CropperEvent`]s
//! and drained with [`Cropper::take_events`].
//!
//! # Errors
//!
//! Only collaborator-boundary failures are reported as errors. Out-of-range
//! gestures are clamped, degenerate frames skipped, and touches with no
//! image loaded are ignored.

use crate::config::{ConfigError, CropperConfig, EditMode, RoutingMode};
use crate::export::{ExportError, ExportPlan, Rasterizer};
use crate::gesture::{GestureRouter, SessionKind, Touch};
use crate::render::{RedrawThrottle, RenderPlan};
use crate::state::{Changes, EditorState};
use crate::transform::{RotateDirection, Transform};
use crate::types::{CropBox, ImageInfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors returned by [`Cropper`].
#[derive(Debug, Error, PartialEq)]
pub enum CropperError {
    /// The operation needs a loaded image.
    #[error("No image loaded")]
    NotReady,

    /// The host reported an image with no pixels.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Notification for the host UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CropperEvent {
    ImageLoaded {
        image: ImageInfo,
        transform: Transform,
        crop_box: CropBox,
    },
    ImageLoadFailed {
        reason: String,
    },
    TransformChanged {
        transform: Transform,
    },
    CropBoxChanged {
        crop_box: CropBox,
    },
    Exported {
        width: u32,
        height: u32,
    },
    ExportFailed {
        reason: String,
    },
}

/// Interactive transform-and-crop controller.
#[derive(Debug, Clone)]
pub struct Cropper {
    config: CropperConfig,
    state: EditorState,
    router: GestureRouter,
    routing: RoutingMode,
    throttle: RedrawThrottle,
    events: Vec<CropperEvent>,
}

impl Cropper {
    /// Create a cropper with no image.
    pub fn new(config: CropperConfig) -> Result<Self, CropperError> {
        config.validate()?;
        let state = EditorState::new(&config);
        Ok(Self {
            routing: config.routing,
            throttle: RedrawThrottle::new(config.redraw_interval_ms),
            router: GestureRouter::new(),
            events: Vec::new(),
            state,
            config,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn transform(&self) -> &Transform {
        self.state.transform()
    }

    pub fn crop_box(&self) -> &CropBox {
        self.state.crop_box()
    }

    pub fn image(&self) -> Option<ImageInfo> {
        self.state.image()
    }

    pub fn is_ready(&self) -> bool {
        self.state.image().is_some()
    }

    /// Kind of the active gesture session.
    pub fn gesture(&self) -> SessionKind {
        self.router.kind()
    }

    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    /// The host finished loading an image. Replaces any current image and
    /// fits the new one.
    pub fn image_loaded(&mut self, image: ImageInfo) -> Result<(), CropperError> {
        if image.is_empty() {
            let err = CropperError::InvalidImage {
                width: image.width,
                height: image.height,
            };
            self.image_load_failed(err.to_string());
            return Err(err);
        }

        self.router.cancel();
        self.state.load(image, &self.config);
        info!(
            width = image.width,
            height = image.height,
            scale = self.state.transform().scale,
            "Image loaded"
        );
        self.events.push(CropperEvent::ImageLoaded {
            image,
            transform: *self.state.transform(),
            crop_box: *self.state.crop_box(),
        });
        self.throttle.reset();
        Ok(())
    }

    /// The host failed to load an image. State is left untouched.
    pub fn image_load_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "Image load failed");
        self.events.push(CropperEvent::ImageLoadFailed { reason });
    }

    /// The host gave up waiting for an image.
    pub fn image_load_timed_out(&mut self) {
        self.image_load_failed("Image load timed out");
    }

    /// Re-fit the current image exactly as on load.
    pub fn reset(&mut self) -> Result<(), CropperError> {
        if !self.is_ready() {
            return Err(CropperError::NotReady);
        }
        self.router.cancel();
        let changes = self.state.reset(&self.config);
        self.notify(changes);
        Ok(())
    }

    pub fn rotate_clockwise(&mut self) -> Result<(), CropperError> {
        self.rotate(RotateDirection::Clockwise)
    }

    pub fn rotate_counter_clockwise(&mut self) -> Result<(), CropperError> {
        self.rotate(RotateDirection::CounterClockwise)
    }

    fn rotate(&mut self, direction: RotateDirection) -> Result<(), CropperError> {
        if !self.is_ready() {
            return Err(CropperError::NotReady);
        }
        self.router.cancel();
        let changes = self.state.rotate(direction, &self.config);
        self.notify(changes);
        Ok(())
    }

    /// Switch to explicit routing with the given mode. Takes effect at the
    /// next gesture.
    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.routing = RoutingMode::Explicit(mode);
    }

    /// Go back to the configured routing.
    pub fn clear_edit_mode(&mut self) {
        self.routing = self.config.routing;
    }

    pub fn touch_start(&mut self, touches: &[Touch]) {
        self.router
            .touch_start(touches, &self.state, &self.config, self.routing);
    }

    /// Returns true if the frame changed the state.
    pub fn touch_move(&mut self, touches: &[Touch]) -> bool {
        let changes = self.router.touch_move(touches, &mut self.state, &self.config);
        self.notify(changes);
        changes.any()
    }

    pub fn touch_end(&mut self, remaining: &[Touch]) {
        self.router.touch_end(remaining);
    }

    pub fn touch_cancel(&mut self) {
        self.router.cancel();
    }

    /// Draw instructions for the current state.
    pub fn render_plan(&self) -> RenderPlan {
        RenderPlan::build(&self.state, &self.config, self.routing)
    }

    /// Throttled [`Self::render_plan`]: `None` if the last redraw was too
    /// recent.
    pub fn request_redraw(&mut self, now_ms: f64) -> Option<RenderPlan> {
        self.throttle
            .try_acquire(now_ms)
            .then(|| self.render_plan())
    }

    /// Plan an export of the crop window. `size` defaults to the crop box
    /// at the configured device pixel ratio.
    pub fn export_plan(&self, size: Option<(u32, u32)>) -> Result<ExportPlan, CropperError> {
        let image = self.state.image().ok_or(ExportError::NoImage)?;
        let crop = self.state.crop_box();
        let (width, height) = size.unwrap_or_else(|| {
            ExportPlan::default_size(crop, self.state.viewport().device_pixel_ratio)
        });
        Ok(ExportPlan::new(
            self.state.transform(),
            crop,
            image,
            width,
            height,
        )?)
    }

    /// Plan and rasterize an export. State is never modified; the outcome is
    /// also queued as an event.
    pub fn export<R: Rasterizer>(
        &mut self,
        source: &R::Source,
        size: Option<(u32, u32)>,
        rasterizer: &mut R,
    ) -> Result<R::Output, CropperError> {
        let result = self
            .export_plan(size)
            .and_then(|plan| {
                rasterizer
                    .rasterize(&plan, source)
                    .map(|output| (plan, output))
                    .map_err(CropperError::from)
            });

        match result {
            Ok((plan, output)) => {
                info!(width = plan.dest_width, height = plan.dest_height, "Exported");
                self.events.push(CropperEvent::Exported {
                    width: plan.dest_width,
                    height: plan.dest_height,
                });
                Ok(output)
            }
            Err(err) => {
                warn!(error = %err, "Export failed");
                self.events.push(CropperEvent::ExportFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<CropperEvent> {
        std::mem::take(&mut self.events)
    }

    fn notify(&mut self, changes: Changes) {
        if changes.transform {
            self.events.push(CropperEvent::TransformChanged {
                transform: *self.state.transform(),
            });
        }
        if changes.crop_box {
            self.events.push(CropperEvent::CropBoxChanged {
                crop_box: *self.state.crop_box(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitPolicy;
    use crate::export::{InterpolationFilter, SoftwareRasterizer};
    use crate::pixels::DecodedImage;
    use crate::transform::Rotation;
    use crate::types::Point;

    fn cropper() -> Cropper {
        Cropper::new(CropperConfig::default()).unwrap()
    }

    fn loaded(width: u32, height: u32) -> Cropper {
        let mut c = cropper();
        c.image_loaded(ImageInfo::new(width, height)).unwrap();
        c.take_events();
        c
    }

    /// Fails every time.
    struct Broken;

    impl Rasterizer for Broken {
        type Source = ();
        type Output = ();

        fn rasterize(&mut self, _: &ExportPlan, _: &()) -> Result<(), ExportError> {
            Err(ExportError::Rasterize("surface lost".into()))
        }
    }

    #[test]
    fn test_new_validates_config() {
        let config = CropperConfig::with_viewport(-1.0, 10.0);
        assert!(matches!(
            Cropper::new(config),
            Err(CropperError::Config(ConfigError::InvalidViewport { .. }))
        ));
    }

    #[test]
    fn test_not_ready_without_image() {
        let mut c = cropper();
        assert!(!c.is_ready());
        assert_eq!(c.reset(), Err(CropperError::NotReady));
        assert_eq!(c.rotate_clockwise(), Err(CropperError::NotReady));
        assert_eq!(
            c.export_plan(None),
            Err(CropperError::Export(ExportError::NoImage))
        );

        // Gestures are silently ignored
        c.touch_start(&[Touch::new(1, 175.0, 175.0)]);
        assert_eq!(c.gesture(), SessionKind::Idle);
        assert!(!c.touch_move(&[Touch::new(1, 200.0, 200.0)]));
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn test_image_loaded_event() {
        let mut c = cropper();
        c.image_loaded(ImageInfo::new(1000, 500)).unwrap();
        let events = c.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            CropperEvent::ImageLoaded { image, .. } if image == ImageInfo::new(1000, 500)
        ));
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let mut c = cropper();
        assert_eq!(
            c.image_loaded(ImageInfo::new(0, 10)),
            Err(CropperError::InvalidImage {
                width: 0,
                height: 10
            })
        );
        assert!(!c.is_ready());
        assert!(matches!(
            c.take_events()[0],
            CropperEvent::ImageLoadFailed { .. }
        ));
    }

    #[test]
    fn test_load_failure_keeps_state() {
        let mut c = loaded(1000, 500);
        let before = (*c.transform(), *c.crop_box());
        c.image_load_timed_out();
        assert_eq!((*c.transform(), *c.crop_box()), before);
        assert_eq!(
            c.take_events(),
            vec![CropperEvent::ImageLoadFailed {
                reason: "Image load timed out".into()
            }]
        );
    }

    #[test]
    fn test_contain_scenario() {
        let mut config = CropperConfig::default();
        config.fit_policy = FitPolicy::Contain;
        let mut c = Cropper::new(config).unwrap();
        c.image_loaded(ImageInfo::new(1000, 500)).unwrap();

        assert!((c.transform().scale - 0.31).abs() < 1e-12);
        assert_eq!(c.transform().center, Point::new(175.0, 175.0));
    }

    #[test]
    fn test_drag_emits_change_events() {
        let mut c = loaded(1000, 500);
        c.touch_start(&[Touch::new(3, 175.0, 175.0)]);
        assert_eq!(c.gesture(), SessionKind::MoveCrop);
        assert!(c.touch_move(&[Touch::new(3, 185.0, 175.0)]));
        c.touch_end(&[]);

        let events = c.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, CropperEvent::CropBoxChanged { crop_box } if crop_box.x == 30.0)));
        assert_eq!(c.gesture(), SessionKind::Idle);
    }

    #[test]
    fn test_rotate_cancels_gesture() {
        let mut c = loaded(1000, 500);
        c.touch_start(&[Touch::new(1, 5.0, 175.0)]);
        assert_eq!(c.gesture(), SessionKind::PanImage);

        c.rotate_clockwise().unwrap();
        assert_eq!(c.gesture(), SessionKind::Idle);
        assert_eq!(c.transform().rotation, Rotation::R90);
        assert!(c
            .take_events()
            .iter()
            .any(|e| matches!(e, CropperEvent::TransformChanged { .. })));
    }

    #[test]
    fn test_reset_twice_is_identical() {
        let mut c = loaded(800, 600);
        c.rotate_counter_clockwise().unwrap();
        c.reset().unwrap();
        let first = (*c.transform(), *c.crop_box());
        c.reset().unwrap();
        assert_eq!((*c.transform(), *c.crop_box()), first);
    }

    #[test]
    fn test_edit_mode_switches_routing() {
        let mut c = loaded(1000, 500);
        c.set_edit_mode(EditMode::EditImage);
        c.touch_start(&[Touch::new(1, 175.0, 175.0)]);
        assert_eq!(c.gesture(), SessionKind::PanImage);
        c.touch_cancel();

        // The overlay is hidden in image mode
        assert_eq!(c.render_plan().overlay_start, None);

        c.set_edit_mode(EditMode::Crop);
        c.touch_start(&[Touch::new(1, 5.0, 175.0)]);
        assert_eq!(c.gesture(), SessionKind::MoveCrop);
        c.touch_cancel();

        c.clear_edit_mode();
        assert_eq!(c.routing(), RoutingMode::Auto);
    }

    #[test]
    fn test_request_redraw_is_throttled() {
        let mut c = loaded(1000, 500);
        assert!(c.request_redraw(100.0).is_some());
        assert!(c.request_redraw(104.0).is_none());
        assert!(c.request_redraw(109.0).is_some());
    }

    #[test]
    fn test_export_plan_default_size_uses_pixel_ratio() {
        let mut config = CropperConfig::default();
        config.device_pixel_ratio = 2.0;
        let mut c = Cropper::new(config).unwrap();
        c.image_loaded(ImageInfo::new(1000, 500)).unwrap();

        let plan = c.export_plan(None).unwrap();
        assert_eq!((plan.dest_width, plan.dest_height), (620, 620));
        let plan = c.export_plan(Some((100, 100))).unwrap();
        assert_eq!(plan.dest_width, 100);
    }

    #[test]
    fn test_export_rasterizes_crop_window() {
        let mut c = loaded(100, 100);
        let source = DecodedImage::filled(100, 100, [10, 20, 30]);
        let mut rasterizer = SoftwareRasterizer::new(InterpolationFilter::Bilinear);

        let out = c.export(&source, Some((32, 32)), &mut rasterizer).unwrap();
        assert_eq!((out.width, out.height), (32, 32));
        // The image covers the crop window: no background pixels
        assert!(out.pixels.chunks_exact(3).all(|px| px == [10, 20, 30]));
        assert_eq!(
            c.take_events(),
            vec![CropperEvent::Exported {
                width: 32,
                height: 32
            }]
        );
    }

    #[test]
    fn test_export_failure_leaves_state() {
        let mut c = loaded(1000, 500);
        let before = (*c.transform(), *c.crop_box());

        let err = c.export(&(), None, &mut Broken).unwrap_err();
        assert_eq!(
            err,
            CropperError::Export(ExportError::Rasterize("surface lost".into()))
        );
        assert_eq!((*c.transform(), *c.crop_box()), before);
        assert!(matches!(
            c.take_events()[0],
            CropperEvent::ExportFailed { .. }
        ));
    }

    #[test]
    fn test_export_zero_size_fails() {
        let mut c = loaded(1000, 500);
        let err = c.export(&(), Some((0, 10)), &mut Broken).unwrap_err();
        assert!(matches!(
            err,
            CropperError::Export(ExportError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_reload_replaces_image() {
        let mut c = loaded(1000, 500);
        c.touch_start(&[Touch::new(1, 5.0, 175.0)]);
        c.image_loaded(ImageInfo::new(300, 300)).unwrap();

        assert_eq!(c.image(), Some(ImageInfo::new(300, 300)));
        assert_eq!(c.gesture(), SessionKind::Idle);
        assert_eq!(c.transform().rotation, Rotation::R0);
    }
}
