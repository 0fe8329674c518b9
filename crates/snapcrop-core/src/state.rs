//! Editor state: the image transform and crop box for the loaded image.
//!
//! [`EditorState`] is the only mutable geometry in the crate. It is owned by
//! [`crate::Cropper`] and mutated only through the methods below, each of
//! which composes the pure functions of [`crate::transform`] and re-applies
//! every constraint before returning.
//!
//! Gesture updates take the transform and crop box captured when the gesture
//! began, so each frame is computed from the session start rather than
//! accumulated frame to frame.

use crate::config::CropperConfig;
use crate::transform::{
    constrain, covers, default_crop_box, fit_on_load, move_crop_box, pan, pinch,
    resize_crop_box, rotate, scale_bounds, ExtentCache, HalfExtent, RotateDirection,
    ShrinkAnchor, Transform,
};
use crate::types::{Corner, CropBox, ImageInfo, Point, Viewport};

/// What an update changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub transform: bool,
    pub crop_box: bool,
}

impl Changes {
    pub const NONE: Changes = Changes {
        transform: false,
        crop_box: false,
    };

    pub fn any(&self) -> bool {
        self.transform || self.crop_box
    }
}

/// Transform and crop box of the image being edited.
#[derive(Debug, Clone)]
pub struct EditorState {
    viewport: Viewport,
    image: Option<ImageInfo>,
    transform: Transform,
    crop_box: CropBox,
    extents: ExtentCache,
    /// Transform a run of consecutive quarter turns started from. Any other
    /// update ends the run.
    turn_origin: Option<Transform>,
}

impl EditorState {
    /// Empty state: no image, default crop box.
    pub fn new(config: &CropperConfig) -> Self {
        let viewport = config.viewport();
        Self {
            viewport,
            image: None,
            transform: Transform::new(viewport.center(), 1.0, Default::default()),
            crop_box: default_crop_box(&viewport, config),
            extents: ExtentCache::new(),
            turn_origin: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn image(&self) -> Option<ImageInfo> {
        self.image
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn crop_box(&self) -> &CropBox {
        &self.crop_box
    }

    /// Rotated half extents of the image at the current transform.
    pub fn image_extent(&mut self) -> Option<HalfExtent> {
        let image = self.image?;
        Some(
            self.extents
                .get(image, self.transform.scale, self.transform.rotation),
        )
    }

    /// Rotated-bounds memo, for inspection.
    pub fn extent_cache(&self) -> &ExtentCache {
        &self.extents
    }

    /// Replace the image and fit it. Any previous transform is discarded.
    pub fn load(&mut self, image: ImageInfo, config: &CropperConfig) {
        let (transform, crop_box) = fit_on_load(image, &self.viewport, config, &mut self.extents);
        self.image = Some(image);
        self.transform = transform;
        self.crop_box = crop_box;
        self.turn_origin = None;
    }

    /// Re-fit the current image exactly as on load.
    pub fn reset(&mut self, config: &CropperConfig) -> Changes {
        let Some(image) = self.image else {
            return Changes::NONE;
        };
        let fitted = fit_on_load(image, &self.viewport, config, &mut self.extents);
        self.apply(fitted)
    }

    /// Pan by the total pointer motion since the gesture began.
    pub fn pan(&mut self, start: &Transform, delta: Point, config: &CropperConfig) -> Changes {
        let Some(image) = self.image else {
            return Changes::NONE;
        };
        let moved = pan(start, delta);
        let constrained = constrain(
            moved,
            self.crop_box,
            image,
            &self.viewport,
            config,
            ShrinkAnchor::Center,
            &mut self.extents,
        );
        self.apply(constrained)
    }

    /// Pinch-zoom relative to the gesture start. Frames with a degenerate
    /// start distance change nothing.
    pub fn pinch(
        &mut self,
        start: &Transform,
        start_distance: f64,
        start_centroid: Point,
        distance: f64,
        centroid: Point,
        config: &CropperConfig,
    ) -> Changes {
        let Some(image) = self.image else {
            return Changes::NONE;
        };
        let bounds = scale_bounds(config, image, start, &self.crop_box);
        let Some(zoomed) = pinch(start, start_distance, start_centroid, distance, centroid, bounds)
        else {
            return Changes::NONE;
        };
        let constrained = constrain(
            zoomed,
            self.crop_box,
            image,
            &self.viewport,
            config,
            ShrinkAnchor::Center,
            &mut self.extents,
        );
        self.apply(constrained)
    }

    /// Quarter turn about the image center.
    ///
    /// Consecutive turns are constrained from the scale and center in effect
    /// before the first of them, so a zoom forced by one orientation is
    /// dropped again once the image turns back. Four turns in the same
    /// direction restore the transform unless a turn had to shrink the crop
    /// box.
    pub fn rotate(&mut self, direction: RotateDirection, config: &CropperConfig) -> Changes {
        let Some(image) = self.image else {
            return Changes::NONE;
        };
        let origin = self.turn_origin.unwrap_or(self.transform);
        let turned = rotate(
            &Transform {
                rotation: self.transform.rotation,
                ..origin
            },
            direction,
        );
        let constrained = constrain(
            turned,
            self.crop_box,
            image,
            &self.viewport,
            config,
            ShrinkAnchor::Center,
            &mut self.extents,
        );
        let changes = self.apply(constrained);
        if !changes.crop_box {
            self.turn_origin = Some(origin);
        }
        changes
    }

    /// Drag the crop box by the total pointer motion since the gesture began.
    pub fn move_crop_box(
        &mut self,
        start_transform: &Transform,
        start_crop_box: &CropBox,
        delta: Point,
        config: &CropperConfig,
    ) -> Changes {
        let Some(image) = self.image else {
            return Changes::NONE;
        };
        let moved = move_crop_box(start_crop_box, delta, &self.viewport);
        let constrained = constrain(
            *start_transform,
            moved,
            image,
            &self.viewport,
            config,
            ShrinkAnchor::Center,
            &mut self.extents,
        );
        self.apply(constrained)
    }

    /// Drag a corner handle to `pointer`.
    pub fn resize_crop_box(
        &mut self,
        start_transform: &Transform,
        start_crop_box: &CropBox,
        corner: Corner,
        start_pointer: Point,
        pointer: Point,
        config: &CropperConfig,
    ) -> Changes {
        let Some(image) = self.image else {
            return Changes::NONE;
        };
        let resized = resize_crop_box(
            start_crop_box,
            corner,
            start_pointer,
            pointer,
            &self.viewport,
            config,
        );
        let constrained = constrain(
            *start_transform,
            resized,
            image,
            &self.viewport,
            config,
            ShrinkAnchor::Corner(corner.opposite()),
            &mut self.extents,
        );
        self.apply(constrained)
    }

    /// True if the rotated image bounds contain the crop box.
    pub fn covers_crop_box(&mut self) -> bool {
        match self.image_extent() {
            Some(extent) => covers(self.transform.center, extent, &self.crop_box),
            None => false,
        }
    }

    /// True if the crop box is inside the viewport and large enough.
    pub fn crop_box_in_bounds(&self, config: &CropperConfig) -> bool {
        self.crop_box.is_within(&self.viewport, config.min_crop_size)
    }

    fn apply(&mut self, (transform, crop_box): (Transform, CropBox)) -> Changes {
        let changes = Changes {
            transform: transform != self.transform,
            crop_box: crop_box != self.crop_box,
        };
        self.transform = transform;
        self.crop_box = crop_box;
        self.turn_origin = None;
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FitPolicy, ResizePolicy};
    use crate::transform::Rotation;

    fn loaded(width: u32, height: u32) -> (EditorState, CropperConfig) {
        let config = CropperConfig::default();
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(width, height), &config);
        (state, config)
    }

    #[test]
    fn test_new_has_no_image() {
        let config = CropperConfig::default();
        let mut state = EditorState::new(&config);
        assert!(state.image().is_none());
        assert!(state.image_extent().is_none());
        assert!(!state.covers_crop_box());
        assert!(state.crop_box_in_bounds(&config));
    }

    #[test]
    fn test_operations_without_image_are_noops() {
        let config = CropperConfig::default();
        let mut state = EditorState::new(&config);
        let start = *state.transform();
        let crop = *state.crop_box();

        assert_eq!(state.reset(&config), Changes::NONE);
        assert_eq!(state.pan(&start, Point::new(10.0, 10.0), &config), Changes::NONE);
        assert_eq!(
            state.rotate(RotateDirection::Clockwise, &config),
            Changes::NONE
        );
        assert_eq!(
            state.move_crop_box(&start, &crop, Point::new(5.0, 5.0), &config),
            Changes::NONE
        );
        assert_eq!(*state.transform(), start);
    }

    #[test]
    fn test_pan_clamps_to_cover() {
        let (mut state, config) = loaded(1000, 500);
        let start = *state.transform();

        // 620 wide image over a 310 wide crop box: 155 units of slack per side
        let changes = state.pan(&start, Point::new(100.0, 0.0), &config);
        assert!(changes.transform);
        assert!(!changes.crop_box);
        assert_eq!(state.transform().center.x, 275.0);

        state.pan(&start, Point::new(500.0, 40.0), &config);
        assert!((state.transform().center.x - 330.0).abs() < 1e-9);
        // No vertical slack at the cover scale
        assert_eq!(state.transform().center.y, 175.0);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_pan_is_relative_to_session_start() {
        let (mut state, config) = loaded(1000, 500);
        let start = *state.transform();

        state.pan(&start, Point::new(60.0, 0.0), &config);
        state.pan(&start, Point::new(20.0, 0.0), &config);
        assert_eq!(state.transform().center.x, start.center.x + 20.0);
    }

    #[test]
    fn test_pinch_scenario_doubles_scale() {
        let mut config = CropperConfig::default();
        config.fit_policy = FitPolicy::Contain;
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(350, 350), &config);

        let start = Transform::new(Point::new(175.0, 175.0), 1.0, Rotation::R0);
        let c = Point::new(175.0, 175.0);
        state.pinch(&start, 100.0, c, 200.0, c, &config);
        assert_eq!(state.transform().scale, 2.0);
    }

    #[test]
    fn test_pinch_cannot_zoom_out_past_cover() {
        let (mut state, config) = loaded(1000, 500);
        let start = *state.transform();
        let c = state.crop_box().center();

        state.pinch(&start, 200.0, c, 10.0, c, &config);
        assert!((state.transform().scale - 0.62).abs() < 1e-12);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_pinch_zero_distance_changes_nothing() {
        let (mut state, config) = loaded(1000, 500);
        let start = *state.transform();
        let c = Point::new(100.0, 100.0);
        assert_eq!(state.pinch(&start, 0.0, c, 50.0, c, &config), Changes::NONE);
    }

    #[test]
    fn test_rotate_raises_scale_to_cover() {
        let mut config = CropperConfig::default();
        config.resize_policy = ResizePolicy::FreeAspect;
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(1000, 500), &config);

        let crop = *state.crop_box();
        let start = *state.transform();
        // Widen the crop box to the full viewport width
        state.resize_crop_box(
            &start,
            &crop,
            Corner::BottomRight,
            crop.corner(Corner::BottomRight),
            Point::new(350.0, crop.bottom()),
            &config,
        );
        let before = state.transform().scale;

        state.rotate(RotateDirection::Clockwise, &config);
        assert_eq!(state.transform().rotation, Rotation::R90);
        // 500 wide after the turn: 330 / 500
        assert!(state.transform().scale >= before);
        assert!((state.transform().scale - 0.66).abs() < 1e-12);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_turning_back_drops_forced_zoom() {
        let mut config = CropperConfig::default();
        config.resize_policy = ResizePolicy::FreeAspect;
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(1000, 500), &config);

        let crop = *state.crop_box();
        let start = *state.transform();
        state.resize_crop_box(
            &start,
            &crop,
            Corner::BottomRight,
            crop.corner(Corner::BottomRight),
            Point::new(350.0, crop.bottom()),
            &config,
        );
        let before = *state.transform();
        let extent_before = state.image_extent();
        assert!((before.scale - 0.62).abs() < 1e-12);

        state.rotate(RotateDirection::Clockwise, &config);
        assert!((state.transform().scale - 0.66).abs() < 1e-12);
        state.rotate(RotateDirection::Clockwise, &config);
        assert!((state.transform().scale - 0.62).abs() < 1e-12);
        state.rotate(RotateDirection::Clockwise, &config);
        state.rotate(RotateDirection::Clockwise, &config);

        assert_eq!(*state.transform(), before);
        assert_eq!(state.image_extent(), extent_before);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_pan_after_turn_starts_new_turn_run() {
        let mut config = CropperConfig::default();
        config.resize_policy = ResizePolicy::FreeAspect;
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(1000, 500), &config);

        state.rotate(RotateDirection::Clockwise, &config);
        let turned = *state.transform();
        state.pan(&turned, Point::new(0.0, 30.0), &config);
        let panned = *state.transform();
        assert_ne!(panned, turned);

        // The next turn starts from the panned transform, not the loaded one
        state.rotate(RotateDirection::CounterClockwise, &config);
        state.rotate(RotateDirection::Clockwise, &config);
        assert_eq!(*state.transform(), panned);
    }

    #[test]
    fn test_move_crop_box_scenario() {
        let (mut state, config) = loaded(1000, 500);
        let start = *state.transform();
        let crop = *state.crop_box();

        let changes = state.move_crop_box(&start, &crop, Point::new(350.0, 0.0), &config);
        assert!(changes.crop_box);
        assert_eq!(state.crop_box().x, 350.0 - crop.width);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_resize_outside_viewport_clamps_to_edge() {
        let config = CropperConfig::default();
        let mut state = EditorState::new(&config);
        state.load(ImageInfo::new(2000, 2000), &config);
        let start = *state.transform();
        let crop = *state.crop_box();

        state.resize_crop_box(
            &start,
            &crop,
            Corner::BottomRight,
            crop.corner(Corner::BottomRight),
            Point::new(900.0, 800.0),
            &config,
        );
        assert_eq!(state.crop_box().right(), 350.0);
        assert_eq!(state.crop_box().bottom(), 350.0);
        assert_eq!(state.crop_box().x, crop.x);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_resize_uncoverable_shrinks_from_anchor() {
        let config = CropperConfig::default();
        let mut state = EditorState::new(&config);
        // At most 200 units wide at max_scale 5
        state.load(ImageInfo::new(40, 40), &config);
        let start = *state.transform();
        let crop = *state.crop_box();
        assert_eq!(crop.width, 200.0);

        state.resize_crop_box(
            &start,
            &crop,
            Corner::TopLeft,
            crop.corner(Corner::TopLeft),
            Point::new(0.0, 0.0),
            &config,
        );
        let resized = *state.crop_box();
        assert_eq!(resized.width, 200.0);
        assert_eq!(resized.right(), crop.right());
        assert_eq!(resized.bottom(), crop.bottom());
        assert_eq!(state.transform().scale, 5.0);
        assert!(state.covers_crop_box());
    }

    #[test]
    fn test_reset_restores_fit() {
        let (mut state, config) = loaded(1000, 500);
        let fitted = (*state.transform(), *state.crop_box());
        let start = *state.transform();
        state.pan(&start, Point::new(40.0, 0.0), &config);
        state.rotate(RotateDirection::CounterClockwise, &config);

        let changes = state.reset(&config);
        assert!(changes.transform);
        assert_eq!((*state.transform(), *state.crop_box()), fitted);
        assert_eq!(state.reset(&config), Changes::NONE);
    }

    #[test]
    fn test_load_replaces_image() {
        let (mut state, config) = loaded(1000, 500);
        let start = *state.transform();
        state.pan(&start, Point::new(40.0, 0.0), &config);

        state.load(ImageInfo::new(500, 1000), &config);
        assert_eq!(state.image(), Some(ImageInfo::new(500, 1000)));
        assert_eq!(state.transform().rotation, Rotation::R0);
        assert_eq!(state.transform().center, state.crop_box().center());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
