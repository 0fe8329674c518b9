//! Snapcrop Core - Transform-and-crop engine
//!
//! This crate provides the geometry behind a touch image cropper: fitting an
//! image into a viewport, routing touch gestures to pan, pinch, crop move and
//! crop resize, keeping the crop window covered, producing draw plans for a
//! canvas host, and exporting the cropped region.
//!
//! The host owns the canvas and the event loop and drives a [`Cropper`]:
//!
//! - report image loads with [`Cropper::image_loaded`]
//! - forward touches to [`Cropper::touch_start`] / [`Cropper::touch_move`] /
//!   [`Cropper::touch_end`]
//! - replay [`Cropper::request_redraw`] plans onto its drawing context
//! - rasterize [`Cropper::export_plan`] at the desired output size

pub mod config;
pub mod cropper;
pub mod encode;
pub mod export;
pub mod gesture;
pub mod pixels;
pub mod render;
pub mod state;
pub mod transform;
pub mod types;

pub use config::{
    Color, ConfigError, CropperConfig, EditMode, FitPolicy, OverlayStyle, ResizePolicy,
    RoutingMode,
};
pub use cropper::{Cropper, CropperError, CropperEvent};
pub use encode::{encode, encode_jpeg, encode_png, EncodeError, OutputFormat};
pub use export::{
    Affine, ExportError, ExportPlan, InterpolationFilter, Rasterizer, SoftwareRasterizer,
};
pub use gesture::{GestureRouter, SessionKind, Touch};
pub use pixels::DecodedImage;
pub use render::{CompositeMode, DrawContext, DrawOp, RedrawThrottle, RenderPlan};
pub use state::{Changes, EditorState};
pub use transform::{RotateDirection, Rotation, Transform};
pub use types::{Corner, CropBox, ImageInfo, Point, Viewport};
