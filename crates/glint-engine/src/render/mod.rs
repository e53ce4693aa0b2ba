//! GPU rendering subsystem.
//!
//! Convention:
//! - Vertex positions are world pixels (bottom-left origin, +Y up).
//! - The vertex shader maps them to NDC with the `resolution` uniform, then
//!   applies the camera `transform`.

mod camera;
mod ctx;
mod shape_renderer;

pub use camera::{Camera2d, MIN_ZOOM};
pub use ctx::{RenderCtx, RenderTarget};
pub use shape_renderer::{DrawItem, DrawParams, ShapeRenderer, ShapeUniform};
