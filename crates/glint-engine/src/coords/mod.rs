//! Coordinate and color types shared by the shape generators and renderers.
//!
//! World space:
//! - Pixels, origin bottom-left
//! - +X right, +Y up
//!
//! The vertex shader maps world space to NDC using the `transform` and
//! `resolution` uniforms.

mod bounds;
mod color;
mod viewport;

pub use bounds::Bounds;
pub use color::ColorRgba;
pub use viewport::Viewport;
