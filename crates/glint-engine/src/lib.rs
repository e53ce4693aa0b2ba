//! Glint engine crate.
//!
//! GPU buffer lifecycle and shape transforms, plus the platform + GPU runtime
//! the studio runs on.
//!
//! - `buffer`: packed vertex format, the `GpuBackend` seam and `GpuBuffer`
//! - `shapes`: rectangle/circle/polygon/mesh generators and the transform engine
//! - `shader` / `texture`: program and image collaborators of a buffer
//! - `device` / `render` / `window`: the wgpu + winit side

pub mod buffer;
pub mod coords;
pub mod error;
pub mod shader;
pub mod shapes;
pub mod texture;

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

pub use error::{Error, Result};
