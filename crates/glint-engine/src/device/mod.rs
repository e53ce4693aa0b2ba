//! GPU device + surface management.
//!
//! - `Gpu` creates the wgpu instance/adapter/device/queue, configures the
//!   window surface and hands out frames.
//! - `WgpuBackend` is the [`GpuBackend`](crate::buffer::GpuBackend) the
//!   buffer core allocates through.

mod backend;
mod gpu;

pub use backend::{WgpuBackend, WgpuBuffer, WgpuProgram, WgpuTexture, WgpuVertexArray};
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
