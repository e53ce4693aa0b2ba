use std::fmt;

use crate::error::Result;

use super::vertex::VertexLayout;

/// How often buffer contents are expected to change.
///
/// A placement hint only; it never affects correctness.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Rewritten often, drawn many times.
    Dynamic,
    /// Rewritten every time it is drawn.
    Stream,
}

/// Which GPU binding target a buffer is allocated for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Resource-creation interface the buffer core is written against.
///
/// Handles are owned values; dropping one releases the GPU resource behind it.
/// Everything runs on the thread that owns the device.
pub trait GpuBackend {
    /// Captured attribute configuration (a vertex array object).
    type VertexArray: fmt::Debug;
    type Buffer: fmt::Debug;
    type Program: fmt::Debug;
    type Texture: fmt::Debug;

    fn create_vertex_array(&self, layout: &VertexLayout) -> Result<Self::VertexArray>;

    /// Allocates a buffer sized to `contents` and uploads it.
    fn create_buffer(&self, kind: BufferKind, contents: &[u8], usage: BufferUsage) -> Result<Self::Buffer>;

    /// Overwrites `data.len()` bytes of `buffer` starting at `offset`. Never reallocates.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, data: &[u8]) -> Result<()>;

    /// Builds a program from WGSL vertex and fragment sources.
    fn compile_program(&self, vertex_src: &str, fragment_src: &str) -> Result<Self::Program>;

    /// Uploads tightly packed RGBA8 pixels.
    fn create_texture(&self, width: u32, height: u32, rgba: &[u8]) -> Result<Self::Texture>;
}
