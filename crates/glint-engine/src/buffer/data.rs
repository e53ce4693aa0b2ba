use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::shader::Shader;
use crate::texture::Texture;

use super::backend::{BufferUsage, GpuBackend};
use super::vertex::{as_vertices, Vertex};

/// The three GPU objects backing one drawable buffer.
pub struct GpuHandles<B: GpuBackend> {
    pub vertex_array: B::VertexArray,
    pub vertex_buffer: B::Buffer,
    pub index_buffer: B::Buffer,
}

/// GPU vertex/index buffers plus a CPU mirror of their contents.
///
/// The mirror lets shapes rewrite geometry without reading back from the GPU;
/// [`update`](Self::update) pushes it up again. Payload lengths are fixed at
/// construction, so the GPU allocation always matches the mirror.
///
/// Ownership:
/// - GPU handles, texture and payloads are released together, once, when the
///   buffer is dropped or passed to [`release`](Self::release).
/// - The shader is shared; the buffer only drops its reference.
pub struct GpuBuffer<B: GpuBackend> {
    handles: Option<GpuHandles<B>>,
    texture: Option<Texture<B>>,
    shader: Option<Rc<Shader<B>>>,

    vertices: Box<[f32]>,
    indices: Box<[u32]>,
    stride: usize,
    usage: BufferUsage,
}

impl<B: GpuBackend> GpuBuffer<B> {
    /// A buffer with no GPU allocation and empty payloads.
    pub fn empty() -> Self {
        Self {
            handles: None,
            texture: None,
            shader: None,
            vertices: Box::default(),
            indices: Box::default(),
            stride: 0,
            usage: BufferUsage::Static,
        }
    }

    pub(crate) fn from_parts(
        handles: GpuHandles<B>,
        vertices: Box<[f32]>,
        indices: Box<[u32]>,
        stride: usize,
        usage: BufferUsage,
        shader: Rc<Shader<B>>,
    ) -> Self {
        Self {
            handles: Some(handles),
            texture: None,
            shader: Some(shader),
            vertices,
            indices,
            stride,
            usage,
        }
    }

    /// Re-uploads the full vertex and index mirrors at offset 0.
    pub fn update(&self, gpu: &B) -> Result<()> {
        let handles = self.handles.as_ref().ok_or(Error::Unallocated)?;
        gpu.write_buffer(&handles.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices))?;
        gpu.write_buffer(&handles.index_buffer, 0, bytemuck::cast_slice(&self.indices))?;
        Ok(())
    }

    /// Frees GPU handles, texture and payloads now.
    pub fn release(self) {
        if self.handles.is_some() {
            log::debug!(
                "releasing buffer ({} vertices, {} indices, texture: {})",
                self.vertex_count(),
                self.indices.len(),
                self.texture.is_some()
            );
        }
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.handles.is_some()
    }

    #[inline]
    pub fn handles(&self) -> Option<&GpuHandles<B>> {
        self.handles.as_ref()
    }

    /// Number of indices to draw.
    #[inline]
    pub fn element_count(&self) -> u32 {
        (self.index_bytes() / size_of::<u32>()) as u32
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 { 0 } else { self.vertices.len() / self.stride }
    }

    /// Scalars per vertex.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    #[inline]
    pub fn vertex_bytes(&self) -> usize {
        self.vertices.len() * size_of::<f32>()
    }

    #[inline]
    pub fn index_bytes(&self) -> usize {
        self.indices.len() * size_of::<u32>()
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Mutable view of the vertex mirror. Length is fixed.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [f32] {
        &mut self.vertices
    }

    /// The vertex mirror viewed as packed [`Vertex`] records.
    #[inline]
    pub fn packed_vertices(&self) -> &[Vertex] {
        as_vertices(&self.vertices)
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn shader(&self) -> Option<&Rc<Shader<B>>> {
        self.shader.as_ref()
    }

    #[inline]
    pub fn texture(&self) -> Option<&Texture<B>> {
        self.texture.as_ref()
    }

    /// Replaces the owned texture, returning the previous one.
    pub fn set_texture(&mut self, texture: Option<Texture<B>>) -> Option<Texture<B>> {
        std::mem::replace(&mut self.texture, texture)
    }
}

impl<B: GpuBackend> Default for GpuBuffer<B> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<B: GpuBackend> fmt::Debug for GpuBuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuBuffer")
            .field("allocated", &self.is_allocated())
            .field("vertices", &self.vertex_count())
            .field("elements", &self.element_count())
            .field("stride", &self.stride)
            .field("usage", &self.usage)
            .field("textured", &self.texture.is_some())
            .finish()
    }
}
