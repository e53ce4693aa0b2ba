use std::rc::Rc;

use crate::error::{Error, Result};
use crate::shader::Shader;

use super::backend::{BufferKind, BufferUsage, GpuBackend};
use super::data::{GpuBuffer, GpuHandles};
use super::vertex::{
    AttributeFormat, VertexLayout, COLOR_ATTRIBUTE, COLOR_OFFSET, POSITION_LOCATION, POSITION_OFFSET,
    TEX_COORD_ATTRIBUTE, TEX_COORD_OFFSET, VERTEX_STRIDE,
};

/// Builds [`GpuBuffer`]s from packed vertex/index payloads.
pub struct BufferFactory;

impl BufferFactory {
    /// Validates the payloads, allocates the vertex array and both buffers and
    /// uploads the data under `usage`.
    ///
    /// Color and texture-coordinate locations are looked up by name in the
    /// shader; names the shader does not declare are left out of the layout.
    /// On failure every resource created so far is released.
    pub fn float_buffer<B: GpuBackend>(
        gpu: &B,
        vertices: &[f32],
        indices: &[u32],
        shader: &Rc<Shader<B>>,
        usage: BufferUsage,
    ) -> Result<GpuBuffer<B>> {
        if vertices.len() % VERTEX_STRIDE != 0 {
            return Err(Error::VertexStride { len: vertices.len(), stride: VERTEX_STRIDE });
        }
        if indices.len() % 3 != 0 {
            return Err(Error::IndexTriangles(indices.len()));
        }
        if !shader.is_ready() {
            return Err(Error::ShaderNotReady);
        }

        let layout = Self::layout_for(shader);
        let vertex_array = gpu.create_vertex_array(&layout)?;
        let vertex_buffer = gpu.create_buffer(BufferKind::Vertex, bytemuck::cast_slice(vertices), usage)?;
        let index_buffer = gpu.create_buffer(BufferKind::Index, bytemuck::cast_slice(indices), usage)?;

        log::debug!(
            "created {usage:?} buffer: {} vertices, {} triangles",
            vertices.len() / VERTEX_STRIDE,
            indices.len() / 3
        );

        Ok(GpuBuffer::from_parts(
            GpuHandles { vertex_array, vertex_buffer, index_buffer },
            vertices.into(),
            indices.into(),
            VERTEX_STRIDE,
            usage,
            Rc::clone(shader),
        ))
    }

    #[inline]
    pub fn static_float<B: GpuBackend>(
        gpu: &B,
        vertices: &[f32],
        indices: &[u32],
        shader: &Rc<Shader<B>>,
    ) -> Result<GpuBuffer<B>> {
        Self::float_buffer(gpu, vertices, indices, shader, BufferUsage::Static)
    }

    #[inline]
    pub fn dynamic_float<B: GpuBackend>(
        gpu: &B,
        vertices: &[f32],
        indices: &[u32],
        shader: &Rc<Shader<B>>,
    ) -> Result<GpuBuffer<B>> {
        Self::float_buffer(gpu, vertices, indices, shader, BufferUsage::Dynamic)
    }

    #[inline]
    pub fn stream_float<B: GpuBackend>(
        gpu: &B,
        vertices: &[f32],
        indices: &[u32],
        shader: &Rc<Shader<B>>,
    ) -> Result<GpuBuffer<B>> {
        Self::float_buffer(gpu, vertices, indices, shader, BufferUsage::Stream)
    }

    /// The attribute layout for `shader`'s current program: position at
    /// location 0, color and texture coordinate wherever the shader puts them.
    pub fn layout_for<B: GpuBackend>(shader: &Shader<B>) -> VertexLayout {
        let mut layout = VertexLayout::new(VERTEX_STRIDE).with_attribute(
            POSITION_LOCATION,
            AttributeFormat::Float32x3,
            POSITION_OFFSET,
        );

        for (name, format, offset) in [
            (COLOR_ATTRIBUTE, AttributeFormat::Float32x4, COLOR_OFFSET),
            (TEX_COORD_ATTRIBUTE, AttributeFormat::Float32x2, TEX_COORD_OFFSET),
        ] {
            match shader.attribute_location(name) {
                Some(location) => layout = layout.with_attribute(location, format, offset),
                None => log::debug!("shader has no `{name}` input; attribute skipped"),
            }
        }
        layout
    }
}
