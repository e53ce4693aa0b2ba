//! GPU buffer lifecycle: the packed vertex format, the backend seam and the
//! buffer resource with its CPU mirror.

mod backend;
mod data;
mod factory;
mod vertex;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::{BufferKind, BufferUsage, GpuBackend};
pub use data::{GpuBuffer, GpuHandles};
pub use factory::BufferFactory;
pub use vertex::{
    as_vertices, as_vertices_mut, pack, AttributeFormat, Vertex, VertexAttribute, VertexLayout, COLOR_ATTRIBUTE,
    COLOR_OFFSET, POSITION_LOCATION, POSITION_OFFSET, TEX_COORD_ATTRIBUTE, TEX_COORD_OFFSET, VERTEX_STRIDE,
};

pub(crate) use vertex::{map_positions, translate_positions};
