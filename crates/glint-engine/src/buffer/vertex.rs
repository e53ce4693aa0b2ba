use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::coords::ColorRgba;

/// Scalars per vertex: position (3) + color (4) + texture coordinate (2).
pub const VERTEX_STRIDE: usize = 9;

/// Scalar offsets of each attribute inside one vertex.
pub const POSITION_OFFSET: usize = 0;
pub const COLOR_OFFSET: usize = 3;
pub const TEX_COORD_OFFSET: usize = 7;

/// Shader input names resolved against the compiled program.
///
/// Position is always bound at location 0.
pub const POSITION_LOCATION: u32 = 0;
pub const COLOR_ATTRIBUTE: &str = "a_rgba";
pub const TEX_COORD_ATTRIBUTE: &str = "a_tex_coord";

/// One interleaved vertex. `size_of::<Vertex>() == VERTEX_STRIDE * 4`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3, color: ColorRgba, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: [color.r, color.g, color.b, color.a],
            tex_coord: tex_coord.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Reinterprets a flat scalar payload as vertices.
///
/// The payload length must be a multiple of [`VERTEX_STRIDE`].
#[inline]
pub fn as_vertices(payload: &[f32]) -> &[Vertex] {
    bytemuck::cast_slice(payload)
}

/// Mutable counterpart of [`as_vertices`].
#[inline]
pub fn as_vertices_mut(payload: &mut [f32]) -> &mut [Vertex] {
    bytemuck::cast_slice_mut(payload)
}

/// Flattens vertices into the packed scalar payload.
#[inline]
pub fn pack(vertices: &[Vertex]) -> Vec<f32> {
    bytemuck::cast_slice(vertices).to_vec()
}

/// Vertex attribute component kind understood by the backends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl AttributeFormat {
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            AttributeFormat::Float32x2 => 2,
            AttributeFormat::Float32x3 => 3,
            AttributeFormat::Float32x4 => 4,
        }
    }
}

/// A single attribute binding inside the interleaved layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: AttributeFormat,
    /// Offset in bytes from the start of the vertex.
    pub offset: u64,
}

/// Attribute configuration captured by a vertex array.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    /// Distance between consecutive vertices in bytes.
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn new(stride_scalars: usize) -> Self {
        Self {
            stride: (stride_scalars * size_of::<f32>()) as u64,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute starting `scalar_offset` floats into the vertex.
    pub fn with_attribute(mut self, location: u32, format: AttributeFormat, scalar_offset: usize) -> Self {
        self.attributes.push(VertexAttribute {
            location,
            format,
            offset: (scalar_offset * size_of::<f32>()) as u64,
        });
        self
    }

    pub fn attribute(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }
}

/// Adds `delta` to the x/y components of every vertex in the payload.
pub(crate) fn translate_positions(payload: &mut [f32], stride: usize, delta: Vec2) {
    for vertex in payload.chunks_exact_mut(stride) {
        vertex[POSITION_OFFSET] += delta.x;
        vertex[POSITION_OFFSET + 1] += delta.y;
    }
}

/// Rewrites every vertex position with `f(position)`.
pub(crate) fn map_positions(payload: &mut [f32], stride: usize, mut f: impl FnMut(Vec3) -> Vec3) {
    for vertex in payload.chunks_exact_mut(stride) {
        let p = Vec3::new(
            vertex[POSITION_OFFSET],
            vertex[POSITION_OFFSET + 1],
            vertex[POSITION_OFFSET + 2],
        );
        let out = f(p);
        vertex[POSITION_OFFSET] = out.x;
        vertex[POSITION_OFFSET + 1] = out.y;
        vertex[POSITION_OFFSET + 2] = out.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_nine_packed_floats() {
        assert_eq!(size_of::<Vertex>(), VERTEX_STRIDE * size_of::<f32>());
    }

    #[test]
    fn pack_keeps_attribute_offsets() {
        let v = Vertex::new(
            Vec3::new(1.0, 2.0, 3.0),
            ColorRgba::new(0.1, 0.2, 0.3, 0.4),
            Vec2::new(0.5, 0.6),
        );
        let flat = pack(&[v]);
        assert_eq!(flat.len(), VERTEX_STRIDE);
        assert_eq!(flat[POSITION_OFFSET], 1.0);
        assert_eq!(flat[COLOR_OFFSET], 0.1);
        assert_eq!(flat[COLOR_OFFSET + 3], 0.4);
        assert_eq!(flat[TEX_COORD_OFFSET], 0.5);
        assert_eq!(flat[TEX_COORD_OFFSET + 1], 0.6);
    }

    #[test]
    fn translate_only_touches_xy() {
        let mut flat = pack(&[Vertex::default(), Vertex::default()]);
        translate_positions(&mut flat, VERTEX_STRIDE, Vec2::new(2.0, -1.0));
        for v in as_vertices(&flat) {
            assert_eq!(v.position, [2.0, -1.0, 0.0]);
            assert_eq!(v.color, [0.0; 4]);
            assert_eq!(v.tex_coord, [0.0; 2]);
        }
    }

    #[test]
    fn layout_converts_scalar_offsets_to_bytes() {
        let layout = VertexLayout::new(VERTEX_STRIDE)
            .with_attribute(0, AttributeFormat::Float32x3, POSITION_OFFSET)
            .with_attribute(2, AttributeFormat::Float32x2, TEX_COORD_OFFSET);
        assert_eq!(layout.stride, 36);
        assert_eq!(layout.attribute(2).map(|a| a.offset), Some(28));
        assert!(layout.attribute(1).is_none());
    }
}
