//! Drawable shapes: pure geometry generators plus [`Shape`], which owns the
//! uploaded buffer and transforms it in place.

mod circle;
mod entity;
mod mesh;
mod polygon;
mod rectangle;

use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};

use crate::buffer::{map_positions, translate_positions, BufferFactory, GpuBackend, GpuBuffer, POSITION_OFFSET};
use crate::error::Result;
use crate::shader::Shader;
use crate::texture::Texture;

pub use circle::{circle, DEFAULT_CIRCLE_QUALITY, MIN_CIRCLE_QUALITY};
pub use entity::Entity;
pub use mesh::{load_mesh, parse_mesh};
pub use polygon::polygon;
pub use rectangle::{rectangle, RECTANGLE_INDICES};

/// Which generator produced a shape, with the data its center depends on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
    Polygon { points: usize },
    Mesh { vertices: usize, faces: usize },
}

/// CPU-side output of a generator, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Packed vertices, [`VERTEX_STRIDE`](crate::buffer::VERTEX_STRIDE) scalars each.
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub origin: Vec3,
    pub kind: ShapeKind,
}

/// One buffer plus the pivot used by [`rotate`](Self::rotate) and [`scale`](Self::scale).
///
/// Transforms only touch the CPU mirror; call [`update`](Self::update) to
/// push them to the GPU.
#[derive(Debug)]
pub struct Shape<B: GpuBackend> {
    kind: ShapeKind,
    origin: Vec3,
    buffer: GpuBuffer<B>,
}

impl<B: GpuBackend> Shape<B> {
    /// Uploads `geometry` as a dynamic buffer and attaches `texture`.
    pub fn from_geometry(
        gpu: &B,
        geometry: Geometry,
        shader: &Rc<Shader<B>>,
        texture: Option<Texture<B>>,
    ) -> Result<Self> {
        let mut buffer = BufferFactory::dynamic_float(gpu, &geometry.vertices, &geometry.indices, shader)?;
        buffer.set_texture(texture);
        Ok(Self { kind: geometry.kind, origin: geometry.origin, buffer })
    }

    pub fn rectangle(
        gpu: &B,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        shader: &Rc<Shader<B>>,
        texture: Option<Texture<B>>,
    ) -> Result<Self> {
        Self::from_geometry(gpu, rectangle(x, y, width, height), shader, texture)
    }

    pub fn circle(
        gpu: &B,
        x: f32,
        y: f32,
        radius: f32,
        shader: &Rc<Shader<B>>,
        texture: Option<Texture<B>>,
        quality: usize,
    ) -> Result<Self> {
        Self::from_geometry(gpu, circle(x, y, radius, quality)?, shader, texture)
    }

    pub fn polygon(
        gpu: &B,
        points: &[Vec2],
        shader: &Rc<Shader<B>>,
        texture: Option<Texture<B>>,
    ) -> Result<Self> {
        Self::from_geometry(gpu, polygon(points)?, shader, texture)
    }

    pub fn mesh_from_file(
        gpu: &B,
        path: impl AsRef<Path>,
        shader: &Rc<Shader<B>>,
        texture: Option<Texture<B>>,
    ) -> Result<Self> {
        Self::from_geometry(gpu, load_mesh(path)?, shader, texture)
    }

    // ── transforms ────────────────────────────────────────────────────────

    /// Moves every vertex and the origin by `delta` in x/y.
    pub fn translate(&mut self, delta: Vec2) {
        let stride = self.buffer.stride();
        translate_positions(self.buffer.vertices_mut(), stride, delta);
        self.origin += delta.extend(0.0);
    }

    /// Rotates about the origin around +Z. Successive calls accumulate.
    pub fn rotate(&mut self, radians: f32) {
        self.transform_about_origin(Mat4::from_rotation_z(radians));
    }

    /// Scales x/y about the origin; z is untouched.
    pub fn scale(&mut self, factor: Vec2) {
        self.transform_about_origin(Mat4::from_scale(factor.extend(1.0)));
    }

    /// Applies `T(origin) · m · T(-origin)` to every vertex position.
    fn transform_about_origin(&mut self, m: Mat4) {
        let pivot = Mat4::from_translation(self.origin) * m * Mat4::from_translation(-self.origin);
        let stride = self.buffer.stride();
        map_positions(self.buffer.vertices_mut(), stride, |p| pivot.transform_point3(p));
    }

    /// Pushes the current vertices to the GPU.
    #[inline]
    pub fn update(&self, gpu: &B) -> Result<()> {
        self.buffer.update(gpu)
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Visual center.
    ///
    /// Rectangles derive it from their first vertex and size, so it follows
    /// translation but not rotation or scale. Every other kind reports its origin.
    pub fn center(&self) -> Vec3 {
        match self.kind {
            ShapeKind::Rectangle { width, height } => {
                let Some(first) = self.buffer.vertices().get(POSITION_OFFSET..POSITION_OFFSET + 3) else {
                    return self.origin;
                };
                Vec3::new(first[0] + width / 2.0, first[1] + height / 2.0, first[2])
            }
            _ => self.origin,
        }
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn buffer(&self) -> &GpuBuffer<B> {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut GpuBuffer<B> {
        &mut self.buffer
    }

    /// Gives up the buffer, e.g. to hand it to an [`Entity`].
    #[inline]
    pub fn into_buffer(self) -> GpuBuffer<B> {
        self.buffer
    }
}
