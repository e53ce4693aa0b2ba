use glam::{Vec2, Vec3};

use crate::buffer::{pack, Vertex};
use crate::coords::ColorRgba;

use super::{Geometry, ShapeKind};

/// Two triangles over the corners bottom-left, bottom-right, top-left, top-right.
pub const RECTANGLE_INDICES: [u32; 6] = [0, 3, 1, 0, 2, 3];

/// Axis-aligned rectangle with its bottom-left corner at (`x`, `y`).
///
/// Corners are colored red, green, blue and black; the origin is the
/// bottom-left corner.
pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Geometry {
    let corners = [
        (Vec2::new(x, y), ColorRgba::red(), Vec2::new(0.0, 0.0)),
        (Vec2::new(x + width, y), ColorRgba::green(), Vec2::new(1.0, 0.0)),
        (Vec2::new(x, y + height), ColorRgba::blue(), Vec2::new(0.0, 1.0)),
        (Vec2::new(x + width, y + height), ColorRgba::black(), Vec2::new(1.0, 1.0)),
    ];
    let vertices: Vec<Vertex> = corners
        .into_iter()
        .map(|(p, color, uv)| Vertex::new(p.extend(0.0), color, uv))
        .collect();

    Geometry {
        vertices: pack(&vertices),
        indices: RECTANGLE_INDICES.to_vec(),
        origin: Vec3::new(x, y, 0.0),
        kind: ShapeKind::Rectangle { width, height },
    }
}
