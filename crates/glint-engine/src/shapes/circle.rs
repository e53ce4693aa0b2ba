use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::buffer::{pack, Vertex};
use crate::coords::{Bounds, ColorRgba};
use crate::error::{Error, Result};

use super::{Geometry, ShapeKind};

/// Fewest ring vertices a circle may have.
pub const MIN_CIRCLE_QUALITY: usize = 200;
pub const DEFAULT_CIRCLE_QUALITY: usize = MIN_CIRCLE_QUALITY;

/// Triangle fan around (`x`, `y`): one center vertex plus `quality` ring vertices.
///
/// Ring vertex `k` sits at angle `k·2π/quality`, so the last one closes the
/// loop at angle 0. Texture coordinates span the circle's bounding square.
pub fn circle(x: f32, y: f32, radius: f32, quality: usize) -> Result<Geometry> {
    if quality < MIN_CIRCLE_QUALITY {
        return Err(Error::CircleQuality { quality, min: MIN_CIRCLE_QUALITY });
    }

    let center = Vec2::new(x, y);
    let bounds = Bounds::around(center, radius);
    let step = TAU / quality as f32;

    let mut vertices = Vec::with_capacity(quality + 1);
    vertices.push(Vertex::new(center.extend(0.0), ColorRgba::zero(), Vec2::ZERO));
    for k in 1..=quality {
        let angle = k as f32 * step;
        let p = center + Vec2::new(angle.cos(), angle.sin()) * radius;
        vertices.push(Vertex::new(p.extend(0.0), ColorRgba::zero(), bounds.normalize(p)));
    }

    let ring = quality as u32;
    let indices = (1..=ring)
        .flat_map(|k| [0, k, if k == ring { 1 } else { k + 1 }])
        .collect();

    Ok(Geometry {
        vertices: pack(&vertices),
        indices,
        origin: Vec3::new(x, y, 0.0),
        kind: ShapeKind::Circle { radius },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{as_vertices, VERTEX_STRIDE};

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn quality_below_minimum_is_rejected() {
        assert!(matches!(
            circle(0.0, 0.0, 1.0, 199),
            Err(Error::CircleQuality { quality: 199, min: 200 })
        ));
    }

    #[test]
    fn vertex_and_index_counts() {
        let g = circle(0.0, 0.0, 10.0, 200).unwrap();
        assert_eq!(g.vertices.len(), 201 * VERTEX_STRIDE);
        assert_eq!(g.indices.len(), 200 * 3);
    }

    #[test]
    fn center_vertex_is_blank() {
        let g = circle(3.0, 4.0, 10.0, 256).unwrap();
        let c = as_vertices(&g.vertices)[0];
        assert_eq!(c.position, [3.0, 4.0, 0.0]);
        assert_eq!(c.color, [0.0; 4]);
        assert_eq!(c.tex_coord, [0.0; 2]);
        assert_eq!(g.origin, Vec3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn fan_wraps_to_first_ring_vertex() {
        let g = circle(0.0, 0.0, 1.0, 200).unwrap();
        assert_eq!(&g.indices[..3], &[0, 1, 2]);
        assert_eq!(&g.indices[g.indices.len() - 3..], &[0, 200, 1]);
        assert!(g.indices.chunks(3).all(|t| t[0] == 0));
    }

    #[test]
    fn ring_lies_on_radius_with_normalized_uvs() {
        let g = circle(50.0, 50.0, 20.0, 200).unwrap();
        for v in &as_vertices(&g.vertices)[1..] {
            let d = Vec2::new(v.position[0] - 50.0, v.position[1] - 50.0).length();
            assert!(approx_eq(d, 20.0));
            assert!((0.0..=1.0).contains(&v.tex_coord[0]));
            assert!((0.0..=1.0).contains(&v.tex_coord[1]));
        }
        // Last ring vertex closes the loop at angle 0.
        let last = as_vertices(&g.vertices)[200];
        assert!(approx_eq(last.position[0], 70.0));
        assert!(approx_eq(last.position[1], 50.0));
        assert!(approx_eq(last.tex_coord[0], 1.0));
        assert!(approx_eq(last.tex_coord[1], 0.5));
    }
}
