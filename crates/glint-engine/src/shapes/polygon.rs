use glam::{Vec2, Vec3};

use crate::buffer::{pack, Vertex};
use crate::coords::{Bounds, ColorRgba};
use crate::error::{Error, Result};

use super::{Geometry, ShapeKind};

/// Fan-triangulated polygon with its origin at the centroid of `points`.
///
/// Only convex point sets in winding order triangulate correctly; anything
/// else is drawn with overlapping or missing triangles.
pub fn polygon(points: &[Vec2]) -> Result<Geometry> {
    if points.len() < 3 {
        return Err(Error::PolygonPoints(points.len()));
    }
    let Some(bounds) = Bounds::from_points(points.iter().copied()) else {
        return Err(Error::PolygonPoints(0));
    };

    let vertices: Vec<Vertex> = points
        .iter()
        .map(|&p| Vertex::new(p.extend(0.0), ColorRgba::zero(), bounds.normalize(p)))
        .collect();

    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;

    Ok(Geometry {
        vertices: pack(&vertices),
        indices: fan_indices(points.len()),
        origin: Vec3::new(centroid.x, centroid.y, 0.0),
        kind: ShapeKind::Polygon { points: points.len() },
    })
}

/// `n` triangles `(0, j, next(j))`, where `next` steps through 1..n and skips 0.
fn fan_indices(n: usize) -> Vec<u32> {
    let wrap = |k: usize| if k % n == 0 { 1 } else { k % n };

    let mut indices = Vec::with_capacity(n * 3);
    let mut j = 1;
    for _ in 0..n {
        indices.extend([0, j as u32, wrap(j + 1) as u32]);
        j = wrap(j + 1);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::as_vertices;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn too_few_points() {
        assert!(matches!(polygon(&[Vec2::ZERO, Vec2::ONE]), Err(Error::PolygonPoints(2))));
        assert!(matches!(polygon(&[]), Err(Error::PolygonPoints(0))));
    }

    #[test]
    fn origin_is_centroid() {
        let g = polygon(&[Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0), Vec2::new(0.0, 3.0)]).unwrap();
        assert_eq!(g.origin, Vec3::new(2.0, 1.0, 0.0));

        // Not the bounding-box center when points cluster.
        let g = polygon(&[
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(9.0, 1.0),
        ])
        .unwrap();
        assert_eq!(g.origin, Vec3::new(2.75, 0.5, 0.0));
    }

    #[test]
    fn one_vertex_per_point_with_box_uvs() {
        let g = polygon(&square()).unwrap();
        let v = as_vertices(&g.vertices);
        assert_eq!(v.len(), 4);
        assert_eq!(v[2].position, [10.0, 10.0, 0.0]);
        assert_eq!(v[2].tex_coord, [1.0, 1.0]);
        assert_eq!(v[3].tex_coord, [0.0, 1.0]);
        assert!(v.iter().all(|v| v.color == [0.0; 4]));
    }

    #[test]
    fn fan_skips_vertex_zero_when_wrapping() {
        assert_eq!(fan_indices(4), vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 0, 1, 2]);
        assert_eq!(fan_indices(3), vec![0, 1, 2, 0, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn n_triangles() {
        let g = polygon(&square()).unwrap();
        assert_eq!(g.indices.len(), 4 * 3);
    }
}
