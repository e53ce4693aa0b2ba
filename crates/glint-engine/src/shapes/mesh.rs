//! Wavefront-style mesh files.
//!
//! Only two statements matter: `v x y z` adds a vertex and `f a b c` adds a
//! triangle. Face indices are 0-based and used verbatim; in `a/b/c` tokens
//! only the leading integer counts. `#` lines and everything else are skipped.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::buffer::{pack, Vertex};
use crate::coords::{Bounds, ColorRgba};
use crate::error::{Error, Result};

use super::{Geometry, ShapeKind};

/// Reads and parses a mesh file.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Geometry> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
    let geometry = parse_mesh(&source)?;

    if let ShapeKind::Mesh { vertices, faces } = geometry.kind {
        log::info!("loaded {} ({vertices} vertices, {faces} faces)", path.display());
    }
    Ok(geometry)
}

/// Parses mesh text into geometry centered on its bounding box.
///
/// Unlike the other shapes, whose vertices all sit at z = 0, the parsed z of
/// each vertex is kept. Bounds, texture coordinates and the origin only use
/// x and y, and the stock vertex shader ignores z.
pub fn parse_mesh(source: &str) -> Result<Geometry> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let [x, y, z] = take3(&mut tokens, line_no, parse_coord)?;
                positions.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let face = take3(&mut tokens, line_no, parse_index)?;
                indices.extend(face);
            }
            _ => {}
        }
    }

    let Some(bounds) = Bounds::from_points(positions.iter().map(|p| p.truncate())) else {
        return Err(Error::EmptyMesh);
    };

    let vertices: Vec<Vertex> = positions
        .iter()
        .map(|&p| Vertex::new(p, ColorRgba::zero(), bounds.normalize(p.truncate())))
        .collect();

    let size: Vec2 = bounds.size();
    log::debug!("mesh bounds {:?}..{:?} ({}x{})", bounds.min, bounds.max, size.x, size.y);

    Ok(Geometry {
        kind: ShapeKind::Mesh { vertices: vertices.len(), faces: indices.len() / 3 },
        vertices: pack(&vertices),
        indices,
        origin: bounds.center3(),
    })
}

fn take3<'a, T>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<[T; 3]> {
    let mut next = || {
        let token = tokens.next().ok_or_else(|| Error::ObjParse { line, message: "expected 3 values".into() })?;
        parse(token).ok_or_else(|| Error::ObjParse { line, message: format!("invalid value `{token}`") })
    };
    Ok([next()?, next()?, next()?])
}

fn parse_coord(token: &str) -> Option<f32> {
    token.parse().ok()
}

fn parse_index(token: &str) -> Option<u32> {
    token.split('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::as_vertices;

    const SQUARE: &str = "\
# 4 vertices
v 0 0 0
v 2 0 0
v 2 4 1.5
v 0 4 0
# 2 faces
f 0 1 2
f 0/0/0 2/5/1 3//2
vt 0.5 0.5
";

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parses_vertices_and_faces() {
        let g = parse_mesh(SQUARE).unwrap();
        assert_eq!(g.kind, ShapeKind::Mesh { vertices: 4, faces: 2 });
        assert_eq!(g.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(as_vertices(&g.vertices)[2].position, [2.0, 4.0, 1.5]);
    }

    #[test]
    fn depth_is_kept_but_ignored_by_bounds() {
        let flat = parse_mesh("v 0 0 0\nv 2 0 0\nv 0 4 0\nf 0 1 2\n").unwrap();
        let deep = parse_mesh("v 0 0 -3\nv 2 0 7\nv 0 4 0.5\nf 0 1 2\n").unwrap();

        let z: Vec<f32> = as_vertices(&deep.vertices).iter().map(|v| v.position[2]).collect();
        assert_eq!(z, vec![-3.0, 7.0, 0.5]);
        assert_eq!(deep.origin, flat.origin);
        assert_eq!(deep.origin.z, 0.0);
        let uvs = |g: &Geometry| as_vertices(&g.vertices).iter().map(|v| v.tex_coord).collect::<Vec<_>>();
        assert_eq!(uvs(&deep), uvs(&flat));
    }

    #[test]
    fn origin_is_bounds_center_and_uvs_normalized() {
        let g = parse_mesh(SQUARE).unwrap();
        assert_eq!(g.origin, Vec3::new(1.0, 2.0, 0.0));
        let v = as_vertices(&g.vertices);
        assert_eq!(v[0].tex_coord, [0.0, 0.0]);
        assert_eq!(v[2].tex_coord, [1.0, 1.0]);
        assert!(v.iter().all(|v| v.color == [0.0; 4]));
    }

    #[test]
    fn indices_are_not_validated() {
        let g = parse_mesh("v 0 0 0\nf 7 8 9\n").unwrap();
        assert_eq!(g.indices, vec![7, 8, 9]);
    }

    #[test]
    fn no_vertices_is_empty_mesh() {
        assert!(matches!(parse_mesh("# nothing\n"), Err(Error::EmptyMesh)));
        assert!(matches!(parse_mesh("f 0 1 2\n"), Err(Error::EmptyMesh)));
    }

    #[test]
    fn malformed_lines_report_line_number() {
        let err = parse_mesh("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert!(matches!(err, Error::ObjParse { line: 2, .. }));

        let err = parse_mesh("v 0 0 0\n\nf 0 1\n").unwrap_err();
        assert!(matches!(err, Error::ObjParse { line: 3, .. }));

        let err = parse_mesh("v 0 0 0\nf 0 -1 2\n").unwrap_err();
        assert!(matches!(err, Error::ObjParse { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(load_mesh("/nonexistent/mesh.obj"), Err(Error::Io { .. })));
    }
}
