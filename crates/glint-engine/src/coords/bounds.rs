use glam::{Vec2, Vec3};

/// Axis-aligned bounding box of a point set, in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square box of half-extent `radius` around `center`.
    #[inline]
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center - Vec2::splat(radius), center + Vec2::splat(radius))
    }

    /// Smallest box containing every point, or `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| Self::new(b.min.min(p), b.max.max(p))))
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Center at z = 0.
    #[inline]
    pub fn center3(self) -> Vec3 {
        self.center().extend(0.0)
    }

    /// Maps `p` linearly so that `min` becomes (0, 0) and `max` becomes (1, 1).
    ///
    /// An axis with zero extent maps to 0.
    #[inline]
    pub fn normalize(self, p: Vec2) -> Vec2 {
        let size = self.size();
        let axis = |v: f32, min: f32, extent: f32| if extent == 0.0 { 0.0 } else { (v - min) / extent };
        Vec2::new(axis(p.x, self.min.x, size.x), axis(p.y, self.min.y, size.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── from_points ───────────────────────────────────────────────────────

    #[test]
    fn from_points_empty_is_none() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn from_points_single_point_is_degenerate() {
        let b = Bounds::from_points([Vec2::new(3.0, 4.0)]).unwrap();
        assert_eq!(b.min, b.max);
        assert_eq!(b.size(), Vec2::ZERO);
    }

    #[test]
    fn from_points_spans_extremes() {
        let b = Bounds::from_points([
            Vec2::new(1.0, 5.0),
            Vec2::new(-2.0, 3.0),
            Vec2::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec2::new(-2.0, -1.0));
        assert_eq!(b.max, Vec2::new(4.0, 5.0));
        assert_eq!(b.center(), Vec2::new(1.0, 2.0));
    }

    // ── normalize ─────────────────────────────────────────────────────────

    #[test]
    fn normalize_corners() {
        let b = Bounds::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 60.0));
        assert_eq!(b.normalize(b.min), Vec2::ZERO);
        assert_eq!(b.normalize(b.max), Vec2::ONE);
        assert_eq!(b.normalize(b.center()), Vec2::splat(0.5));
    }

    #[test]
    fn normalize_flat_axis_is_zero() {
        let b = Bounds::new(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0));
        assert_eq!(b.normalize(Vec2::new(5.0, 5.0)), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn around_is_square() {
        let b = Bounds::around(Vec2::new(1.0, 1.0), 2.0);
        assert_eq!(b.min, Vec2::new(-1.0, -1.0));
        assert_eq!(b.max, Vec2::new(3.0, 3.0));
    }
}
