use glam::Vec2;

/// Drawable area in physical pixels.
///
/// Fed to the vertex shader as the `resolution` uniform.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Converts a window-space cursor position (top-left origin, +Y down) to
    /// world space (bottom-left origin, +Y up).
    #[inline]
    pub fn cursor_to_world(self, cursor: Vec2) -> Vec2 {
        Vec2::new(cursor.x, self.height - cursor.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(800.0, f32::NAN).is_valid());
        assert!(Viewport::new(800.0, 600.0).is_valid());
    }

    #[test]
    fn cursor_y_is_flipped() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.cursor_to_world(Vec2::new(10.0, 0.0)), Vec2::new(10.0, 600.0));
        assert_eq!(vp.cursor_to_world(Vec2::new(10.0, 600.0)), Vec2::new(10.0, 0.0));
    }
}
