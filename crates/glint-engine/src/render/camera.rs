use glam::{Mat4, Vec2, Vec3};

/// Smallest zoom half-extent; below it the view would flip.
pub const MIN_ZOOM: f32 = 0.05;

/// Pan/zoom view applied on top of the pixel→NDC mapping in the vertex shader.
///
/// `zoom` is the half-extent of the orthographic box (1.0 shows the whole
/// window); `pan` is an NDC offset applied before projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Camera2d {
    pub const fn new() -> Self {
        Self { pan: Vec2::ZERO, zoom: 1.0 }
    }

    /// The `transform` uniform: `ortho(-zoom, zoom, -zoom, zoom, -1, 1) · T(pan)`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(-self.zoom, self.zoom, -self.zoom, self.zoom, -1.0, 1.0)
            * Mat4::from_translation(Vec3::new(self.pan.x, self.pan.y, 0.0))
    }

    #[inline]
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Pans by a cursor drag from `prev` to `cursor` (window pixels, +Y down),
    /// scaled by the current zoom so the scene tracks the pointer.
    pub fn drag(&mut self, prev: Vec2, cursor: Vec2, window: Vec2) {
        if window.x <= 0.0 || window.y <= 0.0 {
            return;
        }
        self.pan.x -= (prev.x - cursor.x) / window.x * self.zoom;
        self.pan.y += (prev.y - cursor.y) / window.y * self.zoom;
    }

    /// Wheel zoom: scrolling up zooms in by `step`, down zooms out.
    pub fn scroll(&mut self, wheel_y: f32, step: f32) {
        if wheel_y > 0.0 {
            self.zoom = (self.zoom - step).max(MIN_ZOOM);
        } else if wheel_y < 0.0 {
            self.zoom += step;
        }
    }
}

impl Default for Camera2d {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_at_rest() {
        let m = Camera2d::new().matrix();
        let p = m.transform_point3(Vec3::new(0.5, -0.25, 0.0));
        assert!(approx_eq(p.x, 0.5) && approx_eq(p.y, -0.25));
        assert!(approx_eq(p.z, 0.5));
    }

    #[test]
    fn zoom_and_pan() {
        let cam = Camera2d { pan: Vec2::new(0.1, 0.0), zoom: 2.0 };
        let p = cam.matrix().transform_point3(Vec3::new(0.9, 1.0, 0.0));
        assert!(approx_eq(p.x, 0.5));
        assert!(approx_eq(p.y, 0.5));
    }

    #[test]
    fn drag_follows_cursor() {
        let mut cam = Camera2d::new();
        cam.drag(Vec2::new(100.0, 100.0), Vec2::new(180.0, 50.0), Vec2::new(800.0, 500.0));
        assert!(approx_eq(cam.pan.x, 0.1));
        assert!(approx_eq(cam.pan.y, 0.1));
    }

    #[test]
    fn scroll_is_clamped() {
        let mut cam = Camera2d::new();
        cam.scroll(1.0, 0.05);
        assert!(approx_eq(cam.zoom, 0.95));
        cam.scroll(-3.0, 0.05);
        assert!(approx_eq(cam.zoom, 1.0));
        cam.scroll(0.0, 0.05);
        assert!(approx_eq(cam.zoom, 1.0));
        for _ in 0..100 {
            cam.scroll(1.0, 0.05);
        }
        assert_eq!(cam.zoom, MIN_ZOOM);
    }
}
