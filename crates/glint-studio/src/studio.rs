use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use glam::Vec2;

use glint_engine::coords::ColorRgba;
use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::device::{Gpu, WgpuBackend};
use glint_engine::input::{ButtonState, InputState, Key, MouseButton, ScrollDelta};
use glint_engine::render::{Camera2d, DrawItem, DrawParams, ShapeRenderer};
use glint_engine::shader::Shader;
use glint_engine::shapes::Shape;
use glint_engine::texture::Texture;
use glint_engine::time::FpsSample;

const PAN_STEP: f32 = 0.01;
const ZOOM_STEP: f32 = 0.05;
const CIRCLE_QUALITY: usize = 2000;
const CLEAR: ColorRgba = ColorRgba::new(0.08, 0.08, 0.1, 1.0);

/// Where shaders and textures/meshes are read from.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    pub shaders: PathBuf,
    pub assets: PathBuf,
}

struct Actor {
    name: &'static str,
    shape: Shape<WgpuBackend>,
    /// Fill for untextured shapes.
    color: ColorRgba,
}

/// The demo scene: animated shapes under a pan/zoom camera.
pub struct Studio {
    dirs: AssetDirs,
    shaders: Vec<Rc<Shader<WgpuBackend>>>,
    actors: Vec<Actor>,
    renderer: ShapeRenderer,

    camera: Camera2d,
    window: Vec2,
    last_cursor: Option<Vec2>,
    live_reload: bool,
}

impl Studio {
    pub fn new(dirs: AssetDirs) -> Self {
        Self {
            dirs,
            shaders: Vec::new(),
            actors: Vec::new(),
            renderer: ShapeRenderer::new(),
            camera: Camera2d::new(),
            window: Vec2::ZERO,
            last_cursor: None,
            live_reload: false,
        }
    }

    fn load_shader(&mut self, backend: &WgpuBackend, fragment: &str) -> anyhow::Result<Rc<Shader<WgpuBackend>>> {
        let vs = self.dirs.shaders.join("shader.vert.wgsl");
        let fs = self.dirs.shaders.join(fragment);
        let shader = Shader::load(backend, &vs, &fs).with_context(|| format!("failed to load {}", fs.display()))?;

        let shader = Rc::new(shader);
        self.shaders.push(Rc::clone(&shader));
        Ok(shader)
    }

    /// Loads `name` from the asset directory, falling back to a checkerboard.
    fn texture(&self, backend: &WgpuBackend, name: Option<&str>) -> Option<Texture<WgpuBackend>> {
        if let Some(name) = name {
            match Texture::from_path(backend, self.dirs.assets.join(name)) {
                Ok(texture) => return Some(texture),
                Err(e) => log::warn!("{:#}; using a checkerboard", anyhow::Error::from(e)),
            }
        }

        Texture::checkerboard(backend, 8, 32)
            .inspect_err(|e| log::warn!("checkerboard texture: {e}"))
            .ok()
    }

    /// Pivots the shape about its center and adds it to the scene. Failed
    /// shapes are logged and left out.
    fn add(&mut self, name: &'static str, shape: glint_engine::Result<Shape<WgpuBackend>>, color: ColorRgba) {
        match shape {
            Ok(mut shape) => {
                shape.set_origin(shape.center());
                self.actors.push(Actor { name, shape, color });
            }
            Err(e) => log::warn!("skipping {name}: {:#}", anyhow::Error::from(e)),
        }
    }

    fn key_pressed(&mut self, key: Key, repeat: bool) -> AppControl {
        match key {
            Key::ArrowLeft => self.camera.pan_by(Vec2::new(-PAN_STEP, 0.0)),
            Key::ArrowRight => self.camera.pan_by(Vec2::new(PAN_STEP, 0.0)),
            Key::ArrowUp => self.camera.pan_by(Vec2::new(0.0, PAN_STEP)),
            Key::ArrowDown => self.camera.pan_by(Vec2::new(0.0, -PAN_STEP)),

            Key::Q | Key::Escape => return AppControl::Exit,

            Key::R if !repeat => {
                self.live_reload = !self.live_reload;
                log::info!("live shader reload {}", if self.live_reload { "on" } else { "off" });
                return AppControl::Continue;
            }

            _ => return AppControl::Continue,
        }

        log::info!("pan [{:.2}, {:.2}]", self.camera.pan.x, self.camera.pan.y);
        AppControl::Continue
    }
}

impl App for Studio {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let backend = gpu.backend();
        let size = gpu.size();
        let (w, h) = (size.width as f32, size.height as f32);
        self.window = Vec2::new(w, h);

        let plain = self.load_shader(backend, "shader.frag.wgsl")?;
        let pulse = self.load_shader(backend, "shader2.frag.wgsl")?;

        let texture = self.texture(backend, None);
        let shape = Shape::rectangle(backend, w / 2.0 + 100.0, h / 3.0, 400.0, 350.0, &pulse, texture);
        self.add("checker rectangle", shape, ColorRgba::white());

        let texture = self.texture(backend, Some("texture.png"));
        let shape = Shape::rectangle(backend, w / 2.0 - 450.0, h / 3.0, 400.0, 350.0, &plain, texture);
        self.add("image rectangle", shape, ColorRgba::white());

        let texture = self.texture(backend, None);
        let shape = Shape::circle(backend, w / 2.0, h / 2.0 + 300.0, 100.0, &pulse, texture, CIRCLE_QUALITY);
        self.add("circle", shape, ColorRgba::white());

        let pentagon = regular_polygon(Vec2::new(w * 0.15, h * 0.75), 110.0, 5);
        self.add("pentagon", Shape::polygon(backend, &pentagon, &plain, None), ColorRgba::red());

        let gem = Shape::mesh_from_file(backend, self.dirs.assets.join("gem.obj"), &plain, None).map(|mut gem| {
            gem.scale(Vec2::splat(90.0));
            gem.translate(Vec2::new(w * 0.85, h * 0.75));
            gem
        });
        self.add("gem", gem, ColorRgba::green());

        log::info!("loaded {} shapes", self.actors.len());
        for actor in &self.actors {
            log::debug!("{}: {:?} at {}", actor.name, actor.shape.kind(), actor.shape.origin());
        }
        Ok(())
    }

    fn on_key(&mut self, key: Key, state: ButtonState, repeat: bool) -> AppControl {
        if state.is_pressed() { self.key_pressed(key, repeat) } else { AppControl::Continue }
    }

    fn on_cursor_moved(&mut self, cursor: Vec2, input: &InputState) -> AppControl {
        if input.button_down(MouseButton::Left) {
            if let Some(prev) = self.last_cursor {
                self.camera.drag(prev, cursor, self.window);
            }
        }
        self.last_cursor = Some(cursor);
        AppControl::Continue
    }

    fn on_scroll(&mut self, delta: ScrollDelta) -> AppControl {
        self.camera.scroll(delta.y(), ZOOM_STEP);
        AppControl::Continue
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.window = Vec2::new(width as f32, height as f32);
    }

    fn on_fixed_update(&mut self, sample: FpsSample) {
        log::info!("delta time [{:.2}] ({:.2} FPS)", sample.dt, sample.fps);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let backend = ctx.gpu.backend();

        if self.live_reload {
            for shader in &self.shaders {
                if let Err(e) = shader.reload_if_modified(backend) {
                    log::error!("shader reload failed, keeping previous program: {e}");
                }
            }
        }

        let t = ctx.time.elapsed;
        for actor in &mut self.actors {
            let shape = &mut actor.shape;
            shape.translate(Vec2::new(t.sin(), 0.0));
            shape.rotate(0.01);
            shape.scale(Vec2::splat(1.0 + 0.0015 * t.sin()));
            if let Err(e) = shape.update(backend) {
                log::error!("{}: update failed: {e}", actor.name);
            }
        }

        let params = DrawParams {
            transform: self.camera.matrix(),
            time: t,
            mouse: ctx.mouse_world(),
        };
        let items: Vec<DrawItem<'_>> = self
            .actors
            .iter()
            .map(|a| DrawItem::new(a.shape.buffer()).with_solid_color(a.color))
            .collect();

        let renderer = &mut self.renderer;
        ctx.render(CLEAR, |rctx, target| renderer.render(rctx, target, &params, &items))
    }
}

/// Corners of a regular polygon, counter-clockwise from the top. Convex, so
/// the polygon fan triangulates it correctly.
fn regular_polygon(center: Vec2, radius: f32, sides: usize) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::TAU / sides as f32;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pentagon_corners_sit_on_the_circle() {
        let center = Vec2::new(10.0, 20.0);
        let pts = regular_polygon(center, 5.0, 5);
        assert_eq!(pts.len(), 5);
        assert!((pts[0] - Vec2::new(10.0, 25.0)).length() < 1e-4);
        assert!(pts.iter().all(|p| ((*p - center).length() - 5.0).abs() < 1e-4));
    }

    #[test]
    fn pentagon_is_convex_counter_clockwise() {
        let pts = regular_polygon(Vec2::ZERO, 1.0, 5);
        for i in 0..pts.len() {
            let (a, b, c) = (pts[i], pts[(i + 1) % 5], pts[(i + 2) % 5]);
            assert!((b - a).perp_dot(c - b) > 0.0);
        }
    }
}
