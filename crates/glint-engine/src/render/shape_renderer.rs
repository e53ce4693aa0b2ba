use std::collections::HashMap;
use std::num::NonZeroU64;
use std::rc::{Rc, Weak};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::buffer::{BufferFactory, GpuBackend, GpuBuffer};
use crate::coords::{ColorRgba, Viewport};
use crate::device::{WgpuBackend, WgpuVertexArray};
use crate::render::{RenderCtx, RenderTarget};
use crate::shader::Shader;
use crate::texture::Texture;

const UNIFORM_SIZE: u64 = size_of::<ShapeUniform>() as u64;

/// Per-draw uniform block (bind group 0, dynamic offset).
///
/// WGSL mirror:
/// ```wgsl
/// struct Uniforms {
///     transform: mat4x4<f32>,
///     resolution: vec2<f32>,
///     mouse: vec2<f32>,
///     solid_color: vec4<f32>,
///     time: f32,
///     use_texture: u32,
/// }
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ShapeUniform {
    pub transform: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub mouse: [f32; 2],
    pub solid_color: [f32; 4],
    pub time: f32,
    pub use_texture: u32,
    pub _pad: [f32; 2], // struct size rounds up to 16
}

impl ShapeUniform {
    pub fn new(params: &DrawParams, item: &DrawItem<'_>, viewport: Viewport) -> Self {
        Self {
            transform: params.transform.to_cols_array_2d(),
            resolution: [viewport.width.max(1.0), viewport.height.max(1.0)],
            mouse: params.mouse.to_array(),
            solid_color: item.solid_color.to_array(),
            time: params.time,
            use_texture: item.buffer.texture().is_some() as u32,
            _pad: [0.0; 2],
        }
    }
}

/// Values shared by every draw in one [`ShapeRenderer::render`] call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawParams {
    /// Camera matrix applied after the pixel→NDC mapping.
    pub transform: Mat4,
    /// Seconds since start.
    pub time: f32,
    /// Cursor in world pixels.
    pub mouse: Vec2,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self { transform: Mat4::IDENTITY, time: 0.0, mouse: Vec2::ZERO }
    }
}

/// One buffer to draw.
///
/// Buffers without a texture are filled with `solid_color` (the shader sees
/// `use_texture == 0`).
#[derive(Debug, Copy, Clone)]
pub struct DrawItem<'a> {
    pub buffer: &'a GpuBuffer<WgpuBackend>,
    pub solid_color: ColorRgba,
}

impl<'a> DrawItem<'a> {
    #[inline]
    pub fn new(buffer: &'a GpuBuffer<WgpuBackend>) -> Self {
        Self { buffer, solid_color: ColorRgba::white() }
    }

    #[inline]
    pub fn with_solid_color(mut self, color: ColorRgba) -> Self {
        self.solid_color = color;
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    shader: usize,
    format: wgpu::TextureFormat,
}

impl PipelineKey {
    fn new<B: GpuBackend>(shader: &Rc<Shader<B>>, format: wgpu::TextureFormat) -> Self {
        Self { shader: Rc::as_ptr(shader) as usize, format }
    }
}

struct CachedPipeline<B: GpuBackend, P> {
    shader: Weak<Shader<B>>,
    program_id: u64,
    pipeline: P,
}

/// Pipelines per (shader, surface format), each tagged with the program it
/// was built from.
///
/// The `Weak` keeps a dropped shader's address from being reused while its
/// entry exists.
struct PipelineCache<B: GpuBackend, P> {
    entries: HashMap<PipelineKey, CachedPipeline<B, P>>,
}

impl<B: GpuBackend, P> Default for PipelineCache<B, P> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<B: GpuBackend, P> PipelineCache<B, P> {
    /// The pipeline for `shader`'s current program, if one was built.
    fn current(&self, key: &PipelineKey, shader: &Shader<B>) -> Option<&P> {
        self.entries
            .get(key)
            .filter(|c| c.program_id == shader.program_id())
            .map(|c| &c.pipeline)
    }

    fn get(&self, key: &PipelineKey) -> Option<&P> {
        self.entries.get(key).map(|c| &c.pipeline)
    }

    /// Stores `pipeline` for `shader`'s current program, replacing the one
    /// built from an older program, and drops pipelines of released shaders.
    fn insert(&mut self, key: PipelineKey, shader: &Rc<Shader<B>>, pipeline: P) {
        self.entries.retain(|_, c| c.shader.strong_count() > 0);
        self.entries.insert(
            key,
            CachedPipeline { shader: Rc::downgrade(shader), program_id: shader.program_id(), pipeline },
        );
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Draws [`GpuBuffer`]s with their own shader programs.
///
/// Pipelines are built lazily per (shader, surface format). The vertex state
/// comes from the shader's current attribute locations, so a reloaded shader
/// whose inputs moved gets a matching pipeline on the next draw.
#[derive(Default)]
pub struct ShapeRenderer {
    uniform_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,

    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,
    uniform_stride: u64,

    pipelines: PipelineCache<WgpuBackend, wgpu::RenderPipeline>,

    /// Bound for untextured buffers; the shader ignores it.
    white: Option<Texture<WgpuBackend>>,
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `items` in order into `target`, on top of what is there.
    ///
    /// Buffers that are released, empty or whose shader has no program are
    /// skipped.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        params: &DrawParams,
        items: &[DrawItem<'_>],
    ) {
        let drawable: Vec<&DrawItem<'_>> = items.iter().filter(|item| is_drawable(item.buffer)).collect();
        if drawable.is_empty() {
            return;
        }

        self.ensure_layouts(ctx);
        self.ensure_white(ctx);
        self.ensure_uniform_capacity(ctx, drawable.len());

        let mut keys = Vec::with_capacity(drawable.len());
        for item in &drawable {
            keys.push(self.ensure_pipeline(ctx, item.buffer));
        }

        let Some(uniform_buffer) = self.uniform_buffer.as_ref() else { return };
        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * drawable.len()];
        for (i, item) in drawable.iter().enumerate() {
            let u = ShapeUniform::new(params, item, ctx.viewport);
            bytes[i * stride..i * stride + UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&u));
        }
        ctx.queue().write_buffer(uniform_buffer, 0, &bytes);

        let Some(uniform_bind_group) = self.uniform_bind_group.as_ref() else { return };
        let Some(white) = self.white.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (i, (item, key)) in drawable.iter().zip(&keys).enumerate() {
            let (Some(key), Some(handles)) = (key, item.buffer.handles()) else { continue };
            let Some(pipeline) = self.pipelines.get(key) else { continue };

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, uniform_bind_group, &[(i as u64 * self.uniform_stride) as u32]);
            item.buffer.texture().unwrap_or(white).bind(&mut rpass, 1);
            rpass.set_vertex_buffer(0, handles.vertex_buffer.raw().slice(..));
            rpass.set_index_buffer(handles.index_buffer.raw().slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..item.buffer.element_count(), 0, 0..1);
        }
    }

    /// Number of cached pipelines.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_layout.is_some() {
            return;
        }

        let uniform_layout = ctx.device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint shape uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device().create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glint shape pipeline layout"),
            bind_group_layouts: &[&uniform_layout, ctx.backend.texture_layout()],
            immediate_size: 0,
        });

        self.uniform_layout = Some(uniform_layout);
        self.pipeline_layout = Some(pipeline_layout);
    }

    fn ensure_white(&mut self, ctx: &RenderCtx<'_>) {
        if self.white.is_some() {
            return;
        }
        match Texture::from_rgba(ctx.backend, 1, 1, &[255; 4]) {
            Ok(t) => self.white = Some(t),
            Err(e) => log::error!("failed to create fallback texture: {e}"),
        }
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, draws: usize) {
        if draws <= self.uniform_capacity && self.uniform_bind_group.is_some() {
            return;
        }
        let Some(layout) = self.uniform_layout.as_ref() else { return };

        let align = u64::from(ctx.device().limits().min_uniform_buffer_offset_alignment);
        self.uniform_stride = UNIFORM_SIZE.next_multiple_of(align.max(1));

        let capacity = draws.next_power_of_two().max(16);
        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint shape uniforms"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint shape uniform bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(UNIFORM_SIZE),
                }),
            }],
        });

        log::debug!("shape uniform buffer grown to {capacity} draws");
        self.uniform_buffer = Some(buffer);
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = capacity;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, buffer: &GpuBuffer<WgpuBackend>) -> Option<PipelineKey> {
        let shader = buffer.shader()?;
        let key = PipelineKey::new(shader, ctx.surface_format);
        if self.pipelines.current(&key, shader).is_some() {
            return Some(key);
        }

        let program_id = shader.program_id();
        let vertex_array = WgpuVertexArray::new(&BufferFactory::layout_for(shader));
        let program = shader.program()?;
        let pipeline = ctx.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glint shape pipeline"),
            layout: self.pipeline_layout.as_ref(),

            vertex: wgpu::VertexState {
                module: &program.vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_array.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &program.fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        drop(program);
        log::debug!("built pipeline for program {program_id} ({:?})", key.format);
        self.pipelines.insert(key, shader, pipeline);
        Some(key)
    }
}

fn is_drawable<B: GpuBackend>(buffer: &GpuBuffer<B>) -> bool {
    buffer.is_allocated() && buffer.element_count() > 0 && buffer.shader().is_some_and(|s| s.is_ready())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::recording::RecordingBackend;
    use crate::buffer::{AttributeFormat, TEX_COORD_ATTRIBUTE, VERTEX_STRIDE};
    use crate::shader::tests::{test_shader, vertex_tex_coord_at_4, ScriptedShader};

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<ShapeUniform>(), 112);
        assert_eq!(std::mem::offset_of!(ShapeUniform, resolution), 64);
        assert_eq!(std::mem::offset_of!(ShapeUniform, mouse), 72);
        assert_eq!(std::mem::offset_of!(ShapeUniform, solid_color), 80);
        assert_eq!(std::mem::offset_of!(ShapeUniform, time), 96);
        assert_eq!(std::mem::offset_of!(ShapeUniform, use_texture), 100);
    }

    #[test]
    fn default_params_are_identity() {
        let p = DrawParams::default();
        assert_eq!(p.transform, Mat4::IDENTITY);
        assert_eq!(p.mouse, Vec2::ZERO);
    }

    // ── drawable filter ───────────────────────────────────────────────────

    #[test]
    fn only_live_non_empty_buffers_are_drawable() {
        let gpu = RecordingBackend::new();
        let shader = test_shader(&gpu);

        assert!(!is_drawable(&GpuBuffer::<RecordingBackend>::empty()));

        let empty = BufferFactory::static_float(&gpu, &[], &[], &shader).unwrap();
        assert!(!is_drawable(&empty));

        let tri = BufferFactory::static_float(&gpu, &[0.0; VERTEX_STRIDE * 3], &[0, 1, 2], &shader).unwrap();
        assert!(is_drawable(&tri));
    }

    // ── pipeline cache ────────────────────────────────────────────────────

    #[test]
    fn reload_invalidates_pipeline_and_moves_inputs() {
        let gpu = RecordingBackend::new();
        let scripted = ScriptedShader::new(&gpu, "renderer-reload");
        let shader = &scripted.shader;
        let buffer = BufferFactory::dynamic_float(&gpu, &[0.0; VERTEX_STRIDE * 3], &[0, 1, 2], shader).unwrap();

        let mut cache = PipelineCache::<RecordingBackend, &str>::default();
        let key = PipelineKey::new(shader, FORMAT);
        cache.insert(key, shader, "first");
        assert_eq!(cache.current(&key, shader), Some(&"first"));

        scripted.edit(&scripted.sources.vertex, &vertex_tex_coord_at_4());
        assert!(shader.reload_if_modified(&gpu).unwrap());

        // The buffer still carries the layout it was created with; the
        // pipeline must not.
        let stale = gpu.layout_of(&buffer.handles().unwrap().vertex_array).unwrap();
        assert!(stale.attribute(4).is_none());
        assert_eq!(cache.current(&key, shader), None);

        let layout = BufferFactory::layout_for(shader);
        let uv = layout.attribute(shader.attribute_location(TEX_COORD_ATTRIBUTE).unwrap()).unwrap();
        assert_eq!((uv.location, uv.format, uv.offset), (4, AttributeFormat::Float32x2, 28));
        assert!(layout.attribute(2).is_none());

        cache.insert(key, shader, "second");
        assert_eq!(cache.current(&key, shader), Some(&"second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn released_shaders_lose_their_pipelines() {
        let gpu = RecordingBackend::new();
        let kept = test_shader(&gpu);
        let dropped = test_shader(&gpu);

        let mut cache = PipelineCache::<RecordingBackend, u32>::default();
        cache.insert(PipelineKey::new(&kept, FORMAT), &kept, 1);
        cache.insert(PipelineKey::new(&dropped, FORMAT), &dropped, 2);
        assert_eq!(cache.len(), 2);

        drop(dropped);
        let other = test_shader(&gpu);
        cache.insert(PipelineKey::new(&other, FORMAT), &other, 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&PipelineKey::new(&kept, FORMAT)), Some(&1));
        assert_eq!(cache.get(&PipelineKey::new(&other, FORMAT)), Some(&3));
    }

    #[test]
    fn formats_get_separate_pipelines() {
        let gpu = RecordingBackend::new();
        let shader = test_shader(&gpu);

        let mut cache = PipelineCache::<RecordingBackend, u32>::default();
        cache.insert(PipelineKey::new(&shader, FORMAT), &shader, 1);
        cache.insert(PipelineKey::new(&shader, wgpu::TextureFormat::Rgba8Unorm), &shader, 2);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.current(&PipelineKey::new(&shader, FORMAT), &shader), Some(&1));
    }
}
