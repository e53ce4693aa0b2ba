use wgpu::util::DeviceExt;

use crate::buffer::{AttributeFormat, BufferKind, BufferUsage, GpuBackend, VertexLayout};
use crate::error::{Error, Result};
use crate::texture::Texture;

/// [`GpuBackend`] over a wgpu device and queue.
///
/// Cheap to clone; every clone talks to the same device. Also owns the bind
/// group layout shared by every texture (group 1: view at binding 0, sampler
/// at binding 1).
#[derive(Debug, Clone)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    texture_layout: wgpu::BindGroupLayout,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        Self { device, queue, texture_layout }
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[inline]
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }
}

// ── handles ───────────────────────────────────────────────────────────────

/// wgpu has no vertex array objects; the captured layout is kept by value
/// and turned into a `VertexBufferLayout` when a pipeline is built.
#[derive(Debug)]
pub struct WgpuVertexArray {
    layout: VertexLayout,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl WgpuVertexArray {
    pub fn new(layout: &VertexLayout) -> Self {
        let attributes = layout
            .attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: vertex_format(a.format),
                offset: a.offset,
                shader_location: a.location,
            })
            .collect();
        Self { layout: layout.clone(), attributes }
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.layout.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

#[derive(Debug)]
pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
    kind: BufferKind,
}

impl WgpuBuffer {
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        self.kind
    }
}

#[derive(Debug)]
pub struct WgpuProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

#[derive(Debug)]
pub struct WgpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl WgpuTexture {
    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl Texture<WgpuBackend> {
    /// Binds this texture's view and sampler as bind group `slot`.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>, slot: u32) {
        rpass.set_bind_group(slot, self.handle().bind_group(), &[]);
    }
}

fn vertex_format(format: AttributeFormat) -> wgpu::VertexFormat {
    match format {
        AttributeFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        AttributeFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
    }
}

// ── backend ───────────────────────────────────────────────────────────────

impl GpuBackend for WgpuBackend {
    type VertexArray = WgpuVertexArray;
    type Buffer = WgpuBuffer;
    type Program = WgpuProgram;
    type Texture = WgpuTexture;

    fn create_vertex_array(&self, layout: &VertexLayout) -> Result<WgpuVertexArray> {
        Ok(WgpuVertexArray::new(layout))
    }

    fn create_buffer(&self, kind: BufferKind, contents: &[u8], usage: BufferUsage) -> Result<WgpuBuffer> {
        let (label, target) = match kind {
            BufferKind::Vertex => ("glint vbo", wgpu::BufferUsages::VERTEX),
            BufferKind::Index => ("glint ibo", wgpu::BufferUsages::INDEX),
        };
        // wgpu chooses memory placement itself; the hint is only logged.
        log::trace!("allocating {} bytes for {kind:?} buffer ({usage:?})", contents.len());
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: target | wgpu::BufferUsages::COPY_DST,
        });
        Ok(WgpuBuffer { buffer, kind })
    }

    fn write_buffer(&self, buffer: &WgpuBuffer, offset: u64, data: &[u8]) -> Result<()> {
        let end = offset + data.len() as u64;
        if end > buffer.buffer.size() {
            return Err(Error::Gpu(format!(
                "write of {} bytes at {offset} overflows a {}-byte buffer",
                data.len(),
                buffer.buffer.size()
            )));
        }
        if !data.is_empty() {
            self.queue.write_buffer(&buffer.buffer, offset, data);
        }
        Ok(())
    }

    fn compile_program(&self, vertex_src: &str, fragment_src: &str) -> Result<WgpuProgram> {
        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });
        Ok(WgpuProgram { vertex, fragment })
    }

    fn create_texture(&self, width: u32, height: u32, rgba: &[u8]) -> Result<WgpuTexture> {
        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glint texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        // Row 0 is the bottom of the image, so v = 0 samples the bottom edge.
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glint texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint texture bind group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        Ok(WgpuTexture { _texture: texture, bind_group })
    }
}
