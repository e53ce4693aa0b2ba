use crate::coords::Viewport;
use crate::device::WgpuBackend;

/// Renderer-facing context (backend + surface format + viewport).
pub struct RenderCtx<'a> {
    pub backend: &'a WgpuBackend,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(backend: &'a WgpuBackend, surface_format: wgpu::TextureFormat, viewport: Viewport) -> Self {
        Self { backend, surface_format, viewport }
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        self.backend.device()
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        self.backend.queue()
    }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
