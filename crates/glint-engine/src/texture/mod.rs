use std::fmt;
use std::path::Path;

use crate::buffer::GpuBackend;
use crate::error::{Error, Result};

/// An RGBA8 texture owned by exactly one buffer (or by the caller).
///
/// Rows are stored bottom-up so that texture coordinate (0, 0) samples the
/// bottom-left pixel of the source image.
pub struct Texture<B: GpuBackend> {
    handle: B::Texture,
    width: u32,
    height: u32,
}

impl<B: GpuBackend> Texture<B> {
    /// Decodes an image file and uploads it, flipped vertically.
    pub fn from_path(gpu: &B, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::TextureDecode { path: path.to_owned(), source })?;

        let mut rgba = image.to_rgba8();
        image::imageops::flip_vertical_in_place(&mut rgba);
        let (width, height) = rgba.dimensions();

        log::debug!("loaded texture {} ({width}x{height})", path.display());
        Self::from_rgba(gpu, width, height, rgba.as_raw())
    }

    /// Uploads tightly packed RGBA8 rows, first row at the bottom.
    pub fn from_rgba(gpu: &B, width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || width == 0 || height == 0 {
            return Err(Error::TextureSize { width, height, len: rgba.len(), expected });
        }
        let handle = gpu.create_texture(width, height, rgba)?;
        Ok(Self { handle, width, height })
    }

    /// A `cells`×`cells` grey/white checkerboard with `cell_size`-pixel squares.
    ///
    /// Used when an image file is missing.
    pub fn checkerboard(gpu: &B, cells: u32, cell_size: u32) -> Result<Self> {
        let side = cells * cell_size;
        let mut rgba = Vec::with_capacity(side as usize * side as usize * 4);
        for y in 0..side {
            for x in 0..side {
                let light = ((x / cell_size.max(1)) + (y / cell_size.max(1))) % 2 == 0;
                let v = if light { 255 } else { 96 };
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Self::from_rgba(gpu, side, side, &rgba)
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn handle(&self) -> &B::Texture {
        &self.handle
    }
}

impl<B: GpuBackend> fmt::Debug for Texture<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
