use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by buffer construction, shape generation and GPU uploads.
#[derive(Debug, Error)]
pub enum Error {
    #[error("vertex payload of {len} floats is not a multiple of the {stride}-float vertex stride")]
    VertexStride { len: usize, stride: usize },

    #[error("index payload of {0} indices does not describe whole triangles")]
    IndexTriangles(usize),

    #[error("circle quality {quality} is below the minimum of {min}")]
    CircleQuality { quality: usize, min: usize },

    #[error("polygon needs at least 3 points, got {0}")]
    PolygonPoints(usize),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    ObjParse { line: usize, message: String },

    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("buffer has no GPU allocation")]
    Unallocated,

    #[error("shader is not ready")]
    ShaderNotReady,

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("failed to decode texture {path}")]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture data is {len} bytes, expected {expected} for {width}x{height} RGBA")]
    TextureSize { width: u32, height: u32, len: usize, expected: usize },

    #[error("gpu: {0}")]
    Gpu(String),
}

pub type Result<T> = std::result::Result<T, Error>;
