mod studio;

use std::path::PathBuf;

use glint_engine::device::GpuInit;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::PhysicalSize;

use studio::{AssetDirs, Studio};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let dirs = AssetDirs {
        shaders: dir_from_env("GLINT_SHADER_DIR").unwrap_or_else(|| crate_dir.join("shaders")),
        assets: dir_from_env("GLINT_ASSET_DIR").unwrap_or_else(|| crate_dir.join("assets")),
    };
    log::info!("shaders: {}, assets: {}", dirs.shaders.display(), dirs.assets.display());

    let config = RuntimeConfig {
        title: "2D Simple Render".to_string(),
        initial_size: PhysicalSize::new(1600, 900),
        show_fps: true,
    };

    Runtime::run(config, GpuInit::default(), Studio::new(dirs))
}

fn dir_from_env(var: &str) -> Option<PathBuf> {
    std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}
