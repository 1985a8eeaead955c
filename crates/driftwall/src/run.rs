use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use driftconfig::{AntialiasSetting, DriftConfig, SurfaceSize};
use renderer::{Antialiasing, RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::paths::AppPaths;

pub const DEFAULT_SIZE: SurfaceSize = SurfaceSize::new(1280, 720);
const DEFAULT_TITLE: &str = "driftwall";

/// A configuration together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub exists: bool,
    pub config: DriftConfig,
}

pub fn run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let loaded = load_config(config_path)?;
    let renderer_config = renderer_config(&loaded.config, &args);
    tracing::info!(
        config = %loaded.path.display(),
        config_found = loaded.exists,
        width = renderer_config.surface_size.0,
        height = renderer_config.surface_size.1,
        antialiasing = ?renderer_config.antialiasing,
        policy = ?renderer_config.policy,
        "starting driftwall"
    );

    let mut renderer = Renderer::new(renderer_config);
    renderer.run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads an explicit config file, or `driftwall.toml` from the config
/// directory when none is given. Only the implicit file may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = DriftConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        return Ok(LoadedConfig {
            path: path.to_path_buf(),
            exists: true,
            config,
        });
    }

    let paths = AppPaths::discover()?;
    let path = paths.config_file();
    let exists = path.is_file();
    let config = DriftConfig::load_or_default(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::debug!(config = %path.display(), exists, "resolved driftwall config");
    Ok(LoadedConfig {
        path,
        exists,
        config,
    })
}

/// Merges command line flags over the config file.
pub fn renderer_config(config: &DriftConfig, args: &RunArgs) -> RendererConfig {
    let render = &config.render;
    let size = args.size.or(render.size).unwrap_or(DEFAULT_SIZE);
    let target_fps = args
        .fps
        .or(render.fps)
        .filter(|fps| fps.is_finite() && *fps > 0.0);
    let policy = match args.still_time.or(render.still_time) {
        Some(time) => RenderPolicy::Still { time },
        None => RenderPolicy::Animate { target_fps },
    };

    RendererConfig {
        surface_size: size.as_tuple(),
        title: args
            .title
            .clone()
            .or_else(|| render.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        fullscreen: args.fullscreen || render.fullscreen,
        antialiasing: antialiasing(args.antialias.or(render.antialias)),
        policy,
        field: config.field.clone(),
    }
}

pub fn antialiasing(setting: Option<AntialiasSetting>) -> Antialiasing {
    match setting {
        None | Some(AntialiasSetting::Auto) => Antialiasing::Auto,
        Some(AntialiasSetting::Off) => Antialiasing::Off,
        Some(AntialiasSetting::Samples(samples)) => Antialiasing::Samples(samples),
    }
}
