use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec2;
use image::{ImageFormat, Rgba, RgbaImage};
use noisefield::{Composer, FieldParams};

use crate::cli::StillArgs;
use crate::run::{load_config, DEFAULT_SIZE};

pub fn run(config_path: Option<&Path>, args: StillArgs) -> Result<()> {
    let loaded = load_config(config_path)?;
    let render = &loaded.config.render;
    let size = args.size.or(render.size).unwrap_or(DEFAULT_SIZE);
    let time = args.time.or(render.still_time).unwrap_or(0.0);
    if !time.is_finite() || time < 0.0 {
        bail!("still time must be a non-negative number (got {time})");
    }
    ensure_png(&args.output)?;

    tracing::info!(
        output = %args.output.display(),
        width = size.width,
        height = size.height,
        time,
        "rendering still frame"
    );
    let image = render_still(&loaded.config.field, size.as_tuple(), time)?;
    image
        .save_with_format(&args.output, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("{}", args.output.display());
    Ok(())
}

/// Evaluates the field for every pixel of a `width` x `height` image.
///
/// Image rows run top to bottom while fragment coordinates start at the
/// bottom-left corner, so rows are flipped when sampling.
pub fn render_still(
    field: &FieldParams,
    (width, height): (u32, u32),
    time: f32,
) -> Result<RgbaImage> {
    field.validate().context("invalid field parameters")?;
    let composer = Composer::new(field.clone());
    let resolution = Vec2::new(width as f32, height as f32);

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let frag = Vec2::new(x as f32 + 0.5, (height - y) as f32 - 0.5);
        let [r, g, b, a] = composer.shade(frag, resolution, time);
        Rgba([to_byte(r), to_byte(g), to_byte(b), to_byte(a)])
    }))
}

fn to_byte(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn ensure_png(path: &Path) -> Result<()> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Ok(()),
        None => bail!("output path has no extension; expected .png"),
        Some(other) => bail!("unsupported still format '.{other}'; expected .png"),
    }
}
