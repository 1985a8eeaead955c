use std::borrow::Cow;

use anyhow::{anyhow, Context, Result};
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::ShaderStage;

use crate::shader::{fragment_source, VERTEX_SHADER_GLSL};
use noisefield::FieldParams;

/// Parses and validates GLSL with naga before any GPU object exists.
///
/// Errors carry naga's annotated source listing so a bad generated program is
/// reported with line context instead of a driver-level panic.
pub fn validate_glsl(source: &str, stage: ShaderStage) -> Result<()> {
    let module = Frontend::default()
        .parse(&Options::from(stage), source)
        .map_err(|err| anyhow!("{}", err.emit_to_string(source)))
        .with_context(|| format!("failed to parse {stage:?} shader"))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|err| anyhow!("{}", err.emit_to_string(source)))
        .with_context(|| format!("{stage:?} shader failed validation"))?;
    Ok(())
}

/// Compiles the full-screen quad vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    create_module(
        device,
        "fullscreen quad vertex",
        Cow::Borrowed(VERTEX_SHADER_GLSL),
        ShaderStage::Vertex,
    )
}

/// Generates the field program for `params` and compiles it.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    params: &FieldParams,
) -> Result<wgpu::ShaderModule> {
    let source = fragment_source(params);
    tracing::trace!(bytes = source.len(), "generated field fragment shader");
    create_module(
        device,
        "noise field fragment",
        Cow::Owned(source),
        ShaderStage::Fragment,
    )
}

fn create_module(
    device: &wgpu::Device,
    label: &str,
    source: Cow<'static, str>,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule> {
    validate_glsl(&source, stage)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: source,
            stage,
            defines: &[],
        },
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("{label} shader rejected by device: {err}"));
    }
    Ok(module)
}
