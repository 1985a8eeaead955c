//! Renderer crate for driftwall.
//!
//! Glues the winit window, the `wgpu` pipeline and the GLSL generated from
//! [`noisefield::FieldParams`] together. The overall flow is:
//!
//! ```text
//!   CLI / driftwall
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowSink ──▶ winit event loop ──▶ FrameLoop::tick()
//!                                                  │
//!                                                  └─▶ UniformState ─▶ GPU UBO
//! ```
//!
//! [`FrameLoop`] owns time and viewport bookkeeping and talks to the window
//! only through [`FrameSink`], so the timing rules are tested without a GPU.

mod compile;
pub mod frame;
mod gpu;
pub mod runtime;
pub mod shader;
pub mod types;
pub mod uniforms;
pub mod viewport;
mod window;

use anyhow::{Context, Result};

pub use compile::validate_glsl;
pub use frame::{FrameLoop, FrameOutcome, FrameSink};
pub use runtime::{FrameScheduler, RenderPolicy};
pub use shader::{fragment_source, QUAD_VERTEX_COUNT, VERTEX_SHADER_GLSL};
pub use types::{Antialiasing, RendererConfig};
pub use uniforms::{FieldUniforms, Resolution, UniformState};
pub use viewport::{ViewportChange, ViewportTracker};
pub use wgpu::naga::ShaderStage;

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and animates the field until it is closed.
    ///
    /// Field parameters are validated first so a bad configuration fails
    /// before any window or GPU object is created.
    pub fn run(&mut self) -> Result<()> {
        self.config
            .field
            .validate()
            .context("invalid field parameters")?;
        window::run_window(self.config.clone())
    }
}
