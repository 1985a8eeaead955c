use noisefield::FieldParams;

use crate::runtime::RenderPolicy;

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the merged CLI flags and config file: how large the
/// window should be, how it animates, and every constant of the noise field.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Open a borderless fullscreen window on the current monitor.
    pub fullscreen: bool,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Whether frames animate continuously or hold a fixed time.
    pub policy: RenderPolicy,
    /// Palette, thresholds and time scaling fed to the shader.
    pub field: FieldParams,
}

impl Default for RendererConfig {
    /// Provides a 1280x720 animated window with the stock field.
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "driftwall".to_string(),
            fullscreen: false,
            antialiasing: Antialiasing::default(),
            policy: RenderPolicy::default(),
            field: FieldParams::default(),
        }
    }
}
