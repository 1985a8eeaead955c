//! GPU side of the renderer.
//!
//! - `context` owns the wgpu instance, device and surface and rebuilds the
//!   swapchain when the window resizes.
//! - `pipeline` compiles the generated GLSL into the single render pipeline.
//! - `state` glues them together with the uniform buffer and exposes the
//!   `GpuState` used by `window`.

mod context;
mod pipeline;
mod state;

pub(crate) use state::GpuState;
