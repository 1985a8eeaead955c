//! Host-side model of the driftwall noise field.
//!
//! Everything the fragment shader computes per pixel lives here as plain Rust
//! so it can be unit tested and rendered on the CPU:
//!
//! ```text
//!   FieldParams ──▶ Composer::shade(frag_coord, resolution, time)
//!                      │
//!                      ├─▶ blend_weights() ─▶ gradient_noise() x N
//!                      ├─▶ blend()          (palette cascade)
//!                      └─▶ grain()          ─▶ gradient_noise()
//! ```
//!
//! The renderer generates its GLSL from the same [`FieldParams`], so the GPU
//! program and [`Composer`] agree on every constant.

pub mod compose;
pub mod noise;
pub mod params;

pub use compose::{mix, smoothstep, BlendWeights, Composer};
pub use noise::{gradient_noise, lattice_gradient, LATTICE_HASH_ROWS, LATTICE_HASH_SCALE};
pub use params::{
    BlendChannel, ColorParseError, FieldParams, GrainParams, NoiseLayer, Palette, ParamsError,
    Rgb, TimeParams, PALETTE_LEN,
};
