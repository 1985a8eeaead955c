use bytemuck::{Pod, Zeroable};

/// Viewport size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either axis is zero (minimised or collapsed window).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Same size with each axis raised to at least one pixel.
    pub fn clamped(&self) -> Self {
        Self::new(self.width.max(1), self.height.max(1))
    }

    pub fn as_vec2(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Values shared by every pixel of one draw call.
///
/// Owned by the render loop and handed to the sink by reference; there is no
/// ambient copy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformState {
    elapsed: f32,
    resolution: Resolution,
}

impl UniformState {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            elapsed: 0.0,
            resolution,
        }
    }

    /// Shader time in `u_time` units.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Stores `elapsed`, replacing negative or non-finite values with zero.
    pub fn set_elapsed(&mut self, elapsed: f32) {
        self.elapsed = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }
}

/// std140 mirror of the `FieldUniforms` block declared by the fragment shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FieldUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub padding: f32,
}

impl From<&UniformState> for FieldUniforms {
    fn from(state: &UniformState) -> Self {
        Self {
            resolution: state.resolution().clamped().as_vec2(),
            time: state.elapsed(),
            padding: 0.0,
        }
    }
}
