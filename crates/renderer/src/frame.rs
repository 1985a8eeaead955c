//! Platform-independent render loop.
//!
//! [`FrameLoop`] owns the uniform state and the viewport tracker. The window
//! backend implements [`FrameSink`] and calls [`FrameLoop::tick`] once per
//! redraw, which keeps the timing and resize rules testable without a GPU.

use std::time::Instant;

use noisefield::TimeParams;

use crate::runtime::RenderPolicy;
use crate::uniforms::{Resolution, UniformState};
use crate::viewport::ViewportTracker;

/// Destination for frames produced by [`FrameLoop`].
pub trait FrameSink {
    type Error;

    /// Asks the host to schedule another tick.
    fn request_frame(&mut self);

    /// Called once per viewport change with a non-empty size.
    fn resize_surface(&mut self, size: Resolution) -> Result<(), Self::Error>;

    /// Draws one frame with the given uniforms.
    fn draw(&mut self, uniforms: &UniformState) -> Result<(), Self::Error>;
}

/// What happened during a [`FrameLoop::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// The viewport had zero area; nothing was drawn.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct FrameLoop {
    policy: RenderPolicy,
    frame_scale: f32,
    viewport: ViewportTracker,
    uniforms: UniformState,
    frames: u64,
}

impl FrameLoop {
    pub fn new(policy: RenderPolicy, time: &TimeParams, start: Instant) -> Self {
        Self {
            policy,
            frame_scale: time.frame_scale,
            viewport: ViewportTracker::new(start),
            uniforms: UniformState::default(),
            frames: 0,
        }
    }

    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    /// Number of frames handed to the sink so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Applies a viewport size reported by the window system.
    ///
    /// Returns `true` when the size differs from the last one seen. The same
    /// path runs at the start of every tick, so reporting a size twice is
    /// harmless.
    pub fn handle_resize<S: FrameSink>(
        &mut self,
        sink: &mut S,
        size: Resolution,
        now: Instant,
    ) -> Result<bool, S::Error> {
        let Some(change) = self.viewport.observe(size, now) else {
            return Ok(false);
        };

        tracing::debug!(
            width = size.width,
            height = size.height,
            previous = ?change.previous,
            "viewport changed; resetting time origin"
        );
        self.uniforms.set_resolution(size);
        if !size.is_empty() {
            sink.resize_surface(size)?;
        }
        Ok(true)
    }

    /// Runs one iteration: reschedule, poll the viewport, advance time, draw.
    ///
    /// The next frame is requested before drawing so a failed or skipped draw
    /// does not stall an animated loop.
    pub fn tick<S: FrameSink>(
        &mut self,
        sink: &mut S,
        size: Resolution,
        now: Instant,
    ) -> Result<FrameOutcome, S::Error> {
        if self.policy.is_continuous() {
            sink.request_frame();
        }

        self.handle_resize(sink, size, now)?;
        let elapsed = self.elapsed_at(now);
        self.uniforms.set_elapsed(elapsed);

        if size.is_empty() {
            tracing::trace!("viewport has no area; skipping draw");
            return Ok(FrameOutcome::Skipped);
        }

        sink.draw(&self.uniforms)?;
        self.frames += 1;
        Ok(FrameOutcome::Drawn)
    }

    /// Shader time for a frame drawn at `now`.
    pub fn elapsed_at(&self, now: Instant) -> f32 {
        match self.policy {
            RenderPolicy::Still { time } => time,
            RenderPolicy::Animate { .. } => {
                let millis = self.viewport.since_origin(now).as_secs_f64() * 1000.0;
                (millis * f64::from(self.frame_scale)) as f32
            }
        }
    }
}
