use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames animate continuously or hold a
/// single timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    /// Re-render every display refresh, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Hold the shader at a fixed time (in shader time units) and only redraw
    /// when the window asks for it.
    Still {
        /// Value written to `u_time` for every frame.
        time: f32,
    },
}

impl RenderPolicy {
    /// True when the loop should reschedule itself after every frame.
    pub fn is_continuous(&self) -> bool {
        matches!(self, RenderPolicy::Animate { .. })
    }

    pub fn target_fps(&self) -> Option<f32> {
        match self {
            RenderPolicy::Animate { target_fps } => normalize_fps(*target_fps),
            RenderPolicy::Still { .. } => None,
        }
    }
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

fn normalize_fps(value: Option<f32>) -> Option<f32> {
    value.filter(|fps| fps.is_finite() && *fps > 0.0)
}

/// Paces redraws when a frame rate cap is active.
///
/// Without a cap every redraw is allowed and the swapchain's Fifo present mode
/// paces frames to the display refresh.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(target_fps: Option<f32>) -> Self {
        Self {
            interval: normalize_fps(target_fps)
                .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps))),
            last_frame: None,
        }
    }

    pub fn is_capped(&self) -> bool {
        self.interval.is_some()
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        }
    }

    /// Instant at which the next capped frame becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        Some(self.last_frame? + self.interval?)
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
