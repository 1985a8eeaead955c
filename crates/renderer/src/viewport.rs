use std::time::{Duration, Instant};

use crate::uniforms::Resolution;

/// A viewport size transition reported by [`ViewportTracker::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportChange {
    pub previous: Option<Resolution>,
    pub current: Resolution,
}

/// Single authority for "did the viewport change".
///
/// Both the window's resize notification and the per-frame poll feed sizes
/// through [`observe`](Self::observe). A change records the new size and moves
/// the time origin to `now`; repeating the same size is a no-op, so an event
/// followed by a poll resets the clock only once.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    last: Option<Resolution>,
    origin: Instant,
}

impl ViewportTracker {
    pub fn new(origin: Instant) -> Self {
        Self { last: None, origin }
    }

    pub fn observe(&mut self, size: Resolution, now: Instant) -> Option<ViewportChange> {
        if self.last == Some(size) {
            return None;
        }
        let previous = self.last.replace(size);
        self.origin = now;
        Some(ViewportChange {
            previous,
            current: size,
        })
    }

    pub fn current(&self) -> Option<Resolution> {
        self.last
    }

    /// Instant the current resolution was first observed.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Wall-clock time since the origin; zero if `now` precedes it.
    pub fn since_origin(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_a_change() {
        let start = Instant::now();
        let mut tracker = ViewportTracker::new(start);
        let change = tracker.observe(Resolution::new(800, 600), start);
        assert_eq!(
            change,
            Some(ViewportChange {
                previous: None,
                current: Resolution::new(800, 600),
            })
        );
        assert_eq!(tracker.current(), Some(Resolution::new(800, 600)));
    }

    #[test]
    fn repeated_size_is_idempotent() {
        let start = Instant::now();
        let mut tracker = ViewportTracker::new(start);
        let later = start + Duration::from_millis(250);
        tracker.observe(Resolution::new(800, 600), later);
        let origin = tracker.origin();

        assert_eq!(
            tracker.observe(Resolution::new(800, 600), later + Duration::from_secs(1)),
            None
        );
        assert_eq!(tracker.origin(), origin);
    }

    #[test]
    fn change_moves_the_origin() {
        let start = Instant::now();
        let mut tracker = ViewportTracker::new(start);
        tracker.observe(Resolution::new(800, 600), start);

        let resize_at = start + Duration::from_secs(3);
        let change = tracker
            .observe(Resolution::new(1024, 768), resize_at)
            .expect("resize detected");
        assert_eq!(change.previous, Some(Resolution::new(800, 600)));
        assert_eq!(tracker.origin(), resize_at);
        assert_eq!(tracker.since_origin(resize_at), Duration::ZERO);
        assert_eq!(
            tracker.since_origin(resize_at + Duration::from_millis(40)),
            Duration::from_millis(40)
        );
    }

    #[test]
    fn clock_before_origin_saturates_to_zero() {
        let start = Instant::now();
        let tracker = ViewportTracker::new(start + Duration::from_secs(1));
        assert_eq!(tracker.since_origin(start), Duration::ZERO);
    }
}
