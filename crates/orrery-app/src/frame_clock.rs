//! Monotonic scene clock feeding the per-frame orbit tick.
//!
//! Elapsed time only moves forward. A single frame may advance it by at most
//! [`MAX_FRAME_DELTA`], so after a stall (window dragged, tab hidden) bodies
//! resume smoothly instead of jumping along their orbits.

use std::time::Instant;

use tracing::warn;

/// Largest per-frame advance in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// Time information for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the scene started.
    pub elapsed: f64,
    /// Seconds since the previous frame, after clamping.
    pub delta: f64,
}

/// Scene clock.
///
/// Call [`tick`](Self::tick) once per rendered frame to advance by wall-clock
/// time, or [`advance`](Self::advance) to drive it with explicit deltas
/// (headless runs, tests).
pub struct FrameClock {
    previous_time: Instant,
    elapsed: f64,
    frame_count: u64,
}

impl FrameClock {
    /// Creates a new clock starting from the current instant.
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by the wall-clock time since the previous call.
    pub fn tick(&mut self) -> FrameTime {
        let current_time = Instant::now();
        let frame_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f64();
        self.previous_time = current_time;
        self.advance(frame_time)
    }

    /// Advance by an explicit delta in seconds. Negative or NaN deltas count as
    /// zero.
    pub fn advance(&mut self, delta: f64) -> FrameTime {
        let mut delta = if delta.is_nan() { 0.0 } else { delta.max(0.0) };

        if delta > MAX_FRAME_DELTA {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                delta * 1000.0,
                MAX_FRAME_DELTA * 1000.0
            );
            delta = MAX_FRAME_DELTA;
        }

        self.elapsed += delta;
        self.frame_count += 1;
        FrameTime {
            elapsed: self.elapsed,
            delta,
        }
    }

    /// Seconds since the scene started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns the total number of frames advanced.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Restart from zero at the current instant.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = FrameClock::new();
        let first = clock.advance(0.016);
        let second = clock.advance(0.020);
        assert!((first.elapsed - 0.016).abs() < 1e-12);
        assert!((second.elapsed - 0.036).abs() < 1e-12);
        assert!((second.delta - 0.020).abs() < 1e-12);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_max_frame_delta_clamp() {
        let mut clock = FrameClock::new();
        let time = clock.advance(1.0);
        assert_eq!(time.delta, MAX_FRAME_DELTA);
        assert_eq!(clock.elapsed(), MAX_FRAME_DELTA);
    }

    #[test]
    fn test_elapsed_never_decreases() {
        let mut clock = FrameClock::new();
        let mut previous = 0.0;
        for delta in [0.01, -0.5, f64::NAN, 0.0, 0.3, 0.02] {
            let time = clock.advance(delta);
            assert!(time.elapsed >= previous);
            previous = time.elapsed;
        }
    }

    #[test]
    fn test_wall_clock_tick_is_non_negative() {
        let mut clock = FrameClock::new();
        let time = clock.tick();
        assert!(time.delta >= 0.0);
        assert!(time.delta <= MAX_FRAME_DELTA);
    }

    #[test]
    fn test_deterministic_sequence() {
        let frame_times = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];
        let mut a = FrameClock::new();
        let mut b = FrameClock::new();
        for &ft in &frame_times {
            assert_eq!(a.advance(ft), b.advance(ft));
        }
        assert_eq!(a.frame_count(), b.frame_count());
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::default();
        clock.advance(0.1);
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame_count(), 0);
    }
}
