//! Eye blink state machines.
//!
//! Each eye owns one machine cycling Idle -> Closing -> Opening -> Idle, with a
//! random pause drawn on every return to Idle. The machines share nothing with
//! the orbit engine except the frame delta that advances them.

use orrery_config::EyeConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Shortest idle pause, whatever the configuration says.
const MIN_IDLE: f64 = 0.05;

/// Steps longer than this many full blink cycles only keep the remainder.
const MAX_CATCH_UP_CYCLES: f64 = 64.0;

/// Current blink phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlinkPhase {
    /// Eye open, waiting `remaining` seconds before the next blink.
    Idle { remaining: f64 },
    /// Lid closing, `t` seconds in.
    Closing { t: f64 },
    /// Lid reopening, `t` seconds in.
    Opening { t: f64 },
}

/// Blink timing, copied out of [`EyeConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlinkTiming {
    pub min_interval: f64,
    pub max_interval: f64,
    pub close_duration: f64,
    pub open_duration: f64,
}

impl From<&EyeConfig> for BlinkTiming {
    fn from(config: &EyeConfig) -> Self {
        Self {
            min_interval: config.min_interval,
            max_interval: config.max_interval,
            close_duration: config.close_duration,
            open_duration: config.open_duration,
        }
    }
}

/// Blink state for one eye.
pub struct BlinkMachine {
    phase: BlinkPhase,
    timing: BlinkTiming,
    rng: ChaCha8Rng,
}

impl BlinkMachine {
    pub fn new(timing: BlinkTiming, seed: u64) -> Self {
        let mut machine = Self {
            phase: BlinkPhase::Idle { remaining: 0.0 },
            timing,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        machine.phase = BlinkPhase::Idle {
            remaining: machine.next_interval(),
        };
        machine
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Start a blink now if the eye is idle. Returns whether it started.
    pub fn trigger(&mut self) -> bool {
        if matches!(self.phase, BlinkPhase::Idle { .. }) {
            self.phase = BlinkPhase::Closing { t: 0.0 };
            true
        } else {
            false
        }
    }

    /// Advance by `dt` seconds, carrying leftover time across phase changes.
    ///
    /// Non-finite or negative steps count as zero.
    pub fn tick(&mut self, dt: f64) {
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let cycle = self.longest_cycle();
        if dt > cycle * MAX_CATCH_UP_CYCLES {
            dt %= cycle;
        }

        while dt > 0.0 {
            match self.phase {
                BlinkPhase::Idle { remaining } => {
                    if dt < remaining {
                        self.phase = BlinkPhase::Idle {
                            remaining: remaining - dt,
                        };
                        dt = 0.0;
                    } else {
                        dt -= remaining;
                        self.phase = BlinkPhase::Closing { t: 0.0 };
                    }
                }
                BlinkPhase::Closing { t } => {
                    let left = self.timing.close_duration.max(0.0) - t;
                    if dt < left {
                        self.phase = BlinkPhase::Closing { t: t + dt };
                        dt = 0.0;
                    } else {
                        dt -= left.max(0.0);
                        self.phase = BlinkPhase::Opening { t: 0.0 };
                    }
                }
                BlinkPhase::Opening { t } => {
                    let left = self.timing.open_duration.max(0.0) - t;
                    if dt < left {
                        self.phase = BlinkPhase::Opening { t: t + dt };
                        dt = 0.0;
                    } else {
                        dt -= left.max(0.0);
                        self.phase = BlinkPhase::Idle {
                            remaining: self.next_interval(),
                        };
                    }
                }
            }
        }
    }

    /// Lid openness: 1 fully open, 0 fully closed.
    pub fn openness(&self) -> f64 {
        match self.phase {
            BlinkPhase::Idle { .. } => 1.0,
            BlinkPhase::Closing { t } => 1.0 - progress(t, self.timing.close_duration),
            BlinkPhase::Opening { t } => progress(t, self.timing.open_duration),
        }
    }

    /// Upper bound on one Idle -> Closing -> Opening round, never below
    /// [`MIN_IDLE`].
    fn longest_cycle(&self) -> f64 {
        let non_negative = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let idle = non_negative(self.timing.min_interval.max(self.timing.max_interval));
        idle.max(MIN_IDLE)
            + non_negative(self.timing.close_duration)
            + non_negative(self.timing.open_duration)
    }

    fn next_interval(&mut self) -> f64 {
        let lo = self.timing.min_interval.min(self.timing.max_interval);
        let hi = self.timing.min_interval.max(self.timing.max_interval);
        let interval = if lo < hi && lo.is_finite() && hi.is_finite() {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        };
        if interval.is_finite() {
            interval.max(MIN_IDLE)
        } else {
            MIN_IDLE
        }
    }
}

fn progress(t: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (t / duration).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Left and right eye, blinking independently.
pub struct EyePair {
    pub left: BlinkMachine,
    pub right: BlinkMachine,
}

impl EyePair {
    pub fn new(timing: BlinkTiming, seed: u64) -> Self {
        Self {
            left: BlinkMachine::new(timing, seed),
            right: BlinkMachine::new(timing, seed.wrapping_add(0x9e37_79b9_7f4a_7c15)),
        }
    }

    pub fn from_config(config: &EyeConfig) -> Self {
        Self::new(BlinkTiming::from(config), config.seed)
    }

    pub fn tick(&mut self, dt: f64) {
        self.left.tick(dt);
        self.right.tick(dt);
    }

    /// `(left, right)` openness.
    pub fn openness(&self) -> (f64, f64) {
        (self.left.openness(), self.right.openness())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> BlinkTiming {
        BlinkTiming {
            min_interval: 1.0,
            max_interval: 2.0,
            close_duration: 0.1,
            open_duration: 0.2,
        }
    }

    fn idle_remaining(machine: &BlinkMachine) -> f64 {
        match machine.phase() {
            BlinkPhase::Idle { remaining } => remaining,
            other => panic!("expected idle, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_idle_within_interval() {
        let machine = BlinkMachine::new(timing(), 7);
        let remaining = idle_remaining(&machine);
        assert!((1.0..=2.0).contains(&remaining), "remaining = {remaining}");
        assert_eq!(machine.openness(), 1.0);
    }

    #[test]
    fn test_full_cycle_returns_to_idle() {
        let mut machine = BlinkMachine::new(timing(), 7);
        let wait = idle_remaining(&machine);

        machine.tick(wait + 0.05);
        assert!(matches!(machine.phase(), BlinkPhase::Closing { .. }));
        assert!((machine.openness() - 0.5).abs() < 1e-9);

        machine.tick(0.1);
        assert!(matches!(machine.phase(), BlinkPhase::Opening { .. }));
        assert!((machine.openness() - 0.25).abs() < 1e-9);

        machine.tick(0.2);
        assert!(matches!(machine.phase(), BlinkPhase::Idle { .. }));
        assert_eq!(machine.openness(), 1.0);
    }

    #[test]
    fn test_large_step_carries_over() {
        let mut machine = BlinkMachine::new(timing(), 3);
        let wait = idle_remaining(&machine);
        // Whole blink plus a bit of the next idle period in one step.
        machine.tick(wait + 0.3 + 0.01);
        assert!(matches!(machine.phase(), BlinkPhase::Idle { .. }));
    }

    #[test]
    fn test_trigger_only_from_idle() {
        let mut machine = BlinkMachine::new(timing(), 1);
        assert!(machine.trigger());
        assert!(!machine.trigger());
        assert_eq!(machine.openness(), 1.0);
        machine.tick(0.1);
        assert!(matches!(machine.phase(), BlinkPhase::Opening { .. }));
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let mut a = BlinkMachine::new(timing(), 42);
        let mut b = BlinkMachine::new(timing(), 42);
        for _ in 0..600 {
            a.tick(1.0 / 60.0);
            b.tick(1.0 / 60.0);
            assert_eq!(a.phase(), b.phase());
        }
    }

    #[test]
    fn test_zero_durations_do_not_hang() {
        let timing = BlinkTiming {
            min_interval: 0.0,
            max_interval: 0.0,
            close_duration: 0.0,
            open_duration: 0.0,
        };
        let mut machine = BlinkMachine::new(timing, 9);
        machine.tick(1.0);
        assert!((0.0..=1.0).contains(&machine.openness()));
    }

    #[test]
    fn test_non_finite_step_is_ignored() {
        let mut machine = BlinkMachine::new(timing(), 11);
        let before = machine.phase();
        machine.tick(f64::INFINITY);
        machine.tick(f64::NEG_INFINITY);
        machine.tick(f64::NAN);
        assert_eq!(machine.phase(), before);
    }

    #[test]
    fn test_huge_step_returns() {
        let mut machine = BlinkMachine::new(timing(), 12);
        machine.tick(1e15);
        assert!((0.0..=1.0).contains(&machine.openness()));
        machine.tick(f64::MAX);
        assert!((0.0..=1.0).contains(&machine.openness()));
    }

    #[test]
    fn test_eyes_blink_independently() {
        let mut eyes = EyePair::new(timing(), 5);
        let mut differed = false;
        for _ in 0..1200 {
            eyes.tick(1.0 / 60.0);
            let (l, r) = eyes.openness();
            if (l - r).abs() > 1e-9 {
                differed = true;
            }
        }
        assert!(differed);
    }

    #[test]
    fn test_from_config() {
        let config = EyeConfig::default();
        let timing = BlinkTiming::from(&config);
        assert_eq!(timing.close_duration, config.close_duration);
        let eyes = EyePair::from_config(&config);
        assert_eq!(eyes.openness(), (1.0, 1.0));
    }
}
