//! Elapsed-time accumulation for an active session
//!
//! The quiz duration is an authoritative count of whole seconds driven by
//! a once-per-second tick, not a wall-clock sample: the value recorded
//! with a result is exactly the number of ticks that fired while the
//! session was active. The clock starts when play begins, freezes the
//! instant the results phase is reached, and never moves again until a
//! full reset.

use serde::{Deserialize, Serialize};

/// Lifecycle of the elapsed-time counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    /// Not yet started; ticks are ignored
    #[default]
    Idle,
    /// Actively counting; each tick adds one second
    Running,
    /// Permanently stopped; ticks are ignored
    Frozen,
}

/// Whole-second accumulator for the duration of a quiz run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ElapsedClock {
    seconds: u64,
    state: ClockState,
}

impl ElapsedClock {
    /// Starts counting; only meaningful from the idle state
    pub fn start(&mut self) {
        if self.state == ClockState::Idle {
            self.state = ClockState::Running;
        }
    }

    /// Registers one elapsed second
    ///
    /// Returns whether the tick was counted, which is also the signal to
    /// schedule the next one.
    pub fn tick(&mut self) -> bool {
        if self.state == ClockState::Running {
            self.seconds += 1;
            true
        } else {
            false
        }
    }

    /// Stops the counter for good; later ticks are ignored
    pub fn freeze(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Frozen;
        }
    }

    /// Returns the counter to zero in the idle state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The accumulated whole seconds
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Whether the clock is currently counting
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_tick_before_start_is_ignored() {
        let mut clock = ElapsedClock::default();
        assert!(!clock.tick());
        assert_eq!(clock.seconds(), 0);
    }

    #[test]
    fn test_ticks_accumulate_while_running() {
        let mut clock = ElapsedClock::default();
        clock.start();
        assert!(clock.tick());
        assert!(clock.tick());
        assert!(clock.tick());
        assert_eq!(clock.seconds(), 3);
    }

    #[test]
    fn test_freeze_stops_accumulation() {
        let mut clock = ElapsedClock::default();
        clock.start();
        clock.tick();
        clock.freeze();
        assert!(!clock.tick());
        assert_eq!(clock.seconds(), 1);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_start_after_freeze_does_not_resume() {
        let mut clock = ElapsedClock::default();
        clock.start();
        clock.tick();
        clock.freeze();
        clock.start();
        assert!(!clock.tick());
        assert_eq!(clock.seconds(), 1);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut clock = ElapsedClock::default();
        clock.start();
        clock.tick();
        clock.freeze();
        clock.reset();
        assert_eq!(clock.seconds(), 0);
        clock.start();
        assert!(clock.tick());
        assert_eq!(clock.seconds(), 1);
    }
}
