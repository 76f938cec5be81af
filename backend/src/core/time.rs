//! Time management for the simulation
//!
//! Simulated time is a continuous number of seconds starting at zero.
//! Each tick converts a real elapsed duration into simulated seconds using the
//! current speed multiplier. Staff deadlines live in simulated time, so
//! changing the speed never moves an already-scheduled completion.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Simulated time in seconds since the engine was created (or last reset)
pub type SimTime = f64;

/// Seconds in one simulated hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Advances simulated time while running, scaled by a speed multiplier
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::SimulationClock;
/// use std::time::Duration;
///
/// let mut clock = SimulationClock::new(2.0);
/// assert_eq!(clock.current_time(), 0.0);
///
/// // Paused clocks do not move
/// assert_eq!(clock.advance(Duration::from_secs(1)), 0.0);
///
/// clock.start();
/// assert_eq!(clock.advance(Duration::from_secs(1)), 2.0);
/// assert_eq!(clock.current_time(), 2.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Simulated seconds elapsed since start
    current_time: SimTime,
    /// Simulated seconds per real second
    speed: f64,
    /// Whether ticks are currently being processed
    running: bool,
    /// Number of ticks processed since start
    tick_count: u64,
    /// Bumped on every paused → running transition, never reset
    #[serde(default)]
    run_epoch: u64,
}

impl SimulationClock {
    /// Create a paused clock at time zero
    ///
    /// # Panics
    /// Panics if `speed` is not a positive finite number
    pub fn new(speed: f64) -> Self {
        assert!(
            speed.is_finite() && speed > 0.0,
            "speed must be positive and finite"
        );
        Self {
            current_time: 0.0,
            speed,
            running: false,
            tick_count: 0,
            run_epoch: 0,
        }
    }

    /// Advance time by `real_elapsed × speed`
    ///
    /// Returns the simulated seconds that elapsed. A paused clock returns 0
    /// and does not count the tick.
    pub fn advance(&mut self, real_elapsed: Duration) -> SimTime {
        if !self.running {
            return 0.0;
        }

        let delta = real_elapsed.as_secs_f64() * self.speed;
        self.current_time += delta;
        self.tick_count += 1;
        delta
    }

    /// Current simulated time (seconds)
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Simulated hours elapsed since start
    pub fn elapsed_hours(&self) -> f64 {
        self.current_time / SECONDS_PER_HOUR
    }

    /// Current speed multiplier
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Change the speed multiplier; applies from the next tick on
    ///
    /// # Panics
    /// Panics if `speed` is not a positive finite number
    pub fn set_speed(&mut self, speed: f64) {
        assert!(
            speed.is_finite() && speed > 0.0,
            "speed must be positive and finite"
        );
        self.speed = speed;
    }

    /// Real time between ticks for a fixed-interval driver (`1s / speed`)
    ///
    /// # Example
    /// ```
    /// use hospital_simulator_core_rs::SimulationClock;
    /// use std::time::Duration;
    ///
    /// let clock = SimulationClock::new(4.0);
    /// assert_eq!(clock.tick_period(), Duration::from_millis(250));
    /// ```
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.speed)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.run_epoch += 1;
        }
    }

    /// Number of times the clock has been started
    ///
    /// A driver that sees this change between two ticks knows the clock was
    /// paused in between and must not count the gap as elapsed time.
    pub fn run_epoch(&self) -> u64 {
        self.run_epoch
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Number of ticks processed since start
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Back to time zero, paused. The speed setting is kept.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.tick_count = 0;
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "speed must be positive and finite")]
    fn test_zero_speed_panics() {
        SimulationClock::new(0.0);
    }

    #[test]
    #[should_panic(expected = "speed must be positive and finite")]
    fn test_nan_speed_panics() {
        let mut clock = SimulationClock::new(1.0);
        clock.set_speed(f64::NAN);
    }

    #[test]
    fn test_reset_keeps_speed() {
        let mut clock = SimulationClock::new(3.0);
        clock.start();
        clock.advance(Duration::from_secs(10));
        clock.reset();

        assert_eq!(clock.current_time(), 0.0);
        assert_eq!(clock.tick_count(), 0);
        assert!(!clock.is_running());
        assert_eq!(clock.speed(), 3.0);
    }

    #[test]
    fn test_run_epoch_counts_restarts_only() {
        let mut clock = SimulationClock::new(1.0);
        assert_eq!(clock.run_epoch(), 0);

        clock.start();
        clock.start();
        assert_eq!(clock.run_epoch(), 1);

        clock.pause();
        clock.reset();
        clock.start();
        assert_eq!(clock.run_epoch(), 2);
    }
}
