//! Tests for SimulationClock

use hospital_simulator_core_rs::SimulationClock;
use std::time::Duration;

#[test]
fn test_clock_starts_paused_at_zero() {
    let clock = SimulationClock::new(1.0);
    assert_eq!(clock.current_time(), 0.0);
    assert!(!clock.is_running());
    assert_eq!(clock.tick_count(), 0);
}

#[test]
fn test_advance_scales_by_speed() {
    let mut clock = SimulationClock::new(5.0);
    clock.start();

    assert_eq!(clock.advance(Duration::from_millis(200)), 1.0);
    assert_eq!(clock.advance(Duration::from_secs(2)), 10.0);
    assert_eq!(clock.current_time(), 11.0);
    assert_eq!(clock.tick_count(), 2);
}

#[test]
fn test_paused_clock_does_not_move() {
    let mut clock = SimulationClock::new(1.0);
    clock.start();
    clock.advance(Duration::from_secs(3));
    clock.pause();

    assert_eq!(clock.advance(Duration::from_secs(100)), 0.0);
    assert_eq!(clock.current_time(), 3.0);
    assert_eq!(clock.tick_count(), 1);
}

#[test]
fn test_speed_change_applies_to_later_ticks_only() {
    let mut clock = SimulationClock::new(1.0);
    clock.start();
    clock.advance(Duration::from_secs(10));

    clock.set_speed(2.0);
    assert_eq!(clock.current_time(), 10.0);

    clock.advance(Duration::from_secs(10));
    assert_eq!(clock.current_time(), 30.0);
}

#[test]
fn test_tick_period_is_inverse_speed() {
    assert_eq!(SimulationClock::new(1.0).tick_period(), Duration::from_secs(1));
    assert_eq!(SimulationClock::new(2.0).tick_period(), Duration::from_millis(500));
    assert_eq!(SimulationClock::new(10.0).tick_period(), Duration::from_millis(100));
}

#[test]
fn test_reset_keeps_speed() {
    let mut clock = SimulationClock::new(3.0);
    clock.start();
    clock.advance(Duration::from_secs(4));

    clock.reset();

    assert_eq!(clock.current_time(), 0.0);
    assert_eq!(clock.tick_count(), 0);
    assert!(!clock.is_running());
    assert_eq!(clock.speed(), 3.0);
}

#[test]
fn test_elapsed_hours() {
    let mut clock = SimulationClock::new(10.0);
    clock.start();
    clock.advance(Duration::from_secs(720));
    assert_eq!(clock.elapsed_hours(), 2.0);
}

#[test]
#[should_panic(expected = "speed must be positive and finite")]
fn test_zero_speed_panics() {
    let mut clock = SimulationClock::new(1.0);
    clock.set_speed(0.0);
}
