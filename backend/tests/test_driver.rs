//! Tests for the tokio real-time driver (virtual time)

use hospital_simulator_core_rs::driver::SimulationDriver;
use hospital_simulator_core_rs::{EngineConfig, PatientPriority, SimulationEngine, StaffRole};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn quiet_engine(speed: f64) -> SimulationEngine {
    let config = EngineConfig {
        arrival_rate_per_hour: 0.0,
        simulation_speed: speed,
        ..Default::default()
    };
    SimulationEngine::new(config).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_driver_advances_simulated_time() {
    let mut driver = SimulationDriver::new(quiet_engine(2.0));
    driver.start().await;

    tokio::time::sleep(Duration::from_millis(2_600)).await;

    let time = driver.engine().lock().await.current_time();
    assert!((4.0..=6.0).contains(&time), "simulated time {}", time);
    driver.pause().await;
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticking() {
    let mut driver = SimulationDriver::new(quiet_engine(1.0));
    driver.start().await;
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    driver.pause().await;
    assert!(!driver.is_ticking());
    let engine = driver.engine();
    let frozen = engine.lock().await.current_time();
    assert!(frozen > 0.0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(engine.lock().await.current_time(), frozen);
    assert!(!engine.lock().await.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_double_start_runs_one_loop() {
    let mut driver = SimulationDriver::new(quiet_engine(1.0));
    driver.start().await;
    driver.start().await;

    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let ticks = driver.engine().lock().await.tick_count();
    assert!((2..=4).contains(&ticks), "ticks {}", ticks);
    driver.pause().await;
}

#[tokio::test(start_paused = true)]
async fn test_resume_does_not_count_paused_time() {
    let mut driver = SimulationDriver::new(quiet_engine(1.0));
    driver.start().await;
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    driver.pause().await;
    let paused_at = driver.engine().lock().await.current_time();

    tokio::time::sleep(Duration::from_secs(60)).await;
    driver.start().await;
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    driver.pause().await;

    let resumed = driver.engine().lock().await.current_time();
    assert!(resumed - paused_at <= 2.0, "jumped {}", resumed - paused_at);
}

#[tokio::test(start_paused = true)]
async fn test_handle_pause_does_not_leak_into_next_tick() {
    let mut driver = SimulationDriver::new(quiet_engine(1.0));
    let handle = driver.engine();
    driver.start().await;
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    handle.lock().await.pause();
    let paused_at = handle.lock().await.current_time();
    tokio::time::sleep(Duration::from_millis(800)).await;
    handle.lock().await.start();
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    // only one real second has run since the restart
    let after = handle.lock().await.current_time();
    assert!(after - paused_at <= 1.0 + 1e-9, "advanced {}", after - paused_at);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    let later = handle.lock().await.current_time();
    assert!(later - paused_at >= 1.0, "stalled at {}", later);
    driver.pause().await;
}

#[tokio::test(start_paused = true)]
async fn test_handle_restart_after_long_pause_keeps_ticking() {
    let mut driver = SimulationDriver::new(quiet_engine(1.0));
    let handle = driver.engine();
    driver.start().await;
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    handle.lock().await.pause();
    let paused_at = handle.lock().await.current_time();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(driver.is_ticking());
    assert_eq!(handle.lock().await.current_time(), paused_at);

    handle.lock().await.start();
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let engine = handle.lock().await;
    assert!(engine.is_running());
    assert!(engine.current_time() > paused_at, "frozen at {}", paused_at);
    drop(engine);
    driver.pause().await;
}

#[tokio::test(start_paused = true)]
async fn test_observers_see_driver_ticks() {
    let mut driver = SimulationDriver::new(quiet_engine(1.0));
    let ticks = Arc::new(AtomicUsize::new(0));
    {
        let engine = driver.engine();
        let mut engine = engine.lock().await;
        engine.add_staff(StaffRole::Receptionist, 1);
        engine.manually_add_patient(PatientPriority::Urgent);
        let ticks = Arc::clone(&ticks);
        engine.subscribe(move |snapshot| {
            if snapshot.is_running {
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        });
    }

    driver.start().await;
    tokio::time::sleep(Duration::from_millis(3_500)).await;
    driver.pause().await;

    // start notification plus one per tick
    assert!(ticks.load(Ordering::SeqCst) >= 3);
    let engine = driver.engine();
    let engine = engine.lock().await;
    assert_eq!(engine.stats().staff_utilization.receptionist, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_speed_change_shortens_period() {
    let driver = SimulationDriver::new(quiet_engine(1.0));
    driver.set_simulation_speed(5.0).await.unwrap();
    assert_eq!(
        driver.engine().lock().await.tick_period(),
        Duration::from_millis(200)
    );
    assert!(driver.set_simulation_speed(0.1).await.is_err());

    let engine = driver.shutdown().await;
    assert!(!engine.lock().await.is_running());
}
