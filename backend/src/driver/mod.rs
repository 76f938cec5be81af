//! Real-time driver
//!
//! Runs the engine on a tokio task with a fixed tick period of `1s / speed`,
//! passing the measured real time since the previous tick to
//! [`SimulationEngine::tick`]. The engine lives behind an
//! `Arc<tokio::sync::Mutex<_>>`; every tick and every command goes through
//! that lock, so observers never see a half-applied tick.
//!
//! Commands may also be issued through [`SimulationDriver::engine`]. The loop
//! stays alive while the engine is paused that way and picks up again after
//! `start()`; real time spent paused is never passed to `tick`.
//!
//! # Example
//!
//! ```rust
//! use hospital_simulator_core_rs::driver::SimulationDriver;
//! use hospital_simulator_core_rs::orchestrator::{EngineConfig, SimulationEngine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = SimulationEngine::new(EngineConfig::default()).unwrap();
//! let mut driver = SimulationDriver::new(engine);
//!
//! driver.start().await;
//! assert!(driver.is_ticking());
//! driver.pause().await;
//! assert!(!driver.engine().lock().await.is_running());
//! # }
//! ```

use crate::orchestrator::{SimulationEngine, SimulationError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

pub struct SimulationDriver {
    engine: Arc<Mutex<SimulationEngine>>,
    task: Option<JoinHandle<()>>,
}

impl SimulationDriver {
    pub fn new(engine: SimulationEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            task: None,
        }
    }

    /// Shared handle for issuing commands and queries
    pub fn engine(&self) -> Arc<Mutex<SimulationEngine>> {
        Arc::clone(&self.engine)
    }

    /// Whether the tick task is alive (it survives pauses made through the
    /// shared handle)
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start the engine and the tick task (no-op if already ticking)
    pub async fn start(&mut self) {
        self.engine.lock().await.start();
        if self.is_ticking() {
            return;
        }

        let engine = Arc::clone(&self.engine);
        self.task = Some(tokio::spawn(run_tick_loop(engine)));
        info!("Tick loop started");
    }

    /// Pause the engine and stop scheduling ticks
    ///
    /// A tick already holding the lock finishes first.
    pub async fn pause(&mut self) {
        self.engine.lock().await.pause();
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Tick loop stopped");
        }
    }

    /// Change the speed; the next sleep already uses the new period
    pub async fn set_simulation_speed(&self, speed: f64) -> Result<(), SimulationError> {
        self.engine.lock().await.set_simulation_speed(speed)
    }

    /// Stop ticking and hand back the engine handle
    pub async fn shutdown(mut self) -> Arc<Mutex<SimulationEngine>> {
        self.pause().await;
        Arc::clone(&self.engine)
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_tick_loop(engine: Arc<Mutex<SimulationEngine>>) {
    let mut last_tick = Instant::now();
    let mut epoch = engine.lock().await.run_epoch();
    loop {
        let period = engine.lock().await.tick_period();
        tokio::time::sleep(period).await;

        let mut guard = engine.lock().await;
        let now = Instant::now();

        // Paused through the shared handle: keep polling, count nothing.
        if !guard.is_running() {
            last_tick = now;
            continue;
        }

        // Restarted since the last tick: the gap was (at least partly) paused.
        if guard.run_epoch() != epoch {
            epoch = guard.run_epoch();
            last_tick = now;
            debug!(epoch, "Engine restarted, re-baselining tick loop");
            continue;
        }

        let real_elapsed = now.duration_since(last_tick);
        last_tick = now;

        if let Err(e) = guard.tick(real_elapsed) {
            error!(error = %e, "Tick failed, pausing simulation");
            guard.pause();
        }
    }
}
