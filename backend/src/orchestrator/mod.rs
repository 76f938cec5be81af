//! Orchestrator - owns the department and runs the tick loop
//!
//! See `engine.rs` for the tick loop and command surface.

pub mod config;
pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use config::{EngineConfig, StaffHeadcount, ARRIVAL_RATE_RANGE, SPEED_RANGE};
pub use engine::{SimulationEngine, SimulationError, TickResult};
pub use snapshot::EngineSnapshot;
