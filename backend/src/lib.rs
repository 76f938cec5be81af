//! Hospital Simulator Core - Rust Engine
//!
//! Emergency department queue simulation with deterministic execution.
//! Patients arrive at random, pass through registration, nursing and doctor
//! treatment, and compete for staff by triage priority.
//!
//! # Architecture
//!
//! - **core**: Simulated time and speed scaling
//! - **models**: Domain types (Patient, Staff, Stage, State, Event)
//! - **arrivals**: Poisson arrivals and distribution helpers
//! - **assignment**: Per-stage release and triage matching, service times
//! - **stats**: Running statistics and descriptive helpers
//! - **notify**: Observer registry
//! - **orchestrator**: Engine, configuration and tick loop
//! - **driver**: Real-time tokio driver
//! - **rng**: Injectable random sources
//!
//! # Critical Invariants
//!
//! 1. Patient status only moves forward, one step at a time
//! 2. A staff member serves at most one patient, a patient at most one staff member
//! 3. All randomness flows through one injected source (seeded by default)

// Module declarations
pub mod arrivals;
pub mod assignment;
pub mod core;
pub mod driver;
pub mod models;
pub mod notify;
pub mod orchestrator;
pub mod rng;
pub mod stats;

// Re-exports for convenience
pub use arrivals::{ArrivalGenerator, PriorityMix};
pub use assignment::{AssignmentError, ServiceTimeModel};
pub use crate::core::{SimTime, SimulationClock, SECONDS_PER_HOUR};
pub use models::{
    event::{Event, EventLog},
    patient::{Patient, PatientError, PatientId, PatientPriority, PatientStatus},
    stage::Stage,
    staff::{Staff, StaffError, StaffId, StaffRole},
    state::SimulationState,
};
pub use notify::SubscriptionId;
pub use orchestrator::{
    EngineConfig, EngineSnapshot, SimulationEngine, SimulationError, StaffHeadcount, TickResult,
};
pub use rng::{RandomSource, RngManager, SequenceSource};
pub use stats::{SimulationStats, StaffUtilization, StatsError, WaitTimeSummary};
