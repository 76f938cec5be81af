//! Domain models for the department simulator

pub mod event;
pub mod patient;
pub mod stage;
pub mod staff;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use patient::{Patient, PatientError, PatientId, PatientPriority, PatientStatus};
pub use stage::Stage;
pub use staff::{Staff, StaffError, StaffId, StaffRole};
pub use state::SimulationState;
