//! Engine snapshots
//!
//! An [`EngineSnapshot`] is an owned copy of everything an observer or UI
//! needs to render the department at one instant. It never aliases engine
//! state and serializes to JSON as-is.

use crate::core::SimTime;
use crate::models::patient::{Patient, PatientStatus};
use crate::models::staff::Staff;
use crate::stats::SimulationStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Simulated seconds since start (or last reset)
    pub current_time: SimTime,

    pub is_running: bool,

    pub arrival_rate_per_hour: f64,

    pub simulation_speed: f64,

    /// Retained patients in arrival order
    pub patients: Vec<Patient>,

    /// Staff in creation order
    pub staff: Vec<Staff>,

    pub stats: SimulationStats,
}

impl EngineSnapshot {
    pub fn patients_with_status(&self, status: PatientStatus) -> impl Iterator<Item = &Patient> {
        self.patients.iter().filter(move |p| p.status() == status)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
