//! Running statistics
//!
//! [`SimulationStats`] is what observers see each tick. Cumulative fields
//! (`treated_patients`, `average_wait_time`, `max_wait_time`) are updated as
//! patients complete; instantaneous fields (`queue_length`,
//! `staff_utilization`, `throughput`) are recomputed from state after every
//! tick.
//!
//! Every ratio with a zero denominator is defined as 0.

pub mod summary;

pub use summary::{
    format_minutes, format_percentage, mean, median, percentile, standard_deviation,
    utilization_rate, StatsError, WaitTimeSummary,
};

use crate::core::{SimTime, SECONDS_PER_HOUR};
use crate::models::staff::StaffRole;
use crate::models::state::SimulationState;
use serde::{Deserialize, Serialize};

/// Busy fraction per role, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffUtilization {
    pub doctor: f64,
    pub nurse: f64,
    pub receptionist: f64,
}

impl StaffUtilization {
    pub fn get(&self, role: StaffRole) -> f64 {
        match role {
            StaffRole::Doctor => self.doctor,
            StaffRole::Nurse => self.nurse,
            StaffRole::Receptionist => self.receptionist,
        }
    }

    pub fn set(&mut self, role: StaffRole, value: f64) {
        match role {
            StaffRole::Doctor => self.doctor = value,
            StaffRole::Nurse => self.nurse = value,
            StaffRole::Receptionist => self.receptionist = value,
        }
    }
}

/// Aggregate statistics for the department
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Patients that ever arrived (evicted ones included)
    pub total_patients: u64,

    pub treated_patients: u64,

    /// Running mean over treated patients, in seconds
    pub average_wait_time: SimTime,

    /// Longest completed wait, in seconds
    pub max_wait_time: SimTime,

    /// Patients in any waiting status
    pub queue_length: usize,

    /// Treated patients per simulated hour
    pub throughput: f64,

    pub staff_utilization: StaffUtilization,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_arrival(&mut self) {
        self.total_patients += 1;
    }

    /// Fold one completed wait into the running mean and max
    pub fn record_treatment(&mut self, wait_time: SimTime) {
        let n = self.treated_patients as f64;
        self.average_wait_time = (self.average_wait_time * n + wait_time) / (n + 1.0);
        self.max_wait_time = self.max_wait_time.max(wait_time);
        self.treated_patients += 1;
    }

    /// Recompute the instantaneous fields from the current state
    pub fn refresh(&mut self, state: &SimulationState, elapsed: SimTime) {
        self.queue_length = state.queue_length();
        self.throughput = throughput(self.treated_patients, elapsed);
        for role in StaffRole::ALL {
            let busy = state.count_busy(role);
            let total = state.count_role(role);
            self.staff_utilization.set(role, utilization(busy, total));
        }
    }
}

/// `busy / total`, 0 for an empty role
pub fn utilization(busy: usize, total: usize) -> f64 {
    utilization_rate(busy as f64, total as f64)
}

/// Treated per simulated hour, 0 before any time has elapsed
pub fn throughput(treated: u64, elapsed: SimTime) -> f64 {
    let hours = elapsed / SECONDS_PER_HOUR;
    if hours <= 0.0 {
        return 0.0;
    }
    treated as f64 / hours
}
