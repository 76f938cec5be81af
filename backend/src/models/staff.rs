//! Staff model
//!
//! A staff member serves one patient at a time. The link to the patient is a
//! bare [`PatientId`]; the engine's patient collection stays the single
//! source of truth.
//!
//! # Critical Invariants
//!
//! 1. `current_patient_id == None` ⇔ idle
//! 2. `busy_until` is only meaningful while a patient is assigned
//! 3. Role never changes after creation

use crate::core::SimTime;
use crate::models::patient::PatientId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Staff identifier, assigned monotonically per engine starting at 1
pub type StaffId = u64;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Doctor,
    Nurse,
    Receptionist,
}

impl StaffRole {
    pub const ALL: [StaffRole; 3] = [StaffRole::Doctor, StaffRole::Nurse, StaffRole::Receptionist];

    pub fn label(self) -> &'static str {
        match self {
            StaffRole::Doctor => "Doctor",
            StaffRole::Nurse => "Nurse",
            StaffRole::Receptionist => "Receptionist",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur during staff assignment
#[derive(Debug, Error, PartialEq)]
pub enum StaffError {
    #[error("Staff {staff_id} is already serving patient {patient_id}")]
    AlreadyAssigned {
        staff_id: StaffId,
        patient_id: PatientId,
    },

    #[error("Service time must be positive and finite, got {0}")]
    InvalidServiceTime(SimTime),
}

/// A member of staff
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::{Staff, StaffRole};
///
/// let mut nurse = Staff::new(1, StaffRole::Nurse);
/// assert!(nurse.is_idle());
///
/// nurse.assign(42, 100.0, 600.0).unwrap();
/// assert_eq!(nurse.busy_until(), 700.0);
/// assert!(!nurse.is_done(699.0));
/// assert!(nurse.is_done(700.0));
///
/// assert_eq!(nurse.release(), Some(42));
/// assert!(nurse.is_idle());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    id: StaffId,
    role: StaffRole,
    current_patient_id: Option<PatientId>,
    /// Simulated deadline of the current service
    busy_until: SimTime,
}

impl Staff {
    pub fn new(id: StaffId, role: StaffRole) -> Self {
        Self {
            id,
            role,
            current_patient_id: None,
            busy_until: 0.0,
        }
    }

    pub fn id(&self) -> StaffId {
        self.id
    }

    pub fn role(&self) -> StaffRole {
        self.role
    }

    pub fn current_patient_id(&self) -> Option<PatientId> {
        self.current_patient_id
    }

    pub fn busy_until(&self) -> SimTime {
        self.busy_until
    }

    pub fn is_idle(&self) -> bool {
        self.current_patient_id.is_none()
    }

    pub fn is_busy(&self) -> bool {
        self.current_patient_id.is_some()
    }

    /// Serving a patient whose deadline has been reached
    pub fn is_done(&self, now: SimTime) -> bool {
        self.current_patient_id.is_some() && now >= self.busy_until
    }

    /// Start serving `patient_id` at `now` for `service_time` seconds
    pub fn assign(
        &mut self,
        patient_id: PatientId,
        now: SimTime,
        service_time: SimTime,
    ) -> Result<(), StaffError> {
        if let Some(current) = self.current_patient_id {
            return Err(StaffError::AlreadyAssigned {
                staff_id: self.id,
                patient_id: current,
            });
        }
        if !(service_time.is_finite() && service_time > 0.0) {
            return Err(StaffError::InvalidServiceTime(service_time));
        }

        self.current_patient_id = Some(patient_id);
        self.busy_until = now + service_time;
        Ok(())
    }

    /// Drop the current patient, returning its id
    pub fn release(&mut self) -> Option<PatientId> {
        self.current_patient_id.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_assignment_rejected() {
        let mut doctor = Staff::new(3, StaffRole::Doctor);
        doctor.assign(1, 0.0, 60.0).unwrap();

        assert_eq!(
            doctor.assign(2, 0.0, 60.0),
            Err(StaffError::AlreadyAssigned {
                staff_id: 3,
                patient_id: 1
            })
        );
        assert_eq!(doctor.current_patient_id(), Some(1));
    }

    #[test]
    fn test_non_positive_service_time_rejected() {
        let mut doctor = Staff::new(3, StaffRole::Doctor);
        assert_eq!(
            doctor.assign(1, 0.0, 0.0),
            Err(StaffError::InvalidServiceTime(0.0))
        );
        assert!(doctor.assign(1, 0.0, -5.0).is_err());
        assert!(doctor.is_idle());
    }

    #[test]
    fn test_release_idle_returns_none() {
        let mut receptionist = Staff::new(1, StaffRole::Receptionist);
        assert_eq!(receptionist.release(), None);
        assert!(!receptionist.is_done(1_000.0));
    }
}
