//! Service stages of the treatment pipeline
//!
//! Each stage ties together the role that serves it, the status patients
//! queue in, the status while served, and the status reached once done.

use crate::models::patient::PatientStatus;
use crate::models::staff::StaffRole;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Registration,
    Nursing,
    Treatment,
}

impl Stage {
    /// Stages in pipeline order; the engine processes them in this order
    pub const ALL: [Stage; 3] = [Stage::Registration, Stage::Nursing, Stage::Treatment];

    pub fn required_role(self) -> StaffRole {
        match self {
            Stage::Registration => StaffRole::Receptionist,
            Stage::Nursing => StaffRole::Nurse,
            Stage::Treatment => StaffRole::Doctor,
        }
    }

    pub fn waiting_status(self) -> PatientStatus {
        match self {
            Stage::Registration => PatientStatus::Waiting,
            Stage::Nursing => PatientStatus::WaitingForNurse,
            Stage::Treatment => PatientStatus::WaitingForDoctor,
        }
    }

    pub fn service_status(self) -> PatientStatus {
        match self {
            Stage::Registration => PatientStatus::WithReceptionist,
            Stage::Nursing => PatientStatus::WithNurse,
            Stage::Treatment => PatientStatus::WithDoctor,
        }
    }

    /// Status reached when service ends
    pub fn completed_status(self) -> PatientStatus {
        match self {
            Stage::Registration => PatientStatus::WaitingForNurse,
            Stage::Nursing => PatientStatus::WaitingForDoctor,
            Stage::Treatment => PatientStatus::Treated,
        }
    }

    /// Stage served by `role`
    pub fn for_role(role: StaffRole) -> Stage {
        match role {
            StaffRole::Receptionist => Stage::Registration,
            StaffRole::Nurse => Stage::Nursing,
            StaffRole::Doctor => Stage::Treatment,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Registration => "registration",
            Stage::Nursing => "nursing",
            Stage::Treatment => "treatment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_statuses_chain_through_pipeline() {
        let mut status = PatientStatus::Waiting;
        for stage in Stage::ALL {
            assert_eq!(stage.waiting_status(), status);
            assert_eq!(status.next(), Some(stage.service_status()));
            assert_eq!(stage.service_status().next(), Some(stage.completed_status()));
            status = stage.completed_status();
        }
        assert_eq!(status, PatientStatus::Treated);
    }

    #[test]
    fn test_role_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::for_role(stage.required_role()), stage);
        }
    }
}
