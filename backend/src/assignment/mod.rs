//! Stage assignment engine
//!
//! Each pipeline stage pairs waiting patients with idle staff of the stage's
//! role. A stage is processed in two phases:
//!
//! 1. **Release**: staff whose deadline has passed let go of their patient,
//!    who moves to the stage's completed status (or `Treated` for the doctor
//!    stage)
//! 2. **Assign**: waiting patients are ordered by triage and greedily matched
//!    to idle staff in creation order
//!
//! # Critical Invariants
//!
//! - **Triage order**: CRITICAL before URGENT before STANDARD, then earliest
//!   arrival, then lowest id
//! - **One at a time**: a staff member serves at most one patient and a
//!   patient is served by at most one staff member
//! - **No skipping**: a patient only enters a stage from its waiting status
//!   and only leaves it through release

pub mod service_time;

use crate::core::SimTime;
use crate::models::patient::{Patient, PatientError, PatientId, PatientPriority, PatientStatus};
use crate::models::stage::Stage;
use crate::models::staff::{StaffError, StaffId};
use crate::models::state::SimulationState;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

pub use service_time::{MinuteRange, PerPriority, PerStage, ServiceTimeModel, MIN_SERVICE_SECONDS};

/// Errors raised when the state breaks an assignment invariant
#[derive(Debug, Error, PartialEq)]
pub enum AssignmentError {
    #[error("Patient {0} not found")]
    PatientNotFound(PatientId),

    #[error("Staff {0} not found")]
    StaffNotFound(StaffId),

    #[error("Staff {staff_id} holds unknown patient {patient_id}")]
    DanglingAssignment {
        staff_id: StaffId,
        patient_id: PatientId,
    },

    #[error("Patient {patient_id} is {found:?}, expected {expected:?}")]
    StatusMismatch {
        patient_id: PatientId,
        expected: PatientStatus,
        found: PatientStatus,
    },

    #[error("Patient error: {0}")]
    PatientError(#[from] PatientError),

    #[error("Staff error: {0}")]
    StaffError(#[from] StaffError),
}

/// A staff member finished serving a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub stage: Stage,
    pub staff_id: StaffId,
    pub patient_id: PatientId,
    /// Total wait, set only when the patient left the pipeline treated
    pub wait_time: Option<SimTime>,
}

/// A patient was paired with a staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub stage: Stage,
    pub staff_id: StaffId,
    pub patient_id: PatientId,
    pub service_time: SimTime,
    pub busy_until: SimTime,
}

/// Everything that happened in one stage during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutcome {
    pub completions: Vec<Completion>,
    pub assignments: Vec<Assignment>,
}

/// Triage ordering of two patients
///
/// Lower priority ordinal first, then earlier arrival, then lower id.
pub fn triage_cmp(a: &Patient, b: &Patient) -> Ordering {
    a.priority()
        .cmp(&b.priority())
        .then_with(|| a.arrival_time().total_cmp(&b.arrival_time()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Ids of patients waiting for `stage`, in triage order
pub fn waiting_in_triage_order(state: &SimulationState, stage: Stage) -> Vec<PatientId> {
    let waiting = stage.waiting_status();
    let mut candidates: Vec<&Patient> = state
        .patients
        .values()
        .filter(|p| p.status() == waiting)
        .collect();
    candidates.sort_by(|a, b| triage_cmp(a, b));
    candidates.into_iter().map(|p| p.id()).collect()
}

/// Release every staff member of the stage's role whose deadline has passed
///
/// The served patient is validated before the staff member is released, so an
/// error leaves both untouched.
pub fn release_finished(
    state: &mut SimulationState,
    stage: Stage,
    now: SimTime,
) -> Result<Vec<Completion>, AssignmentError> {
    let role = stage.required_role();
    let finished: Vec<(StaffId, PatientId)> = state
        .staff
        .values()
        .filter(|s| s.role() == role && s.is_done(now))
        .filter_map(|s| s.current_patient_id().map(|pid| (s.id(), pid)))
        .collect();

    let mut completions = Vec::with_capacity(finished.len());
    for (staff_id, patient_id) in finished {
        let patient = state
            .patients
            .get_mut(&patient_id)
            .ok_or(AssignmentError::DanglingAssignment {
                staff_id,
                patient_id,
            })?;

        if patient.status() != stage.service_status() {
            return Err(AssignmentError::StatusMismatch {
                patient_id,
                expected: stage.service_status(),
                found: patient.status(),
            });
        }

        let wait_time = match stage {
            Stage::Treatment => Some(patient.complete(now)?),
            _ => {
                patient.advance(stage.completed_status())?;
                None
            }
        };

        if let Some(staff) = state.staff.get_mut(&staff_id) {
            staff.release();
        }

        debug!(
            stage = %stage,
            staff_id,
            patient_id,
            time = now,
            "Service completed"
        );

        completions.push(Completion {
            stage,
            staff_id,
            patient_id,
            wait_time,
        });
    }

    Ok(completions)
}

/// Pair waiting patients with idle staff for one stage
///
/// Patients are taken in triage order, staff in creation order. Pairing stops
/// when either side runs out. Each pairing draws one service time.
pub fn assign_waiting<R: RandomSource + ?Sized>(
    state: &mut SimulationState,
    stage: Stage,
    now: SimTime,
    service_times: &ServiceTimeModel,
    rng: &mut R,
) -> Result<Vec<Assignment>, AssignmentError> {
    let candidates = waiting_in_triage_order(state, stage);
    let idle = state.idle_staff(stage.required_role());

    let mut assignments = Vec::with_capacity(candidates.len().min(idle.len()));
    for (patient_id, staff_id) in candidates.into_iter().zip(idle) {
        let priority = check_pairing(state, stage, patient_id, staff_id)?;
        let service_time = service_times.sample(stage, priority, rng);

        let patient = state
            .patients
            .get_mut(&patient_id)
            .ok_or(AssignmentError::PatientNotFound(patient_id))?;
        let staff = state
            .staff
            .get_mut(&staff_id)
            .ok_or(AssignmentError::StaffNotFound(staff_id))?;

        staff.assign(patient_id, now, service_time)?;
        if let Err(e) = patient.advance(stage.service_status()) {
            staff.release();
            return Err(e.into());
        }

        debug!(
            stage = %stage,
            staff_id,
            patient_id,
            priority = %patient.priority(),
            service_time,
            "Service started"
        );

        assignments.push(Assignment {
            stage,
            staff_id,
            patient_id,
            service_time,
            busy_until: staff.busy_until(),
        });
    }

    Ok(assignments)
}

/// Verify a pairing can start before anything is drawn or mutated
///
/// Returns the patient's priority for the service-time draw.
fn check_pairing(
    state: &SimulationState,
    stage: Stage,
    patient_id: PatientId,
    staff_id: StaffId,
) -> Result<PatientPriority, AssignmentError> {
    let patient = state
        .get_patient(patient_id)
        .ok_or(AssignmentError::PatientNotFound(patient_id))?;
    if patient.status() != stage.waiting_status() {
        return Err(AssignmentError::StatusMismatch {
            patient_id,
            expected: stage.waiting_status(),
            found: patient.status(),
        });
    }

    let staff = state
        .get_staff(staff_id)
        .ok_or(AssignmentError::StaffNotFound(staff_id))?;
    if let Some(current) = staff.current_patient_id() {
        return Err(StaffError::AlreadyAssigned {
            staff_id,
            patient_id: current,
        }
        .into());
    }

    Ok(patient.priority())
}

/// Release then assign for one stage
pub fn process_stage<R: RandomSource + ?Sized>(
    state: &mut SimulationState,
    stage: Stage,
    now: SimTime,
    service_times: &ServiceTimeModel,
    rng: &mut R,
) -> Result<StageOutcome, AssignmentError> {
    let completions = release_finished(state, stage, now)?;
    let assignments = assign_waiting(state, stage, now, service_times, rng)?;
    Ok(StageOutcome {
        completions,
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::PatientPriority;
    use crate::models::staff::{Staff, StaffRole};
    use crate::rng::SequenceSource;

    fn state_with(
        staff: &[(StaffId, StaffRole)],
        patients: &[(PatientId, PatientPriority, f64)],
    ) -> SimulationState {
        let mut state = SimulationState::new();
        for &(id, role) in staff {
            state.add_staff(Staff::new(id, role));
        }
        for &(id, priority, arrival) in patients {
            state.add_patient(Patient::new(id, priority, arrival, "Cough"));
        }
        state
    }

    #[test]
    fn test_triage_order_priority_then_arrival_then_id() {
        let state = state_with(
            &[],
            &[
                (1, PatientPriority::Standard, 0.0),
                (2, PatientPriority::Urgent, 10.0),
                (3, PatientPriority::Critical, 20.0),
                (4, PatientPriority::Urgent, 5.0),
                (5, PatientPriority::Urgent, 5.0),
            ],
        );

        assert_eq!(
            waiting_in_triage_order(&state, Stage::Registration),
            vec![3, 4, 5, 2, 1]
        );
    }

    #[test]
    fn test_assign_stops_at_fewer_side() {
        let mut state = state_with(
            &[(10, StaffRole::Receptionist)],
            &[
                (1, PatientPriority::Standard, 0.0),
                (2, PatientPriority::Standard, 1.0),
            ],
        );
        let mut rng = SequenceSource::constant(0.5);

        let assignments = assign_waiting(
            &mut state,
            Stage::Registration,
            0.0,
            &ServiceTimeModel::default(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].patient_id, 1);
        assert_eq!(assignments[0].staff_id, 10);
        assert_eq!(
            state.get_patient(1).unwrap().status(),
            PatientStatus::WithReceptionist
        );
        assert_eq!(state.get_patient(2).unwrap().status(), PatientStatus::Waiting);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_release_respects_deadline() {
        let mut state = state_with(
            &[(10, StaffRole::Receptionist)],
            &[(1, PatientPriority::Standard, 0.0)],
        );
        let mut rng = SequenceSource::constant(0.0);
        let model = ServiceTimeModel::default();

        // standard registration at u = 0 → 240s
        assign_waiting(&mut state, Stage::Registration, 0.0, &model, &mut rng).unwrap();

        assert!(release_finished(&mut state, Stage::Registration, 239.0)
            .unwrap()
            .is_empty());

        let completions = release_finished(&mut state, Stage::Registration, 240.0).unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].wait_time, None);
        assert_eq!(
            state.get_patient(1).unwrap().status(),
            PatientStatus::WaitingForNurse
        );
        assert!(state.get_staff(10).unwrap().is_idle());
    }

    #[test]
    fn test_treatment_release_completes_patient() {
        let mut state = state_with(
            &[(10, StaffRole::Doctor)],
            &[(1, PatientPriority::Critical, 30.0)],
        );
        let patient = state.get_patient_mut(1).unwrap();
        for status in &PatientStatus::ALL[1..5] {
            patient.advance(*status).unwrap();
        }
        let mut rng = SequenceSource::constant(0.0);

        let outcome = process_stage(
            &mut state,
            Stage::Treatment,
            100.0,
            &ServiceTimeModel::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].busy_until, 100.0 + 1200.0);

        let outcome = process_stage(
            &mut state,
            Stage::Treatment,
            1300.0,
            &ServiceTimeModel::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(outcome.completions[0].wait_time, Some(1270.0));
        assert!(state.get_patient(1).unwrap().is_treated());
    }

    #[test]
    fn test_pairing_checked_before_any_mutation() {
        let mut state = state_with(
            &[(10, StaffRole::Receptionist), (11, StaffRole::Receptionist)],
            &[
                (1, PatientPriority::Urgent, 0.0),
                (2, PatientPriority::Urgent, 0.0),
            ],
        );
        state.staff.get_mut(&10).unwrap().assign(2, 0.0, 60.0).unwrap();
        state.get_patient_mut(2).unwrap().advance(PatientStatus::WithReceptionist).unwrap();

        assert_eq!(
            check_pairing(&state, Stage::Registration, 1, 10),
            Err(AssignmentError::StaffError(StaffError::AlreadyAssigned {
                staff_id: 10,
                patient_id: 2
            }))
        );
        assert_eq!(
            check_pairing(&state, Stage::Registration, 1, 42),
            Err(AssignmentError::StaffNotFound(42))
        );
        assert_eq!(
            check_pairing(&state, Stage::Registration, 2, 11),
            Err(AssignmentError::StatusMismatch {
                patient_id: 2,
                expected: PatientStatus::Waiting,
                found: PatientStatus::WithReceptionist,
            })
        );
        assert_eq!(
            check_pairing(&state, Stage::Registration, 1, 11),
            Ok(PatientPriority::Urgent)
        );

        // failed checks left both sides untouched
        assert!(state.get_staff(11).unwrap().is_idle());
        assert_eq!(state.get_patient(1).unwrap().status(), PatientStatus::Waiting);
    }

    #[test]
    fn test_dangling_assignment_reported() {
        let mut state = state_with(&[(10, StaffRole::Nurse)], &[]);
        state.staff.get_mut(&10).unwrap().assign(99, 0.0, 5.0).unwrap();

        assert_eq!(
            release_finished(&mut state, Stage::Nursing, 10.0),
            Err(AssignmentError::DanglingAssignment {
                staff_id: 10,
                patient_id: 99
            })
        );
        assert!(state.get_staff(10).unwrap().is_busy());
    }
}
