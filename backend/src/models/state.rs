//! Simulation State
//!
//! The world owned by the engine: every patient still retained and every
//! staff member on shift.
//!
//! # Critical Invariants
//!
//! 1. **Arrival order**: patients are keyed by their monotonically assigned
//!    id, so iteration order is arrival order (never priority order)
//! 2. **Staff order**: staff are keyed by id, so iteration order is creation
//!    order; this is the fixed order idle staff are matched in
//! 3. **1:1 assignment**: no two staff members hold the same patient id
//! 4. **No dangling links**: every `current_patient_id` names a retained
//!    patient in a service status

use crate::models::patient::{Patient, PatientId, PatientStatus};
use crate::models::staff::{Staff, StaffId, StaffRole};
use std::collections::BTreeMap;

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use hospital_simulator_core_rs::{Patient, PatientPriority, SimulationState, Staff, StaffRole};
///
/// let mut state = SimulationState::new();
/// state.add_staff(Staff::new(1, StaffRole::Receptionist));
/// state.add_patient(Patient::new(1, PatientPriority::Standard, 0.0, "Sprain"));
///
/// assert_eq!(state.num_patients(), 1);
/// assert_eq!(state.queue_length(), 1);
/// assert_eq!(state.count_role(StaffRole::Receptionist), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// Retained patients, keyed (and therefore ordered) by id
    pub(crate) patients: BTreeMap<PatientId, Patient>,

    /// Staff on shift, keyed (and therefore ordered) by id
    pub(crate) staff: BTreeMap<StaffId, Staff>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Patients
    // ========================================================================

    pub fn add_patient(&mut self, patient: Patient) {
        self.patients.insert(patient.id(), patient);
    }

    pub fn get_patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub fn get_patient_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.get_mut(&id)
    }

    /// Patients in arrival order
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn num_patients(&self) -> usize {
        self.patients.len()
    }

    pub fn count_status(&self, status: PatientStatus) -> usize {
        self.patients.values().filter(|p| p.status() == status).count()
    }

    /// Patients in any of the three waiting statuses
    pub fn queue_length(&self) -> usize {
        self.patients
            .values()
            .filter(|p| p.status().is_waiting())
            .count()
    }

    /// Drop the oldest treated patients so at most `retain` remain
    ///
    /// Oldest is by completion time, ties broken by id. Returns the evicted
    /// ids in eviction order.
    pub fn evict_treated(&mut self, retain: usize) -> Vec<PatientId> {
        let mut treated: Vec<(f64, PatientId)> = self
            .patients
            .values()
            .filter_map(|p| p.completion_time().map(|t| (t, p.id())))
            .collect();

        if treated.len() <= retain {
            return Vec::new();
        }

        treated.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let excess = treated.len() - retain;

        treated
            .into_iter()
            .take(excess)
            .map(|(_, id)| {
                self.patients.remove(&id);
                id
            })
            .collect()
    }

    // ========================================================================
    // Staff
    // ========================================================================

    pub fn add_staff(&mut self, staff: Staff) {
        self.staff.insert(staff.id(), staff);
    }

    pub fn get_staff(&self, id: StaffId) -> Option<&Staff> {
        self.staff.get(&id)
    }

    /// Staff in creation order
    pub fn staff(&self) -> impl Iterator<Item = &Staff> {
        self.staff.values()
    }

    pub fn num_staff(&self) -> usize {
        self.staff.len()
    }

    pub fn count_role(&self, role: StaffRole) -> usize {
        self.staff.values().filter(|s| s.role() == role).count()
    }

    pub fn count_busy(&self, role: StaffRole) -> usize {
        self.staff
            .values()
            .filter(|s| s.role() == role && s.is_busy())
            .count()
    }

    /// Ids of idle staff of `role`, in creation order
    pub fn idle_staff(&self, role: StaffRole) -> Vec<StaffId> {
        self.staff
            .values()
            .filter(|s| s.role() == role && s.is_idle())
            .map(|s| s.id())
            .collect()
    }

    /// Remove the first idle staff member of `role`, if any
    pub fn remove_idle_staff(&mut self, role: StaffRole) -> Option<Staff> {
        let id = self.idle_staff(role).into_iter().next()?;
        self.staff.remove(&id)
    }

    /// Staff member currently serving `patient_id`
    pub fn staff_serving(&self, patient_id: PatientId) -> Option<&Staff> {
        self.staff
            .values()
            .find(|s| s.current_patient_id() == Some(patient_id))
    }

    pub fn clear(&mut self) {
        self.patients.clear();
        self.staff.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::PatientPriority;

    fn treated_patient(id: PatientId, completion: f64) -> Patient {
        let mut patient = Patient::new(id, PatientPriority::Standard, 0.0, "Sprain");
        for status in &PatientStatus::ALL[1..6] {
            patient.advance(*status).unwrap();
        }
        patient.complete(completion).unwrap();
        patient
    }

    #[test]
    fn test_evict_oldest_completion_first() {
        let mut state = SimulationState::new();
        state.add_patient(treated_patient(1, 300.0));
        state.add_patient(treated_patient(2, 100.0));
        state.add_patient(treated_patient(3, 200.0));
        state.add_patient(Patient::new(4, PatientPriority::Urgent, 50.0, "High fever"));

        let evicted = state.evict_treated(1);

        assert_eq!(evicted, vec![2, 3]);
        assert!(state.get_patient(1).is_some());
        assert!(state.get_patient(4).is_some(), "untreated patients are never evicted");
    }

    #[test]
    fn test_evict_within_window_is_noop() {
        let mut state = SimulationState::new();
        state.add_patient(treated_patient(1, 10.0));
        assert!(state.evict_treated(100).is_empty());
        assert_eq!(state.num_patients(), 1);
    }

    #[test]
    fn test_remove_idle_staff_skips_busy() {
        let mut state = SimulationState::new();
        let mut busy = Staff::new(1, StaffRole::Nurse);
        busy.assign(9, 0.0, 60.0).unwrap();
        state.add_staff(busy);
        state.add_staff(Staff::new(2, StaffRole::Nurse));

        let removed = state.remove_idle_staff(StaffRole::Nurse).unwrap();
        assert_eq!(removed.id(), 2);
        assert!(state.remove_idle_staff(StaffRole::Nurse).is_none());
        assert_eq!(state.count_role(StaffRole::Nurse), 1);
    }
}
