//! Event logging for simulation inspection.
//!
//! Every significant state change is captured as an [`Event`]:
//! - **Arrival**: a patient enters the department (random or manual)
//! - **Service**: a staff member starts or finishes serving a patient
//! - **Treatment**: a patient leaves the pipeline treated
//! - **Staffing**: staff added or removed
//! - **Housekeeping**: treated patients evicted, engine reset
//!
//! The log is bounded; once full, the oldest events are dropped.
//!
//! # Example
//!
//! ```rust
//! use hospital_simulator_core_rs::models::{Event, EventLog};
//! use hospital_simulator_core_rs::StaffRole;
//!
//! let mut log = EventLog::with_capacity(2);
//! log.log(Event::StaffAdded { time: 0.0, staff_id: 1, role: StaffRole::Doctor });
//! log.log(Event::StaffAdded { time: 0.0, staff_id: 2, role: StaffRole::Nurse });
//! log.log(Event::StaffRemoved { time: 5.0, staff_id: 1, role: StaffRole::Doctor });
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.events_of_type("StaffRemoved").len(), 1);
//! ```

use crate::core::SimTime;
use crate::models::patient::{PatientId, PatientPriority};
use crate::models::stage::Stage;
use crate::models::staff::{StaffId, StaffRole};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of events retained
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 10_000;

/// Simulation event capturing a state change.
///
/// All events carry the simulated time they occurred at. Events are logged in
/// the order they happen within a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Patient entered the department in `Waiting`
    PatientArrived {
        time: SimTime,
        patient_id: PatientId,
        priority: PatientPriority,
        manual: bool,
    },

    /// Staff member started serving a patient
    ServiceStarted {
        time: SimTime,
        patient_id: PatientId,
        staff_id: StaffId,
        stage: Stage,
        service_time: SimTime,
        busy_until: SimTime,
    },

    /// Staff member reached the service deadline and was released
    ServiceCompleted {
        time: SimTime,
        patient_id: PatientId,
        staff_id: StaffId,
        stage: Stage,
    },

    /// Patient finished the doctor stage
    PatientTreated {
        time: SimTime,
        patient_id: PatientId,
        wait_time: SimTime,
    },

    StaffAdded {
        time: SimTime,
        staff_id: StaffId,
        role: StaffRole,
    },

    StaffRemoved {
        time: SimTime,
        staff_id: StaffId,
        role: StaffRole,
    },

    /// Treated patients dropped from the retention window
    PatientsEvicted {
        time: SimTime,
        patient_ids: Vec<PatientId>,
    },

    /// Engine state cleared; always the first event after a reset
    SimulationReset { time: SimTime },
}

impl Event {
    /// Simulated time the event occurred at
    pub fn time(&self) -> SimTime {
        match self {
            Event::PatientArrived { time, .. }
            | Event::ServiceStarted { time, .. }
            | Event::ServiceCompleted { time, .. }
            | Event::PatientTreated { time, .. }
            | Event::StaffAdded { time, .. }
            | Event::StaffRemoved { time, .. }
            | Event::PatientsEvicted { time, .. }
            | Event::SimulationReset { time } => *time,
        }
    }

    /// Variant name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PatientArrived { .. } => "PatientArrived",
            Event::ServiceStarted { .. } => "ServiceStarted",
            Event::ServiceCompleted { .. } => "ServiceCompleted",
            Event::PatientTreated { .. } => "PatientTreated",
            Event::StaffAdded { .. } => "StaffAdded",
            Event::StaffRemoved { .. } => "StaffRemoved",
            Event::PatientsEvicted { .. } => "PatientsEvicted",
            Event::SimulationReset { .. } => "SimulationReset",
        }
    }

    /// Patient the event concerns, if any
    pub fn patient_id(&self) -> Option<PatientId> {
        match self {
            Event::PatientArrived { patient_id, .. }
            | Event::ServiceStarted { patient_id, .. }
            | Event::ServiceCompleted { patient_id, .. }
            | Event::PatientTreated { patient_id, .. } => Some(*patient_id),
            _ => None,
        }
    }
}

/// Bounded, append-only log of events
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
    /// Events dropped because the log was full
    dropped: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// # Panics
    /// Panics if `capacity` is zero
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event log capacity must be positive");
        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    pub fn log(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Events from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// All retained events about one patient, oldest first
    pub fn events_for_patient(&self, patient_id: PatientId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.patient_id() == Some(patient_id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
