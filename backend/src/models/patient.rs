//! Patient model
//!
//! A patient enters the department in `Waiting` and moves forward one status
//! at a time until `Treated`:
//!
//! ```text
//! Waiting → WithReceptionist → WaitingForNurse → WithNurse
//!         → WaitingForDoctor → WithDoctor → Treated
//! ```
//!
//! # Critical Invariants
//!
//! 1. Status never regresses and never skips a stage
//! 2. `completion_time` is set iff status is `Treated`, exactly once
//! 3. `completion_time >= arrival_time`

use crate::core::SimTime;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Patient identifier, assigned monotonically by the engine starting at 1
pub type PatientId = u64;

/// Triage priority. Lower ordinal = more urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientPriority {
    Critical = 0,
    Urgent = 1,
    Standard = 2,
}

impl PatientPriority {
    pub const ALL: [PatientPriority; 3] = [
        PatientPriority::Critical,
        PatientPriority::Urgent,
        PatientPriority::Standard,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            PatientPriority::Critical => "Critical",
            PatientPriority::Urgent => "Urgent",
            PatientPriority::Standard => "Standard",
        }
    }

    /// Pool of presenting complaints typical for this priority
    pub fn symptom_pool(self) -> &'static [&'static str] {
        match self {
            PatientPriority::Critical => &[
                "Severe chest pain",
                "Stroke symptoms",
                "Major trauma",
                "Difficulty breathing",
                "Unconscious",
                "Severe bleeding",
            ],
            PatientPriority::Urgent => &[
                "Abdominal pain",
                "Moderate trauma",
                "High fever",
                "Dehydration",
                "Persistent vomiting",
                "Minor fractures",
            ],
            PatientPriority::Standard => &[
                "Minor cuts",
                "Cold symptoms",
                "Sore throat",
                "Mild fever",
                "Sprain",
                "Earache",
            ],
        }
    }

    /// Draw a symptom description from this priority's pool
    pub fn sample_symptoms<R: RandomSource + ?Sized>(self, rng: &mut R) -> &'static str {
        let pool = self.symptom_pool();
        let index = ((rng.next_f64() * pool.len() as f64) as usize).min(pool.len() - 1);
        pool[index]
    }
}

impl fmt::Display for PatientPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a patient in the treatment pipeline
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    Waiting,
    WithReceptionist,
    WaitingForNurse,
    WithNurse,
    WaitingForDoctor,
    WithDoctor,
    Treated,
}

impl PatientStatus {
    /// All statuses in pipeline order
    pub const ALL: [PatientStatus; 7] = [
        PatientStatus::Waiting,
        PatientStatus::WithReceptionist,
        PatientStatus::WaitingForNurse,
        PatientStatus::WithNurse,
        PatientStatus::WaitingForDoctor,
        PatientStatus::WithDoctor,
        PatientStatus::Treated,
    ];

    /// The only status this one may advance to (`None` for `Treated`)
    pub fn next(self) -> Option<PatientStatus> {
        match self {
            PatientStatus::Waiting => Some(PatientStatus::WithReceptionist),
            PatientStatus::WithReceptionist => Some(PatientStatus::WaitingForNurse),
            PatientStatus::WaitingForNurse => Some(PatientStatus::WithNurse),
            PatientStatus::WithNurse => Some(PatientStatus::WaitingForDoctor),
            PatientStatus::WaitingForDoctor => Some(PatientStatus::WithDoctor),
            PatientStatus::WithDoctor => Some(PatientStatus::Treated),
            PatientStatus::Treated => None,
        }
    }

    /// Zero-based position in the pipeline
    pub fn index(self) -> usize {
        self as usize
    }

    /// Queued for a stage (counted in `queue_length`)
    pub fn is_waiting(self) -> bool {
        matches!(
            self,
            PatientStatus::Waiting
                | PatientStatus::WaitingForNurse
                | PatientStatus::WaitingForDoctor
        )
    }

    /// Currently being served by a staff member
    pub fn is_in_service(self) -> bool {
        matches!(
            self,
            PatientStatus::WithReceptionist | PatientStatus::WithNurse | PatientStatus::WithDoctor
        )
    }

    pub fn is_terminal(self) -> bool {
        self == PatientStatus::Treated
    }

    pub fn label(self) -> &'static str {
        match self {
            PatientStatus::Waiting => "Waiting for Registration",
            PatientStatus::WithReceptionist => "Being Registered",
            PatientStatus::WaitingForNurse => "Waiting for Nurse",
            PatientStatus::WithNurse => "With Nurse",
            PatientStatus::WaitingForDoctor => "Waiting for Doctor",
            PatientStatus::WithDoctor => "With Doctor",
            PatientStatus::Treated => "Treated",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised by illegal patient state changes
#[derive(Debug, Error, PartialEq)]
pub enum PatientError {
    #[error("Patient {patient_id}: illegal transition {from:?} -> {to:?}")]
    InvalidTransition {
        patient_id: PatientId,
        from: PatientStatus,
        to: PatientStatus,
    },

    #[error("Patient {patient_id} already completed at {completion_time}")]
    AlreadyCompleted {
        patient_id: PatientId,
        completion_time: SimTime,
    },

    #[error("Patient {patient_id} completed at {completion_time}, before arrival {arrival_time}")]
    CompletionBeforeArrival {
        patient_id: PatientId,
        arrival_time: SimTime,
        completion_time: SimTime,
    },
}

/// A patient moving through the department
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::{Patient, PatientPriority, PatientStatus};
///
/// let mut patient = Patient::new(1, PatientPriority::Urgent, 0.0, "High fever");
/// assert_eq!(patient.status(), PatientStatus::Waiting);
///
/// patient.advance(PatientStatus::WithReceptionist).unwrap();
/// assert!(patient.advance(PatientStatus::WithNurse).is_err()); // no skipping
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    priority: PatientPriority,
    status: PatientStatus,
    /// Simulated time of arrival (immutable)
    arrival_time: SimTime,
    /// Simulated time of reaching `Treated`
    completion_time: Option<SimTime>,
    symptoms: String,
}

impl Patient {
    /// Create a patient in `Waiting`, the only entry point into the pipeline
    pub fn new(
        id: PatientId,
        priority: PatientPriority,
        arrival_time: SimTime,
        symptoms: impl Into<String>,
    ) -> Self {
        Self {
            id,
            priority,
            status: PatientStatus::Waiting,
            arrival_time,
            completion_time: None,
            symptoms: symptoms.into(),
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn priority(&self) -> PatientPriority {
        self.priority
    }

    pub fn status(&self) -> PatientStatus {
        self.status
    }

    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    pub fn completion_time(&self) -> Option<SimTime> {
        self.completion_time
    }

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn is_treated(&self) -> bool {
        self.status.is_terminal()
    }

    /// Time spent in the department: until completion if treated, else until `now`
    pub fn wait_time(&self, now: SimTime) -> SimTime {
        match self.completion_time {
            Some(completed) => completed - self.arrival_time,
            None => now - self.arrival_time,
        }
    }

    /// Move to the next non-terminal status
    ///
    /// `to` must be exactly `status().next()`; reaching `Treated` goes
    /// through [`Patient::complete`] so the completion time is recorded.
    pub fn advance(&mut self, to: PatientStatus) -> Result<(), PatientError> {
        if to.is_terminal() || self.status.next() != Some(to) {
            return Err(PatientError::InvalidTransition {
                patient_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Finish treatment at `now` and return the total wait time
    pub fn complete(&mut self, now: SimTime) -> Result<SimTime, PatientError> {
        if let Some(completion_time) = self.completion_time {
            return Err(PatientError::AlreadyCompleted {
                patient_id: self.id,
                completion_time,
            });
        }
        if self.status != PatientStatus::WithDoctor {
            return Err(PatientError::InvalidTransition {
                patient_id: self.id,
                from: self.status,
                to: PatientStatus::Treated,
            });
        }
        if now < self.arrival_time {
            return Err(PatientError::CompletionBeforeArrival {
                patient_id: self.id,
                arrival_time: self.arrival_time,
                completion_time: now,
            });
        }

        self.status = PatientStatus::Treated;
        self.completion_time = Some(now);
        Ok(now - self.arrival_time)
    }
}
