//! Simulation Engine
//!
//! Owns the department state and runs the tick loop:
//!
//! ```text
//! For each tick:
//! 1. Advance simulated time by real_elapsed × speed
//! 2. Generate arrivals (Poisson count, categorical priority)
//! 3. For each stage in pipeline order (Registration, Nursing, Treatment):
//!    a. Release staff whose deadline has passed
//!    b. Pair waiting patients with idle staff in triage order
//! 4. Evict treated patients beyond the retention window
//! 5. Recompute statistics
//! 6. Notify observers with a snapshot
//! ```
//!
//! Commands (`start`, `pause`, `add_staff`, ...) mutate the engine directly and
//! notify observers afterwards. The engine holds no locks; hosts that drive it
//! from several tasks wrap it in a mutex (see [`crate::driver`]).
//!
//! # Example
//!
//! ```rust
//! use hospital_simulator_core_rs::orchestrator::{EngineConfig, SimulationEngine};
//! use hospital_simulator_core_rs::{PatientPriority, PatientStatus, StaffRole};
//! use std::time::Duration;
//!
//! let config = EngineConfig {
//!     arrival_rate_per_hour: 0.0,
//!     ..Default::default()
//! };
//! let mut engine = SimulationEngine::new(config).unwrap();
//! engine.add_staff(StaffRole::Receptionist, 1);
//! engine.add_staff(StaffRole::Nurse, 1);
//! engine.add_staff(StaffRole::Doctor, 1);
//!
//! let id = engine.manually_add_patient(PatientPriority::Critical);
//! engine.start();
//!
//! // Critical service takes at most 3 + 10 + 60 minutes
//! for _ in 0..80 {
//!     engine.tick(Duration::from_secs(60)).unwrap();
//! }
//!
//! let patient = engine.patients().into_iter().find(|p| p.id() == id).unwrap();
//! assert_eq!(patient.status(), PatientStatus::Treated);
//! assert_eq!(engine.stats().treated_patients, 1);
//! ```

use crate::arrivals::ArrivalGenerator;
use crate::assignment::{self, AssignmentError, ServiceTimeModel, StageOutcome};
use crate::core::{SimTime, SimulationClock};
use crate::models::event::{Event, EventLog};
use crate::models::patient::{Patient, PatientId, PatientPriority};
use crate::models::stage::Stage;
use crate::models::staff::{Staff, StaffId, StaffRole};
use crate::models::state::SimulationState;
use crate::notify::{ObserverRegistry, SubscriptionId};
use crate::orchestrator::config::{validate_arrival_rate, validate_speed, EngineConfig};
use crate::orchestrator::snapshot::EngineSnapshot;
use crate::rng::{RandomSource, RngManager};
use crate::stats::{SimulationStats, WaitTimeSummary};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, trace};

// ============================================================================
// Errors and Results
// ============================================================================

/// Errors surfaced by the engine
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Arrival rate {0} is outside 0..=30 patients/hour")]
    ArrivalRateOutOfRange(f64),

    #[error("Simulation speed {0} is outside 0.5..=10")]
    SpeedOutOfRange(f64),

    #[error("Simulation is paused")]
    NotRunning,

    #[error("Assignment error: {0}")]
    AssignmentError(#[from] AssignmentError),
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Simulated time at the end of the tick
    pub time: SimTime,

    /// Simulated seconds covered by the tick
    pub sim_elapsed: SimTime,

    pub num_arrivals: usize,

    pub num_assignments: usize,

    /// Service completions across all stages
    pub num_completions: usize,

    /// Patients that reached `Treated` this tick
    pub treated: Vec<PatientId>,

    /// Treated patients dropped from the retention window
    pub evicted: Vec<PatientId>,
}

// ============================================================================
// Engine
// ============================================================================

/// Emergency department simulation
///
/// # Determinism
///
/// Every random draw goes through one injected [`RandomSource`], in a fixed
/// order per tick (arrival count, then per arrival priority and symptoms,
/// then one service time per assignment in stage order). The same source and
/// the same sequence of commands and tick durations give identical runs.
pub struct SimulationEngine {
    state: SimulationState,

    clock: SimulationClock,

    rng: Box<dyn RandomSource + Send>,

    arrivals: ArrivalGenerator,

    service_times: ServiceTimeModel,

    stats: SimulationStats,

    event_log: EventLog,

    observers: ObserverRegistry<EngineSnapshot>,

    /// Treated patients kept after completion
    treated_retention: usize,

    next_patient_id: PatientId,

    next_staff_id: StaffId,
}

impl SimulationEngine {
    /// Create a paused engine seeded from `config.rng_seed`
    pub fn new(config: EngineConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_random_source(config, Box::new(rng))
    }

    /// Create a paused engine drawing from `rng` instead of the seeded default
    pub fn with_random_source(
        config: EngineConfig,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut engine = Self {
            state: SimulationState::new(),
            clock: SimulationClock::new(config.simulation_speed),
            rng,
            arrivals: ArrivalGenerator::new(config.arrival_rate_per_hour, config.priority_mix),
            service_times: config.service_times,
            stats: SimulationStats::new(),
            event_log: EventLog::with_capacity(config.event_log_capacity),
            observers: ObserverRegistry::new(),
            treated_retention: config.treated_retention,
            next_patient_id: 1,
            next_staff_id: 1,
        };

        for role in StaffRole::ALL {
            for _ in 0..config.initial_staff.get(role) {
                engine.hire(role);
            }
        }
        engine.stats.refresh(&engine.state, 0.0);

        Ok(engine)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_time(&self) -> SimTime {
        self.clock.current_time()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrivals.rate_per_hour()
    }

    pub fn simulation_speed(&self) -> f64 {
        self.clock.speed()
    }

    /// Real time a fixed-interval driver should wait between ticks
    pub fn tick_period(&self) -> Duration {
        self.clock.tick_period()
    }

    /// Changes every time the engine goes from paused to running
    pub fn run_epoch(&self) -> u64 {
        self.clock.run_epoch()
    }

    /// Ticks processed since start (or last reset)
    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Retained patients in arrival order
    pub fn patients(&self) -> Vec<Patient> {
        self.state.patients().cloned().collect()
    }

    /// Staff in creation order
    pub fn staff(&self) -> Vec<Staff> {
        self.state.staff().cloned().collect()
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats.clone()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current_time: self.current_time(),
            is_running: self.is_running(),
            arrival_rate_per_hour: self.arrival_rate(),
            simulation_speed: self.simulation_speed(),
            patients: self.patients(),
            staff: self.staff(),
            stats: self.stats(),
        }
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Distribution of waits over the retained treated patients
    pub fn wait_time_summary(&self) -> WaitTimeSummary {
        let now = self.current_time();
        let waits: Vec<f64> = self
            .state
            .patients()
            .filter(|p| p.is_treated())
            .map(|p| p.wait_time(now))
            .collect();
        WaitTimeSummary::from_samples(&waits)
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a listener called with a fresh snapshot after every tick and
    /// every state-changing command
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EngineSnapshot) + Send + 'static,
    {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify_observers(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn start(&mut self) {
        if self.clock.is_running() {
            return;
        }
        self.clock.start();
        info!(time = self.current_time(), "Simulation started");
        self.notify_observers();
    }

    pub fn pause(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        self.clock.pause();
        info!(time = self.current_time(), "Simulation paused");
        self.notify_observers();
    }

    /// Clear all patients, staff, statistics and events and return to time
    /// zero, paused
    ///
    /// Arrival rate, speed and observers are kept.
    pub fn reset(&mut self) {
        self.state.clear();
        self.clock.reset();
        self.stats = SimulationStats::new();
        self.event_log.clear();
        self.next_patient_id = 1;
        self.next_staff_id = 1;

        self.event_log.log(Event::SimulationReset { time: 0.0 });
        info!("Simulation reset");
        self.notify_observers();
    }

    pub fn set_arrival_rate(&mut self, rate_per_hour: f64) -> Result<(), SimulationError> {
        validate_arrival_rate(rate_per_hour)?;
        self.arrivals.set_rate_per_hour(rate_per_hour);
        info!(rate_per_hour, "Arrival rate changed");
        self.notify_observers();
        Ok(())
    }

    /// Change the speed multiplier; applies from the next tick
    pub fn set_simulation_speed(&mut self, speed: f64) -> Result<(), SimulationError> {
        validate_speed(speed)?;
        self.clock.set_speed(speed);
        info!(speed, "Simulation speed changed");
        self.notify_observers();
        Ok(())
    }

    /// Add `count` idle staff members of `role`, returning their ids
    pub fn add_staff(&mut self, role: StaffRole, count: usize) -> Vec<StaffId> {
        let ids: Vec<StaffId> = (0..count).map(|_| self.hire(role)).collect();
        if !ids.is_empty() {
            self.stats.refresh(&self.state, self.current_time());
            self.notify_observers();
        }
        ids
    }

    /// Remove one idle staff member of `role`
    ///
    /// Returns `false` (and changes nothing) if every member of the role is
    /// busy or the role has no staff.
    pub fn remove_staff(&mut self, role: StaffRole) -> bool {
        let Some(removed) = self.state.remove_idle_staff(role) else {
            debug!(role = %role, "No idle staff to remove");
            return false;
        };

        let time = self.current_time();
        self.event_log.log(Event::StaffRemoved {
            time,
            staff_id: removed.id(),
            role,
        });
        info!(staff_id = removed.id(), role = %role, "Staff removed");

        self.stats.refresh(&self.state, time);
        self.notify_observers();
        true
    }

    /// Admit a patient of the given priority at the current time
    ///
    /// Works while paused; the patient is picked up by the next tick.
    pub fn manually_add_patient(&mut self, priority: PatientPriority) -> PatientId {
        let now = self.current_time();
        let id = self.admit(priority, now, true);
        self.stats.refresh(&self.state, now);
        self.notify_observers();
        id
    }

    fn hire(&mut self, role: StaffRole) -> StaffId {
        let id = self.next_staff_id;
        self.next_staff_id += 1;
        self.state.add_staff(Staff::new(id, role));

        self.event_log.log(Event::StaffAdded {
            time: self.clock.current_time(),
            staff_id: id,
            role,
        });
        info!(staff_id = id, role = %role, "Staff added");
        id
    }

    fn admit(&mut self, priority: PatientPriority, now: SimTime, manual: bool) -> PatientId {
        let id = self.next_patient_id;
        self.next_patient_id += 1;

        let symptoms = priority.sample_symptoms(&mut *self.rng);
        self.state.add_patient(Patient::new(id, priority, now, symptoms));
        self.stats.record_arrival();

        self.event_log.log(Event::PatientArrived {
            time: now,
            patient_id: id,
            priority,
            manual,
        });
        debug!(patient_id = id, priority = %priority, manual, "Patient arrived");
        id
    }

    // ========================================================================
    // Tick Loop
    // ========================================================================

    /// Advance the simulation by `real_elapsed` wall-clock time
    ///
    /// # Errors
    ///
    /// * `NotRunning` - the engine is paused; nothing changes
    /// * `AssignmentError` - the state broke an assignment invariant
    pub fn tick(&mut self, real_elapsed: Duration) -> Result<TickResult, SimulationError> {
        if !self.clock.is_running() {
            return Err(SimulationError::NotRunning);
        }

        // STEP 1: TIME
        let sim_elapsed = self.clock.advance(real_elapsed);
        let now = self.clock.current_time();

        // STEP 2: ARRIVALS
        let num_arrivals = self.arrivals.sample_count(sim_elapsed, &mut *self.rng) as usize;
        for _ in 0..num_arrivals {
            let priority = self.arrivals.sample_priority(&mut *self.rng);
            self.admit(priority, now, false);
        }

        // STEP 3: STAGES (release before assign, in pipeline order)
        let mut result = TickResult {
            time: now,
            sim_elapsed,
            num_arrivals,
            ..Default::default()
        };
        for stage in Stage::ALL {
            let outcome = assignment::process_stage(
                &mut self.state,
                stage,
                now,
                &self.service_times,
                &mut *self.rng,
            )?;
            self.record_stage_outcome(now, outcome, &mut result);
        }

        // STEP 4: RETENTION
        result.evicted = self.state.evict_treated(self.treated_retention);
        if !result.evicted.is_empty() {
            self.event_log.log(Event::PatientsEvicted {
                time: now,
                patient_ids: result.evicted.clone(),
            });
        }

        // STEP 5: STATISTICS
        self.stats.refresh(&self.state, now);

        trace!(
            tick = self.clock.tick_count(),
            time = now,
            arrivals = result.num_arrivals,
            assignments = result.num_assignments,
            completions = result.num_completions,
            queue_length = self.stats.queue_length,
            "Tick processed"
        );

        // STEP 6: OBSERVERS
        self.notify_observers();

        Ok(result)
    }

    fn record_stage_outcome(
        &mut self,
        now: SimTime,
        outcome: StageOutcome,
        result: &mut TickResult,
    ) {
        for completion in outcome.completions {
            self.event_log.log(Event::ServiceCompleted {
                time: now,
                patient_id: completion.patient_id,
                staff_id: completion.staff_id,
                stage: completion.stage,
            });

            if let Some(wait_time) = completion.wait_time {
                self.stats.record_treatment(wait_time);
                self.event_log.log(Event::PatientTreated {
                    time: now,
                    patient_id: completion.patient_id,
                    wait_time,
                });
                info!(
                    patient_id = completion.patient_id,
                    wait_time,
                    "Patient treated"
                );
                result.treated.push(completion.patient_id);
            }
            result.num_completions += 1;
        }

        for assignment in outcome.assignments {
            self.event_log.log(Event::ServiceStarted {
                time: now,
                patient_id: assignment.patient_id,
                staff_id: assignment.staff_id,
                stage: assignment.stage,
                service_time: assignment.service_time,
                busy_until: assignment.busy_until,
            });
            result.num_assignments += 1;
        }
    }
}

// Manual Debug implementation (random source and observers are opaque)
impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("current_time", &self.current_time())
            .field("is_running", &self.is_running())
            .field("num_patients", &self.state.num_patients())
            .field("num_staff", &self.state.num_staff())
            .field("observers", &self.observers.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
