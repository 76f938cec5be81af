//! Engine configuration
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid
//! configuration. Values are validated once at construction; runtime setters
//! re-check the same ranges.

use crate::arrivals::PriorityMix;
use crate::assignment::ServiceTimeModel;
use crate::models::event::DEFAULT_EVENT_LOG_CAPACITY;
use crate::models::staff::StaffRole;
use crate::orchestrator::engine::SimulationError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted arrival rates, patients per simulated hour
pub const ARRIVAL_RATE_RANGE: RangeInclusive<f64> = 0.0..=30.0;

/// Accepted simulation speed multipliers
pub const SPEED_RANGE: RangeInclusive<f64> = 0.5..=10.0;

/// Treated patients kept for inspection by default
pub const DEFAULT_TREATED_RETENTION: usize = 100;

/// Staff created when the engine is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffHeadcount {
    pub doctors: usize,
    pub nurses: usize,
    pub receptionists: usize,
}

impl StaffHeadcount {
    pub fn get(&self, role: StaffRole) -> usize {
        match role {
            StaffRole::Doctor => self.doctors,
            StaffRole::Nurse => self.nurses,
            StaffRole::Receptionist => self.receptionists,
        }
    }

    pub fn total(&self) -> usize {
        self.doctors + self.nurses + self.receptionists
    }
}

/// Complete engine configuration
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::orchestrator::EngineConfig;
///
/// let config: EngineConfig =
///     serde_json::from_str(r#"{"arrival_rate_per_hour": 20, "rng_seed": 7}"#).unwrap();
/// assert_eq!(config.arrival_rate_per_hour, 20.0);
/// assert_eq!(config.simulation_speed, 1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Mean patient arrivals per simulated hour
    pub arrival_rate_per_hour: f64,

    /// Simulated seconds per real second
    pub simulation_speed: f64,

    /// Seed for the built-in random source
    pub rng_seed: u64,

    pub initial_staff: StaffHeadcount,

    pub priority_mix: PriorityMix,

    pub service_times: ServiceTimeModel,

    /// Most recent treated patients kept in state
    pub treated_retention: usize,

    pub event_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arrival_rate_per_hour: 10.0,
            simulation_speed: 1.0,
            rng_seed: 12345,
            initial_staff: StaffHeadcount::default(),
            priority_mix: PriorityMix::default(),
            service_times: ServiceTimeModel::default(),
            treated_retention: DEFAULT_TREATED_RETENTION,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        validate_arrival_rate(self.arrival_rate_per_hour)?;
        validate_speed(self.simulation_speed)?;

        self.priority_mix
            .validate()
            .map_err(SimulationError::InvalidConfig)?;
        self.service_times
            .validate()
            .map_err(SimulationError::InvalidConfig)?;

        if self.treated_retention == 0 {
            return Err(SimulationError::InvalidConfig(
                "treated_retention must be > 0".to_string(),
            ));
        }
        if self.event_log_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "event_log_capacity must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn validate_arrival_rate(rate: f64) -> Result<(), SimulationError> {
    if ARRIVAL_RATE_RANGE.contains(&rate) {
        Ok(())
    } else {
        Err(SimulationError::ArrivalRateOutOfRange(rate))
    }
}

pub(crate) fn validate_speed(speed: f64) -> Result<(), SimulationError> {
    if SPEED_RANGE.contains(&speed) {
        Ok(())
    } else {
        Err(SimulationError::SpeedOutOfRange(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let config = EngineConfig {
            arrival_rate_per_hour: 31.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimulationError::ArrivalRateOutOfRange(31.0))
        );

        let config = EngineConfig {
            simulation_speed: 0.25,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(SimulationError::SpeedOutOfRange(0.25)));

        let config = EngineConfig {
            treated_retention: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_nan_rate_rejected() {
        assert!(validate_arrival_rate(f64::NAN).is_err());
        assert!(validate_speed(f64::NAN).is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"initial_staff": {"doctors": 2}}"#).unwrap();

        assert_eq!(config.initial_staff.doctors, 2);
        assert_eq!(config.initial_staff.nurses, 0);
        assert_eq!(config.treated_retention, DEFAULT_TREATED_RETENTION);
    }
}
