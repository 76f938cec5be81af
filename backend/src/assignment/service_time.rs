//! Service time models
//!
//! A service time is drawn once, when a patient is paired with a staff
//! member, from a distribution chosen by stage and priority. Configured in
//! minutes, returned in simulated seconds.

use crate::arrivals::{exponential, uniform};
use crate::core::SimTime;
use crate::models::{PatientPriority, Stage};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Shortest service time ever returned, in simulated seconds
pub const MIN_SERVICE_SECONDS: SimTime = 1.0;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// One value per priority tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerPriority<T> {
    pub critical: T,
    pub urgent: T,
    pub standard: T,
}

impl<T: Copy> PerPriority<T> {
    pub fn get(&self, priority: PatientPriority) -> T {
        match priority {
            PatientPriority::Critical => self.critical,
            PatientPriority::Urgent => self.urgent,
            PatientPriority::Standard => self.standard,
        }
    }
}

/// One value per pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerStage<T> {
    pub registration: T,
    pub nursing: T,
    pub treatment: T,
}

impl<T> PerStage<T> {
    pub fn get(&self, stage: Stage) -> &T {
        match stage {
            Stage::Registration => &self.registration,
            Stage::Nursing => &self.nursing,
            Stage::Treatment => &self.treatment,
        }
    }
}

/// Half-open range of minutes `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinuteRange {
    pub min: f64,
    pub max: f64,
}

impl MinuteRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Distribution family for service times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ServiceTimeModel {
    /// Uniform draw from a per stage/priority minute range
    Uniform {
        minutes: PerStage<PerPriority<MinuteRange>>,
    },

    /// Exponential draw with a per stage/priority mean in minutes
    Exponential {
        mean_minutes: PerStage<PerPriority<f64>>,
    },
}

impl Default for ServiceTimeModel {
    fn default() -> Self {
        ServiceTimeModel::Uniform {
            minutes: default_minute_ranges(),
        }
    }
}

/// Reference ranges: more urgent patients are registered and assessed
/// faster but treated longer
pub fn default_minute_ranges() -> PerStage<PerPriority<MinuteRange>> {
    PerStage {
        registration: PerPriority {
            critical: MinuteRange::new(2.0, 3.0),
            urgent: MinuteRange::new(3.0, 4.0),
            standard: MinuteRange::new(4.0, 5.0),
        },
        nursing: PerPriority {
            critical: MinuteRange::new(5.0, 10.0),
            urgent: MinuteRange::new(7.0, 12.0),
            standard: MinuteRange::new(10.0, 15.0),
        },
        treatment: PerPriority {
            critical: MinuteRange::new(20.0, 60.0),
            urgent: MinuteRange::new(15.0, 40.0),
            standard: MinuteRange::new(10.0, 30.0),
        },
    }
}

impl ServiceTimeModel {
    /// Exponential model whose means are the midpoints of the reference ranges
    pub fn exponential_default() -> Self {
        let ranges = default_minute_ranges();
        let means = |r: &PerPriority<MinuteRange>| PerPriority {
            critical: r.critical.midpoint(),
            urgent: r.urgent.midpoint(),
            standard: r.standard.midpoint(),
        };
        ServiceTimeModel::Exponential {
            mean_minutes: PerStage {
                registration: means(&ranges.registration),
                nursing: means(&ranges.nursing),
                treatment: means(&ranges.treatment),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for stage in Stage::ALL {
            for priority in PatientPriority::ALL {
                match self {
                    ServiceTimeModel::Uniform { minutes } => {
                        let range = minutes.get(stage).get(priority);
                        if !(range.min.is_finite() && range.max.is_finite())
                            || range.min <= 0.0
                            || range.max < range.min
                        {
                            return Err(format!(
                                "{} / {} range needs 0 < min <= max, got [{}, {})",
                                stage, priority, range.min, range.max
                            ));
                        }
                    }
                    ServiceTimeModel::Exponential { mean_minutes } => {
                        let mean = mean_minutes.get(stage).get(priority);
                        if !(mean.is_finite() && mean > 0.0) {
                            return Err(format!(
                                "service time mean for {} / {} must be positive, got {}",
                                stage, priority, mean
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Draw a service time in simulated seconds (always ≥ [`MIN_SERVICE_SECONDS`])
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        stage: Stage,
        priority: PatientPriority,
        rng: &mut R,
    ) -> SimTime {
        let minutes = match self {
            ServiceTimeModel::Uniform { minutes } => {
                let range = minutes.get(stage).get(priority);
                uniform(range.min, range.max, rng)
            }
            ServiceTimeModel::Exponential { mean_minutes } => {
                exponential(mean_minutes.get(stage).get(priority), rng)
            }
        };
        (minutes * SECONDS_PER_MINUTE).max(MIN_SERVICE_SECONDS)
    }
}
