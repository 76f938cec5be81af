//! Arrival generation and random process helpers.
//!
//! Patients arrive as a Poisson process. On every tick the expected number of
//! arrivals is `(rate_per_hour / 3600) × simulated_elapsed_seconds`; the actual
//! count is a Poisson draw with that mean. Each arrival's priority is drawn
//! from a fixed categorical mix.
//!
//! # Key Principles
//!
//! 1. **Injectable randomness**: every sampler takes a [`RandomSource`]
//! 2. **Mean zero means nothing**: a zero rate or zero elapsed time yields no
//!    arrivals and consumes no random numbers
//! 3. **Speed folded in**: callers pass simulated seconds, so the speed
//!    multiplier is applied exactly once (by the clock)
//!
//! # Example
//!
//! ```
//! use hospital_simulator_core_rs::arrivals::{ArrivalGenerator, PriorityMix};
//! use hospital_simulator_core_rs::RngManager;
//!
//! let mut rng = RngManager::new(42);
//! let generator = ArrivalGenerator::new(12.0, PriorityMix::default());
//!
//! // 12 patients/hour over 10 simulated minutes → mean 2
//! assert!((generator.expected_arrivals(600.0) - 2.0).abs() < 1e-9);
//! let _count = generator.sample_count(600.0, &mut rng);
//! ```

use crate::core::{SimTime, SECONDS_PER_HOUR};
use crate::models::PatientPriority;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Largest mean handed to a single multiplicative Poisson draw.
///
/// `exp(-λ)` underflows near λ ≈ 745; larger means are split into chunks and
/// summed, which is exact because Poisson variables are additive.
const POISSON_CHUNK: f64 = 500.0;

// ============================================================================
// Distribution helpers
// ============================================================================

/// Sample from Poisson(lambda) by multiplying uniforms (Knuth)
///
/// Returns 0 without drawing when `lambda <= 0`.
pub fn poisson<R: RandomSource + ?Sized>(lambda: f64, rng: &mut R) -> u32 {
    if !(lambda > 0.0) {
        return 0;
    }

    let mut remaining = lambda;
    let mut total = 0u32;
    while remaining > 0.0 {
        let chunk = remaining.min(POISSON_CHUNK);
        remaining -= chunk;

        let limit = (-chunk).exp();
        let mut k = 0u32;
        let mut p = 1.0;
        loop {
            p *= rng.next_f64();
            if p <= limit {
                break;
            }
            k += 1;
        }
        total += k;
    }
    total
}

/// Sample from an exponential distribution with the given mean
///
/// Uses `-mean × ln(1 - u)`, so `u ∈ [0, 1)` never hits `ln(0)`.
pub fn exponential<R: RandomSource + ?Sized>(mean: f64, rng: &mut R) -> f64 {
    let u = rng.next_f64();
    -mean * (1.0 - u).ln()
}

/// Sample uniformly from `[min, max)`
pub fn uniform<R: RandomSource + ?Sized>(min: f64, max: f64, rng: &mut R) -> f64 {
    min + rng.next_f64() * (max - min)
}

/// Weighted coin toss returning `true` with probability `p`
pub fn bernoulli<R: RandomSource + ?Sized>(p: f64, rng: &mut R) -> bool {
    rng.next_f64() < p
}

// ============================================================================
// Priority mix
// ============================================================================

/// Categorical distribution of arrival priorities
///
/// `standard` takes whatever probability mass `critical` and `urgent` leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityMix {
    /// Probability of a CRITICAL arrival
    pub critical: f64,
    /// Probability of an URGENT arrival
    pub urgent: f64,
}

impl Default for PriorityMix {
    fn default() -> Self {
        Self {
            critical: 0.1,
            urgent: 0.3,
        }
    }
}

impl PriorityMix {
    pub fn standard(&self) -> f64 {
        1.0 - self.critical - self.urgent
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, p) in [("critical", self.critical), ("urgent", self.urgent)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("priority_mix.{} must be within [0, 1], got {}", name, p));
            }
        }
        if self.critical + self.urgent > 1.0 {
            return Err(format!(
                "priority_mix critical + urgent must not exceed 1, got {}",
                self.critical + self.urgent
            ));
        }
        Ok(())
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> PatientPriority {
        let u = rng.next_f64();
        if u < self.critical {
            PatientPriority::Critical
        } else if u < self.critical + self.urgent {
            PatientPriority::Urgent
        } else {
            PatientPriority::Standard
        }
    }
}

// ============================================================================
// Arrival generator
// ============================================================================

/// Generator for random patient arrivals
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    /// Mean arrivals per simulated hour
    rate_per_hour: f64,
    priority_mix: PriorityMix,
}

impl ArrivalGenerator {
    pub fn new(rate_per_hour: f64, priority_mix: PriorityMix) -> Self {
        Self {
            rate_per_hour,
            priority_mix,
        }
    }

    pub fn rate_per_hour(&self) -> f64 {
        self.rate_per_hour
    }

    pub fn set_rate_per_hour(&mut self, rate_per_hour: f64) {
        self.rate_per_hour = rate_per_hour;
    }

    /// Poisson mean for `elapsed` simulated seconds
    pub fn expected_arrivals(&self, elapsed: SimTime) -> f64 {
        (self.rate_per_hour / SECONDS_PER_HOUR) * elapsed
    }

    /// Number of patients arriving over `elapsed` simulated seconds
    pub fn sample_count<R: RandomSource + ?Sized>(&self, elapsed: SimTime, rng: &mut R) -> u32 {
        poisson(self.expected_arrivals(elapsed), rng)
    }

    pub fn sample_priority<R: RandomSource + ?Sized>(&self, rng: &mut R) -> PatientPriority {
        self.priority_mix.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;

    #[test]
    fn test_poisson_zero_mean_draws_nothing() {
        let mut rng = SequenceSource::constant(0.5);
        assert_eq!(poisson(0.0, &mut rng), 0);
        assert_eq!(poisson(-3.0, &mut rng), 0);
        assert_eq!(poisson(f64::NAN, &mut rng), 0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_poisson_scripted() {
        // limit = exp(-1) ≈ 0.368
        let mut rng = SequenceSource::constant(0.1);
        assert_eq!(poisson(1.0, &mut rng), 0);

        let mut rng = SequenceSource::new(vec![0.9, 0.9, 0.1]);
        assert_eq!(poisson(1.0, &mut rng), 2);
    }

    #[test]
    fn test_priority_mix_boundaries() {
        let mix = PriorityMix::default();
        let mut rng = SequenceSource::new(vec![0.05, 0.1, 0.39, 0.4, 0.99]);

        assert_eq!(mix.sample(&mut rng), PatientPriority::Critical);
        assert_eq!(mix.sample(&mut rng), PatientPriority::Urgent);
        assert_eq!(mix.sample(&mut rng), PatientPriority::Urgent);
        assert_eq!(mix.sample(&mut rng), PatientPriority::Standard);
        assert_eq!(mix.sample(&mut rng), PatientPriority::Standard);
    }

    #[test]
    fn test_priority_mix_validation() {
        assert!(PriorityMix::default().validate().is_ok());
        assert!(PriorityMix { critical: 0.7, urgent: 0.4 }.validate().is_err());
        assert!(PriorityMix { critical: -0.1, urgent: 0.4 }.validate().is_err());
    }
}
