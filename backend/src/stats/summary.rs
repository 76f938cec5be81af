//! Descriptive statistics over wait-time samples
//!
//! Empty inputs yield 0 rather than an error; only an out-of-range
//! percentile is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Percentile must be between 0 and 100, got {0}")]
    InvalidPercentile(f64),
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (0 for fewer than two values)
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let m = mean(values);
    let squared: Vec<f64> = values.iter().map(|v| (v - m).powi(2)).collect();
    mean(&squared).sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile `p ∈ [0, 100]` with linear interpolation between ranks
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::stats::percentile;
///
/// assert_eq!(percentile(&[10.0, 20.0, 30.0, 40.0], 50.0).unwrap(), 25.0);
/// assert!(percentile(&[1.0], 101.0).is_err());
/// ```
pub fn percentile(values: &[f64], p: f64) -> Result<f64, StatsError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::InvalidPercentile(p));
    }
    if values.is_empty() {
        return Ok(0.0);
    }

    let sorted = sorted(values);
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Busy fraction; 0 when `total` is not positive
pub fn utilization_rate(busy: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    busy / total
}

/// Human-readable duration from minutes: "45s", "12m", "2h", "2h 30m"
pub fn format_minutes(minutes: f64) -> String {
    if minutes < 1.0 {
        return format!("{}s", (minutes * 60.0).round() as i64);
    }
    if minutes < 60.0 {
        return format!("{}m", minutes.round() as i64);
    }

    let mut hours = (minutes / 60.0).floor() as i64;
    let mut remaining = (minutes % 60.0).round() as i64;
    if remaining == 60 {
        hours += 1;
        remaining = 0;
    }
    if remaining == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, remaining)
    }
}

/// Fraction in [0, 1] rendered as a percentage, e.g. `0.756` → "75.6%"
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Distribution of completed wait times, in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitTimeSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub standard_deviation: f64,
}

impl WaitTimeSummary {
    pub fn from_samples(samples: &[f64]) -> Self {
        Self {
            count: samples.len(),
            mean: mean(samples),
            median: median(samples),
            p90: percentile(samples, 90.0).unwrap_or(0.0),
            standard_deviation: standard_deviation(samples),
        }
    }
}
