//! Scripted random source
//!
//! Replays a fixed list of uniform values in a loop. Used to make scenarios
//! fully reproducible without reasoning about generator output.

use super::RandomSource;

/// Cycles through a fixed, non-empty sequence of values in [0, 1)
///
/// # Example
/// ```
/// use hospital_simulator_core_rs::{RandomSource, SequenceSource};
///
/// let mut source = SequenceSource::new(vec![0.25, 0.75]);
/// assert_eq!(source.next_f64(), 0.25);
/// assert_eq!(source.next_f64(), 0.75);
/// assert_eq!(source.next_f64(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
    draws: u64,
}

impl SequenceSource {
    /// # Panics
    /// Panics if `values` is empty or any value lies outside [0, 1)
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "sequence must not be empty");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "sequence values must lie in [0, 1)"
        );
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Source that always yields `value`
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values handed out so far
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        self.draws += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "sequence must not be empty")]
    fn test_empty_sequence_panics() {
        SequenceSource::new(Vec::new());
    }

    #[test]
    #[should_panic(expected = "sequence values must lie in [0, 1)")]
    fn test_out_of_range_value_panics() {
        SequenceSource::new(vec![0.5, 1.0]);
    }

    #[test]
    fn test_draws_counted() {
        let mut source = SequenceSource::constant(0.5);
        source.next_f64();
        source.next_f64();
        assert_eq!(source.draws(), 2);
    }
}
