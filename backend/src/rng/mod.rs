//! Random sources
//!
//! Every random draw in the simulator (arrival counts, priorities, symptoms,
//! service times) goes through the [`RandomSource`] trait so callers can inject
//! a seeded generator or a scripted sequence.

mod sequence;
mod xorshift;

pub use sequence::SequenceSource;
pub use xorshift::RngManager;

/// A source of uniform random numbers in [0.0, 1.0)
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
