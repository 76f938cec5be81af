//! Core primitives shared by every simulation component

pub mod time;

pub use time::{SimTime, SimulationClock, SECONDS_PER_HOUR};
