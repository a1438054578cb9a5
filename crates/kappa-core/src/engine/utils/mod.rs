//! Helpers shared by the engine: seeded shuffling and summary statistics.

pub mod sampling;
pub mod stats;
