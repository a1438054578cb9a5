//! Data models for particle configurations.

pub mod particle;
pub mod simulation_box;
