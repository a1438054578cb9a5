//! # Core Module
//!
//! The stateless building blocks of the CID pipeline.
//!
//! - **Particle Representation** ([`models`]) - Particles, point clouds and simulation boxes
//! - **Space-Filling Curves** ([`curve`]) - The Hilbert bijection and materialized voxel orders
//! - **Occupancy Histograms** ([`grid`]) - Fixed-range 3D voxel counting
//! - **Factorization** ([`lz`]) - Greedy longest-match LZ77 parsing
//! - **File I/O** ([`io`]) - Snapshot readers and the CSV result writer

pub mod curve;
pub mod grid;
pub mod io;
pub mod lz;
pub mod models;
