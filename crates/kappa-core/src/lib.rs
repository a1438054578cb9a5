//! # Kappa Core Library
//!
//! Compression-based structural order parameters for molecular-simulation snapshots.
//! A particle configuration is binned onto a voxel grid, linearized along a Hilbert
//! curve and parsed with a greedy LZ77 factorizer; the resulting compressibility
//! ("CID") is normalized against shuffled copies of the same sequence to separate
//! positional order from plain symbol-frequency effects.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`PointCloud`), the pure
//!   algorithms (Hilbert curve, voxel histogram, LZ77 factorization) and the snapshot
//!   and result file formats.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error taxonomy, the
//!   `SpatialBinner` with its explicit curve cache, the complexity estimator and the
//!   shuffle-based normalization harness.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures: evaluating one snapshot
//!   and coordinating many snapshots with bounded parallelism.

pub mod core;
pub mod engine;
pub mod workflows;
