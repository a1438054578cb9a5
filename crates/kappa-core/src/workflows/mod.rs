//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::core`] collaborators and the
//! [`crate::engine`] pipeline together.
//!
//! - **Snapshot analysis** ([`analyze`]) - One snapshot in, one [`analyze::SnapshotReport`]
//!   out: type filtering, binning, encoding and normalization.
//! - **Batch evaluation** ([`batch`]) - Many snapshot files evaluated with bounded
//!   parallelism; failures are collected per snapshot instead of aborting the run.

pub mod analyze;
pub mod batch;
