//! Input/output for snapshot and result files.
//!
//! Snapshot readers share the [`traits::SnapshotFile`] interface; each format owns its
//! own error type. Results are persisted as CSV through [`results`].

pub mod lammps;
pub mod results;
pub mod traits;
pub mod xyz;
