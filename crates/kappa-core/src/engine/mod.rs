//! # Engine Module
//!
//! Turns a particle snapshot into the compression-based order parameter.
//!
//! ## Pipeline
//!
//! 1. [`binner::SpatialBinner`] histograms the snapshot on a cubic voxel grid and reads
//!    the counts along a 3D Hilbert curve, producing a [`symbols::SymbolSequence`].
//! 2. The sequence is encoded into bytes through a [`symbols::SymbolAlphabet`].
//! 3. [`complexity`] factorizes the bytes (greedy LZ77) and converts the factor count
//!    into a CID in `[0, 1]`.
//! 4. [`normalization::NormalizationHarness`] divides the CID by the mean CID of
//!    shuffled copies, removing the contribution of the symbol histogram alone.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated parameters and their builder
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//!
//! Evaluations are pure functions of their inputs and the seed; shuffle trials run in
//! parallel when the `parallel` feature is enabled without changing any result.

pub mod binner;
pub mod cache;
pub mod complexity;
pub mod config;
pub mod error;
pub mod normalization;
pub mod progress;
pub mod symbols;
pub mod utils;
