//! Greedy LZ77 factorization.
//!
//! The parser walks a byte sequence left to right and, at every position, emits either
//! a copy of the longest earlier occurrence of the upcoming text or a single literal.
//! The number of factors is the raw complexity measure consumed by
//! [`crate::engine::complexity`].

pub mod factor;
pub mod factorizer;

pub use factor::{ExpandError, Factor, FactorizationResult, expand};
pub use factorizer::{Factors, MIN_MATCH, factorize, parse};
