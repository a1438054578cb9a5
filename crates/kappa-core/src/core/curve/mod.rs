//! Space-filling curves used to linearize voxel grids.
//!
//! [`hilbert`] implements the D-dimensional Hilbert bijection between distances along
//! the curve and grid coordinates. [`order`] materializes that bijection for a cubic
//! 3D grid as a permutation of flat voxel indices, which is what the binner walks.

pub mod hilbert;
pub mod order;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("A Hilbert curve needs at least one dimension")]
    ZeroDimensions,

    #[error(
        "A Hilbert curve of order {order} in {dimensions} dimension(s) needs {bits} bits per distance (at most 63 supported)"
    )]
    TooManyBits {
        order: u32,
        dimensions: usize,
        bits: u64,
    },

    #[error("Distance {distance} lies outside a curve of {points} points")]
    DistanceOutOfRange { distance: u64, points: u64 },

    #[error("Coordinate {value} on axis {axis} lies outside a curve of side {side}")]
    CoordinateOutOfRange { axis: usize, value: u32, side: u32 },

    #[error("Grid side {side} is not a power of two")]
    SideNotPowerOfTwo { side: usize },

    #[error("A grid of side {side} has more cells than a 32-bit voxel index can address")]
    TooManyCells { side: usize },
}
