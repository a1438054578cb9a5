use super::CurveError;
use super::hilbert::HilbertCurve3;
use crate::core::grid::flat_index;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The Hilbert visiting order of a cubic voxel grid.
///
/// `cells()[d]` is the flat voxel index (see [`flat_index`]) of the cell at distance `d`
/// along the curve. The order depends only on `nbins` and is a bijection over
/// `[0, nbins^3)`, so one instance can be shared by every snapshot binned at that
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveOrder {
    nbins: usize,
    cells: Vec<u32>,
}

impl CurveOrder {
    /// Materializes the order for a grid of side `nbins`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::SideNotPowerOfTwo`] when `nbins` is not a power of two and
    /// [`CurveError::TooManyCells`] when `nbins^3` does not fit a 32-bit voxel index.
    #[instrument(level = "debug", name = "curve_order_build")]
    pub fn new(nbins: usize) -> Result<Self, CurveError> {
        if !nbins.is_power_of_two() {
            return Err(CurveError::SideNotPowerOfTwo { side: nbins });
        }
        let order = nbins.trailing_zeros();
        if order * 3 > 32 {
            return Err(CurveError::TooManyCells { side: nbins });
        }
        let curve = HilbertCurve3::new(order)?;

        #[cfg(not(feature = "parallel"))]
        let distances = 0..curve.num_points() as usize;

        #[cfg(feature = "parallel")]
        let distances = (0..curve.num_points() as usize).into_par_iter();

        let cells = distances
            .map(|d| {
                curve.point_from_distance(d as u64).map(|[x, y, z]| {
                    flat_index(nbins, [x as usize, y as usize, z as usize]) as u32
                })
            })
            .collect::<Result<Vec<u32>, CurveError>>()?;

        debug!(nbins, cells = cells.len(), "Curve order materialized.");
        Ok(Self { nbins, cells })
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Number of voxels, `nbins^3`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Voxel coordinates of the cell at distance `d`.
    #[cfg(test)]
    fn coords(&self, d: usize) -> Option<[usize; 3]> {
        let flat = *self.cells.get(d)? as usize;
        let n = self.nbins;
        Some([flat / (n * n), (flat / n) % n, flat % n])
    }

    /// Reads `values` (laid out by [`flat_index`]) in curve order.
    pub fn linearize<'a, T: Copy>(&'a self, values: &'a [T]) -> impl Iterator<Item = T> + 'a {
        debug_assert_eq!(values.len(), self.cells.len());
        self.cells.iter().map(move |&cell| values[cell as usize])
    }
}
