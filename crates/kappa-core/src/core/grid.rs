use nalgebra::Point3;

/// Flat index of voxel `(x, y, z)` in a cubic grid of side `nbins` (x-major layout).
#[inline]
pub fn flat_index(nbins: usize, [x, y, z]: [usize; 3]) -> usize {
    (x * nbins + y) * nbins + z
}

/// Bin of a single coordinate in `[0, box_size)` split into `nbins` equal bins.
///
/// Coordinates outside the range (including `box_size` itself) and non-finite values
/// have no bin.
#[inline]
pub fn bin_of(coordinate: f64, nbins: usize, box_size: f64) -> Option<usize> {
    if !coordinate.is_finite() || coordinate < 0.0 || coordinate >= box_size {
        return None;
    }
    let index = (coordinate / box_size * nbins as f64) as usize;
    // Rounding can push values just below the upper edge into a phantom bin.
    Some(index.min(nbins - 1))
}

/// A cubic 3D occupancy histogram.
///
/// Counts how many points fall into each of the `nbins^3` equal-width cells covering
/// `[0, box_size)^3`. Points outside the range are not counted; the number of such
/// points is kept in [`VoxelGrid::dropped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    nbins: usize,
    counts: Vec<u32>,
    dropped: usize,
}

impl VoxelGrid {
    /// Creates an empty grid. `nbins` must be non-zero.
    pub fn new(nbins: usize) -> Self {
        debug_assert!(nbins > 0, "a voxel grid needs at least one bin per axis");
        Self {
            nbins,
            counts: vec![0; nbins * nbins * nbins],
            dropped: 0,
        }
    }

    /// Builds the histogram of `positions` over `[0, box_size)^3`.
    pub fn from_positions<'a, I>(positions: I, nbins: usize, box_size: f64) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut grid = Self::new(nbins);
        for position in positions {
            grid.insert(position, box_size);
        }
        grid
    }

    /// Adds one point. Returns `false` when the point lies outside the grid.
    pub fn insert(&mut self, position: &Point3<f64>, box_size: f64) -> bool {
        let cell = (
            bin_of(position.x, self.nbins, box_size),
            bin_of(position.y, self.nbins, box_size),
            bin_of(position.z, self.nbins, box_size),
        );
        match cell {
            (Some(x), Some(y), Some(z)) => {
                let index = flat_index(self.nbins, [x, y, z]);
                self.counts[index] = self.counts[index].saturating_add(1);
                true
            }
            _ => {
                self.dropped += 1;
                false
            }
        }
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    #[cfg(test)]
    fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        self.counts[flat_index(self.nbins, [x, y, z])]
    }

    /// Number of points that fell outside the binning range.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of points counted in the grid.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
