use super::cache::CurveOrderCache;
use super::config::{validate_box_size, validate_resolution};
use super::error::EngineError;
use super::symbols::SymbolSequence;
use crate::core::grid::VoxelGrid;
use crate::core::models::particle::PointCloud;
use tracing::{debug, instrument, warn};

/// Converts particle snapshots into Hilbert-ordered occupancy sequences.
///
/// Owns the [`CurveOrderCache`], so one binner should be shared by every evaluation
/// of a run.
#[derive(Debug, Default)]
pub struct SpatialBinner {
    cache: CurveOrderCache,
}

impl SpatialBinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &CurveOrderCache {
        &self.cache
    }

    /// Histograms `cloud` over `[0, box_size)^3` with `nbins` bins per axis and reads the
    /// counts along the Hilbert curve.
    ///
    /// The result always has `nbins^3` entries. Points outside the box are excluded and
    /// counted in [`SymbolSequence::dropped`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when `nbins` is not a supported power of two or
    /// `box_size` is not finite and positive.
    #[instrument(level = "debug", skip(self, cloud), fields(particles = cloud.len()))]
    pub fn bin(
        &self,
        cloud: &PointCloud,
        nbins: usize,
        box_size: f64,
    ) -> Result<SymbolSequence, EngineError> {
        validate_resolution(nbins)?;
        validate_box_size(box_size)?;

        let order = self.cache.get_or_build(nbins)?;
        let grid = VoxelGrid::from_positions(cloud.positions(), nbins, box_size);

        if grid.dropped() > 0 {
            warn!(
                dropped = grid.dropped(),
                total = cloud.len(),
                box_size,
                "Particles outside the binning box were excluded."
            );
        }

        let counts: Vec<u32> = order.linearize(grid.counts()).collect();
        debug!(
            cells = counts.len(),
            max_count = grid.max_count(),
            "Occupancy sequence built."
        );
        Ok(SymbolSequence::new(counts, nbins, grid.dropped()))
    }
}
