use crate::core::io::results::CidRecord;
use crate::core::models::particle::PointCloud;
use crate::core::models::simulation_box::SimulationBox;
use crate::engine::binner::SpatialBinner;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::normalization::{NormalizationHarness, NormalizedResult};
use tracing::{debug, info, instrument, warn};

/// A loaded snapshot ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Name reported in results, usually the file name.
    pub source: String,
    pub cloud: PointCloud,
    /// Box side carried by the file itself; overrides the configured box when set.
    pub box_size: Option<f64>,
    /// Box read from the file, kept for reporting even when binning ignores it.
    pub simulation_box: Option<SimulationBox>,
}

impl Snapshot {
    pub fn new(source: impl Into<String>, cloud: PointCloud) -> Self {
        Self {
            source: source.into(),
            cloud,
            box_size: None,
            simulation_box: None,
        }
    }

    pub fn with_box_size(mut self, box_size: f64) -> Self {
        self.box_size = Some(box_size);
        self
    }

    pub fn with_simulation_box(mut self, simulation_box: SimulationBox) -> Self {
        self.simulation_box = Some(simulation_box);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotReport {
    pub source: String,
    pub nbins: usize,
    pub box_size: f64,
    /// Particles left after type filtering.
    pub n_particles: usize,
    pub n_binned: u64,
    pub n_dropped: usize,
    pub result: NormalizedResult,
}

impl From<&SnapshotReport> for CidRecord {
    fn from(report: &SnapshotReport) -> Self {
        CidRecord {
            snapshot: report.source.clone(),
            nbins: report.nbins,
            n_particles: report.n_particles,
            cid: report.result.cid,
            cid_shuffled: report.result.cid_shuffled_mean,
            cid_shuffled_std: report.result.cid_shuffled_std,
            cid_normalized: report.result.cid_normalized,
            compression_gain: report.result.compression_gain,
        }
    }
}

/// Evaluates one snapshot.
///
/// # Errors
///
/// Returns an [`EngineError`] when the configuration is invalid for this snapshot or a
/// voxel count cannot be encoded under the configured overflow policy.
#[instrument(skip_all, name = "analysis_workflow", fields(source = %snapshot.source))]
pub fn run(
    snapshot: &Snapshot,
    config: &AnalysisConfig,
    binner: &SpatialBinner,
) -> Result<SnapshotReport, EngineError> {
    let filtered;
    let cloud = match &config.atom_types {
        Some(types) => {
            filtered = snapshot.cloud.filter_by_types(types);
            debug!(
                kept = filtered.len(),
                total = snapshot.cloud.len(),
                "Applied atom type filter."
            );
            &filtered
        }
        None => &snapshot.cloud,
    };
    if cloud.is_empty() {
        warn!("No particles left to bin; the occupancy sequence will be all zeros.");
    }

    let binning = &config.binning;
    let box_size = snapshot.box_size.unwrap_or(binning.box_size);
    let sequence = binner.bin(cloud, binning.nbins, box_size)?;
    let symbols = sequence.encode(binning.alphabet, binning.overflow)?;

    let result = NormalizationHarness::from_config(&config.normalization).run(&symbols)?;
    info!(
        cid = result.cid,
        cid_normalized = result.cid_normalized,
        "Snapshot evaluated."
    );

    Ok(SnapshotReport {
        source: snapshot.source.clone(),
        nbins: binning.nbins,
        box_size,
        n_particles: cloud.len(),
        n_binned: sequence.binned(),
        n_dropped: sequence.dropped(),
        result,
    })
}
