use super::analyze::{self, Snapshot, SnapshotReport};
use crate::engine::binner::SpatialBinner;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::error::Error;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A snapshot that could not be evaluated.
#[derive(Debug, Error)]
pub enum BatchError<E: Error + 'static> {
    #[error("Failed to load snapshot '{name}': {error}")]
    Load {
        name: String,
        #[source]
        error: E,
    },
    #[error("Failed to evaluate snapshot '{name}': {error}")]
    Engine {
        name: String,
        #[source]
        error: EngineError,
    },
}

impl<E: Error + 'static> BatchError<E> {
    pub fn snapshot(&self) -> &str {
        match self {
            BatchError::Load { name, .. } | BatchError::Engine { name, .. } => name,
        }
    }
}

#[derive(Debug)]
pub struct BatchOutcome<E: Error + 'static> {
    /// Successful evaluations, in input order.
    pub reports: Vec<SnapshotReport>,
    pub failures: Vec<BatchError<E>>,
}

impl<E: Error + 'static> BatchOutcome<E> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Number of snapshots evaluated at once when the caller does not say.
pub fn default_max_in_flight() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Display name of a snapshot file: its file name, or the whole path if it has none.
pub fn snapshot_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Loads and evaluates every file in `inputs`.
///
/// Files are processed in chunks of `max_in_flight`, so at most that many snapshots and
/// symbol sequences are held in memory at a time. A failing snapshot is recorded in
/// [`BatchOutcome::failures`] and the rest of the batch continues.
#[instrument(skip_all, name = "batch_workflow", fields(inputs = inputs.len(), max_in_flight = max_in_flight))]
pub fn run<P, E, F>(
    inputs: &[P],
    load: F,
    config: &AnalysisConfig,
    max_in_flight: usize,
    reporter: &ProgressReporter,
) -> BatchOutcome<E>
where
    P: AsRef<Path> + Sync,
    E: Error + Send + 'static,
    F: Fn(&Path) -> Result<Snapshot, E> + Sync,
{
    let max_in_flight = max_in_flight.max(1);
    let binner = SpatialBinner::new();
    let mut outcome = BatchOutcome {
        reports: Vec::with_capacity(inputs.len()),
        failures: Vec::new(),
    };

    reporter.report(Progress::BatchStart {
        total: inputs.len() as u64,
    });
    info!(
        "Evaluating {} snapshot(s), {} at a time.",
        inputs.len(),
        max_in_flight
    );

    for chunk in inputs.chunks(max_in_flight) {
        #[cfg(not(feature = "parallel"))]
        let iterator = chunk.iter();

        #[cfg(feature = "parallel")]
        let iterator = chunk.par_iter();

        let results: Vec<Result<SnapshotReport, BatchError<E>>> = iterator
            .map(|input| evaluate_one(input.as_ref(), &load, config, &binner, reporter))
            .collect();

        for result in results {
            match result {
                Ok(report) => outcome.reports.push(report),
                Err(error) => {
                    warn!(snapshot = error.snapshot(), "{}", error);
                    outcome.failures.push(error);
                }
            }
        }
    }

    reporter.report(Progress::BatchFinish {
        succeeded: outcome.reports.len(),
        failed: outcome.failures.len(),
    });
    info!(
        succeeded = outcome.reports.len(),
        failed = outcome.failures.len(),
        "Batch finished."
    );
    outcome
}

fn evaluate_one<E, F>(
    path: &Path,
    load: &F,
    config: &AnalysisConfig,
    binner: &SpatialBinner,
    reporter: &ProgressReporter,
) -> Result<SnapshotReport, BatchError<E>>
where
    E: Error + 'static,
    F: Fn(&Path) -> Result<Snapshot, E>,
{
    let name = snapshot_name(path);
    reporter.report(Progress::SnapshotStart {
        source: name.clone(),
    });

    let result = load(path)
        .map_err(|error| BatchError::Load {
            name: name.clone(),
            error,
        })
        .and_then(|snapshot| {
            analyze::run(&snapshot, config, binner).map_err(|error| BatchError::Engine {
                name: name.clone(),
                error,
            })
        });

    if let Ok(report) = &result {
        if report.n_dropped > 0 {
            reporter.report(Progress::Message(format!(
                "{}: {} particle(s) outside [0, {}) were not binned",
                report.source, report.n_dropped, report.box_size
            )));
        }
    }

    reporter.report(Progress::SnapshotFinish {
        source: name,
        cid_normalized: result.as_ref().ok().map(|r| r.result.cid_normalized),
    });
    result
}
