use crate::cli::AnalyzeArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::input::load_snapshot;
use crate::utils::progress::CliProgressHandler;
use kappa::core::io::results::{self, CidRecord};
use kappa::core::models::simulation_box::SimulationBox;
use kappa::engine::config::AnalysisConfig;
use kappa::engine::progress::ProgressReporter;
use kappa::workflows::analyze::Snapshot;
use kappa::workflows::batch::{self, default_max_in_flight};
use tracing::{error, info};

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.analysis, None)?;
    let format = app.format;
    let use_file_box = !app.box_size_explicit;
    let max_in_flight = app.max_in_flight.unwrap_or_else(default_max_in_flight);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Evaluating {} snapshot(s)...", args.inputs.len());
    let outcome = tokio::task::block_in_place(|| {
        batch::run(
            &args.inputs,
            |path| -> Result<Snapshot> {
                let snapshot = load_snapshot(path, format, use_file_box)?;
                info!("{}", structure_summary(&snapshot, &app.core_config));
                Ok(snapshot)
            },
            &app.core_config,
            max_in_flight,
            &reporter,
        )
    });

    let mut records: Vec<CidRecord> = outcome.reports.iter().map(CidRecord::from).collect();
    results::sort_by_snapshot_number(&mut records);
    super::print_records_table(&records);

    if let Some(output) = &args.output {
        results::write_records_to_path(output, &records).map_err(|e| CliError::FileParsing {
            path: output.clone(),
            source: e.into(),
        })?;
        println!("Results written to: {}", output.display());
    }

    for failure in &outcome.failures {
        error!("{}", failure);
    }
    if outcome.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Other(anyhow::anyhow!(
            "{} of {} snapshot(s) failed",
            outcome.failures.len(),
            args.inputs.len()
        )))
    }
}

/// Particle and type counts, box lengths and bin width of a loaded snapshot.
fn structure_summary(snapshot: &Snapshot, config: &AnalysisConfig) -> String {
    let binning = &config.binning;
    let side = snapshot.box_size.unwrap_or(binning.box_size);
    let [lx, ly, lz] = snapshot
        .simulation_box
        .unwrap_or_else(|| SimulationBox::cubic(side))
        .lengths();
    let type_counts = snapshot.cloud.type_counts();

    let mut lines = vec![format!(
        "{}: {} particle(s), {} type(s)",
        snapshot.source,
        snapshot.cloud.len(),
        type_counts.len()
    )];
    for (type_id, count) in &type_counts {
        lines.push(format!("  type {type_id}: {count}"));
    }
    lines.push(format!("  box: {lx:.3} x {ly:.3} x {lz:.3}"));
    lines.push(format!(
        "  bin width: {:.3} ({} bins per axis)",
        side / binning.nbins as f64,
        binning.nbins
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kappa::core::models::particle::{Particle, PointCloud};
    use kappa::engine::config::AnalysisConfigBuilder;

    fn cloud() -> PointCloud {
        vec![
            Particle::new(2, 1.0, 1.0, 1.0),
            Particle::new(1, 2.0, 2.0, 2.0),
            Particle::new(2, 3.0, 3.0, 3.0),
        ]
        .into()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfigBuilder::new().nbins(8).box_size(16.0).build().unwrap()
    }

    #[test]
    fn summary_lists_types_box_and_bin_width() {
        let snapshot = Snapshot::new("frame.data", cloud())
            .with_simulation_box(SimulationBox::new([0.0; 3], [20.0, 20.0, 24.0]))
            .with_box_size(20.0);

        let summary = structure_summary(&snapshot, &config());
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines,
            vec![
                "frame.data: 3 particle(s), 2 type(s)",
                "  type 1: 1",
                "  type 2: 2",
                "  box: 20.000 x 20.000 x 24.000",
                "  bin width: 2.500 (8 bins per axis)",
            ]
        );
    }

    #[test]
    fn summary_falls_back_to_the_configured_cube() {
        let snapshot = Snapshot::new("snapshot_1.xyz", cloud());
        let summary = structure_summary(&snapshot, &config());
        assert!(summary.contains("  box: 16.000 x 16.000 x 16.000"));
        assert!(summary.ends_with("  bin width: 2.000 (8 bins per axis)"));
    }
}
