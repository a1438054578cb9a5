use crate::cli::BatchArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::input::load_snapshot;
use crate::utils::progress::CliProgressHandler;
use kappa::core::io::results::{self, CidRecord};
use kappa::engine::progress::ProgressReporter;
use kappa::engine::utils::stats::Summary;
use kappa::workflows::batch::{self, default_max_in_flight};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Files in `dir` matching `pattern`, sorted by the number in their name.
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::Argument(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }
    let full_pattern = dir.join(pattern);
    let mut paths: Vec<PathBuf> = glob::glob(&full_pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .collect();
    paths.sort_by(|a, b| {
        let name_a = batch::snapshot_name(a);
        let name_b = batch::snapshot_name(b);
        results::snapshot_number(&name_a)
            .unwrap_or(u64::MAX)
            .cmp(&results::snapshot_number(&name_b).unwrap_or(u64::MAX))
            .then_with(|| name_a.cmp(&name_b))
    });
    Ok(paths)
}

pub async fn run(args: BatchArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.analysis, Some(&args.batch))?;

    let paths = discover(&args.dir, &app.pattern)?;
    if paths.is_empty() {
        return Err(CliError::Argument(format!(
            "No files matching '{}' in '{}'",
            app.pattern,
            args.dir.display()
        )));
    }
    println!("Found {} snapshot(s) in {}", paths.len(), args.dir.display());

    let format = app.format;
    let use_file_box = !app.box_size_explicit;
    let max_in_flight = app.max_in_flight.unwrap_or_else(default_max_in_flight);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcome = tokio::task::block_in_place(|| {
        batch::run(
            &paths,
            |path| load_snapshot(path, format, use_file_box),
            &app.core_config,
            max_in_flight,
            &reporter,
        )
    });

    for failure in &outcome.failures {
        warn!("{}", failure);
    }
    if outcome.reports.is_empty() {
        return Err(CliError::Other(anyhow::anyhow!(
            "All {} snapshot(s) failed",
            paths.len()
        )));
    }

    let records: Vec<CidRecord> = outcome.reports.iter().map(CidRecord::from).collect();
    results::write_records_to_path(&args.output, &records).map_err(|e| {
        CliError::FileParsing {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;
    println!(
        "Results for {} snapshot(s) written to: {}",
        records.len(),
        args.output.display()
    );
    if !outcome.failures.is_empty() {
        println!("Warning: {} snapshot(s) failed.", outcome.failures.len());
    }

    print_summary(&records);
    Ok(())
}

fn print_summary(records: &[CidRecord]) {
    let columns: [(&str, fn(&CidRecord) -> f64); 3] = [
        ("cid", |r| r.cid),
        ("cid_normalized", |r| r.cid_normalized),
        ("compression_gain", |r| r.compression_gain),
    ];

    println!();
    println!(
        "{:<18} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "metric", "count", "mean", "std", "min", "max"
    );
    for (name, get) in columns {
        let values: Vec<f64> = records.iter().map(get).collect();
        if let Some(s) = Summary::of(&values) {
            println!(
                "{:<18} {:>6} {:>10.6} {:>10.6} {:>10.6} {:>10.6}",
                name, s.count, s.mean, s.std, s.min, s.max
            );
        }
    }
}
