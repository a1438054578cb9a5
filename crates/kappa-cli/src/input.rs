use crate::error::{CliError, Result};
use clap::ValueEnum;
use kappa::core::io::lammps::LammpsDataFile;
use kappa::core::io::traits::SnapshotFile;
use kappa::core::io::xyz::XyzFile;
use kappa::workflows::batch::snapshot_name;
use kappa::workflows::analyze::Snapshot;
use nalgebra::Vector3;
use std::path::Path;
use tracing::{debug, warn};

const BOX_CUBIC_TOLERANCE: f64 = 1e-6;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Whitespace-separated 'type x y z' rows
    Xyz,
    /// LAMMPS data file
    Lammps,
}

/// Guesses the format of `path` from its extension.
pub fn detect_format(path: &Path) -> Result<InputFormat> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("xyz") => Ok(InputFormat::Xyz),
        Some("data" | "lmp" | "lammps") => Ok(InputFormat::Lammps),
        _ => Err(CliError::Argument(format!(
            "Cannot detect the format of '{}'; pass --format xyz|lammps.",
            path.display()
        ))),
    }
}

/// Reads one snapshot.
///
/// LAMMPS clouds are shifted so the box starts at the origin. Their box side is
/// attached to the snapshot unless `use_file_box` is false.
pub fn load_snapshot(
    path: &Path,
    format: Option<InputFormat>,
    use_file_box: bool,
) -> Result<Snapshot> {
    let format = match format {
        Some(format) => format,
        None => detect_format(path)?,
    };
    let name = snapshot_name(path);
    debug!(path = %path.display(), ?format, "Loading snapshot.");

    match format {
        InputFormat::Xyz => {
            let (cloud, _) = XyzFile::read_from_path(path).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
            Ok(Snapshot::new(name, cloud))
        }
        InputFormat::Lammps => {
            let (mut cloud, metadata) =
                LammpsDataFile::read_from_path(path).map_err(|e| CliError::FileParsing {
                    path: path.to_path_buf(),
                    source: e.into(),
                })?;
            let simulation_box = metadata.simulation_box;
            let [xlo, ylo, zlo] = simulation_box.lo;
            cloud.translate(&Vector3::new(-xlo, -ylo, -zlo));

            let snapshot = Snapshot::new(name, cloud).with_simulation_box(simulation_box);
            if !use_file_box {
                return Ok(snapshot);
            }
            if !simulation_box.is_cubic(BOX_CUBIC_TOLERANCE) {
                warn!(
                    path = %path.display(),
                    lengths = ?simulation_box.lengths(),
                    "Box is not cubic; binning with its x length."
                );
            }
            Ok(snapshot.with_box_size(simulation_box.cubic_side()))
        }
    }
}
