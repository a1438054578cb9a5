use crate::core::io::traits::SnapshotFile;
use crate::core::models::particle::{Particle, PointCloud};
use std::io::{self, BufRead};
use thiserror::Error;

/// Comment lines found in an xyz snapshot, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    pub comments: Vec<String>,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Snapshot contains no particles")]
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzParseErrorKind {
    #[error("Expected at least 4 columns (type x y z), found {found}")]
    TooFewColumns { found: usize },
    #[error("Invalid particle type '{value}' (expected a non-negative integer)")]
    InvalidType { value: String },
    #[error("Invalid float in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
}

/// Plain whitespace-separated snapshots: one `type x y z` row per particle.
///
/// Lines starting with `#` are comments and blank lines are ignored. Columns after the
/// fourth are ignored. The type column may be written as an integral float (`1.0`),
/// as produced by tools that dump the whole table in floating point.
pub struct XyzFile;

fn parse_type(value: &str) -> Option<u32> {
    if let Ok(t) = value.parse::<u32>() {
        return Some(t);
    }
    let float: f64 = value.parse().ok()?;
    (float >= 0.0 && float.fract() == 0.0 && float <= f64::from(u32::MAX)).then_some(float as u32)
}

impl SnapshotFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<(PointCloud, Self::Metadata), Self::Error> {
        let mut cloud = PointCloud::new();
        let mut metadata = XyzMetadata::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                metadata.comments.push(comment.trim().to_string());
                continue;
            }

            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::TooFewColumns { found: parts.len() },
                });
            }

            let type_id = parse_type(parts[0]).ok_or_else(|| XyzError::Parse {
                line: line_num,
                kind: XyzParseErrorKind::InvalidType {
                    value: parts[0].into(),
                },
            })?;

            let mut coords = [0.0f64; 3];
            for (axis, coord) in coords.iter_mut().enumerate() {
                let value = parts[axis + 1];
                *coord = value.parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidFloat {
                        column: axis + 2,
                        value: value.into(),
                    },
                })?;
            }

            cloud.push(Particle::new(type_id, coords[0], coords[1], coords[2]));
        }

        if cloud.is_empty() {
            return Err(XyzError::Empty);
        }
        Ok((cloud, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::io::{BufReader, Cursor, Write};
    use tempfile::NamedTempFile;

    fn read(content: &str) -> Result<(PointCloud, XyzMetadata), XyzError> {
        XyzFile::read_from(&mut BufReader::new(Cursor::new(content)))
    }

    #[test]
    fn reads_particles_and_comments() {
        let content = "# type x y z\n1 10.5 20.3 15.2\n\n2 1.0 2.0 3.0\n";
        let (cloud, metadata) = read(content).unwrap();

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.particles()[0].type_id, 1);
        assert_eq!(cloud.particles()[0].position, Point3::new(10.5, 20.3, 15.2));
        assert_eq!(cloud.particles()[1].type_id, 2);
        assert_eq!(metadata.comments, vec!["type x y z".to_string()]);
    }

    #[test]
    fn accepts_integral_float_types_and_extra_columns() {
        let (cloud, _) = read("1.0 0.5 0.5 0.5 99 extra\n").unwrap();
        assert_eq!(cloud.particles()[0].type_id, 1);
    }

    #[test]
    fn accepts_scientific_notation() {
        let (cloud, _) = read("3 1e1 -2.5E-1 0\n").unwrap();
        assert_eq!(cloud.particles()[0].position, Point3::new(10.0, -0.25, 0.0));
    }

    #[test]
    fn rejects_rows_with_too_few_columns() {
        let err = read("1 0.0 0.0 0.0\n1 2.0 3.0\n").unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 2);
                assert_eq!(kind, XyzParseErrorKind::TooFewColumns { found: 3 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_fractional_types() {
        let err = read("1.5 0.0 0.0 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidType { .. }
            }
        ));
    }

    #[test]
    fn rejects_invalid_coordinates_with_column_number() {
        let err = read("1 0.0 abc 0.0\n").unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 1);
                assert_eq!(
                    kind,
                    XyzParseErrorKind::InvalidFloat {
                        column: 3,
                        value: "abc".into()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_snapshots_without_particles() {
        assert!(matches!(read("# only a comment\n\n"), Err(XyzError::Empty)));
    }

    #[test]
    fn reads_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1 1.0 1.0 1.0").unwrap();
        writeln!(file, "1 2.0 2.0 2.0").unwrap();

        let (cloud, _) = XyzFile::read_from_path(file.path()).unwrap();
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = XyzFile::read_from_path("/definitely/not/here.xyz").unwrap_err();
        assert!(matches!(err, XyzError::Io(_)));
    }
}
