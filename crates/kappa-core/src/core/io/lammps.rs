use crate::core::io::traits::SnapshotFile;
use crate::core::models::particle::{Particle, PointCloud};
use crate::core::models::simulation_box::SimulationBox;
use phf::{Map, Set, phf_map, phf_set};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKeyword {
    Atoms,
    AtomTypes,
    XBounds,
    YBounds,
    ZBounds,
}

static HEADER_KEYWORDS: Map<&'static str, HeaderKeyword> = phf_map! {
    "atoms" => HeaderKeyword::Atoms,
    "atom types" => HeaderKeyword::AtomTypes,
    "xlo xhi" => HeaderKeyword::XBounds,
    "ylo yhi" => HeaderKeyword::YBounds,
    "zlo zhi" => HeaderKeyword::ZBounds,
};

static SECTION_KEYWORDS: Set<&'static str> = phf_set! {
    "Atoms",
    "Velocities",
    "Masses",
    "Ellipsoids",
    "Lines",
    "Triangles",
    "Bodies",
    "Bonds",
    "Angles",
    "Dihedrals",
    "Impropers",
    "Pair Coeffs",
    "PairIJ Coeffs",
    "Bond Coeffs",
    "Angle Coeffs",
    "Dihedral Coeffs",
    "Improper Coeffs",
    "BondBond Coeffs",
    "BondAngle Coeffs",
    "MiddleBondTorsion Coeffs",
    "EndBondTorsion Coeffs",
    "AngleTorsion Coeffs",
    "AngleAngleTorsion Coeffs",
    "BondBond13 Coeffs",
    "AngleAngle Coeffs",
};

/// Zero-based `(type, x)` column indices per atom style; y and z follow x.
static ATOM_STYLE_COLUMNS: Map<&'static str, (usize, usize)> = phf_map! {
    "full" => (2, 4),
    "atomic" => (1, 2),
    "charge" => (1, 3),
    "molecular" => (2, 3),
    "bond" => (2, 3),
    "angle" => (2, 3),
};

const DEFAULT_ATOM_STYLE: &str = "full";

#[derive(Debug, Clone, PartialEq)]
pub struct LammpsMetadata {
    /// The first line of the file.
    pub title: String,
    /// Atom count declared in the header, if any.
    pub natoms: Option<usize>,
    /// Atom type count declared in the header, if any.
    pub ntypes: Option<usize>,
    pub simulation_box: SimulationBox,
    pub atom_style: String,
}

#[derive(Debug, Error)]
pub enum LammpsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: LammpsParseErrorKind,
    },
    #[error("Missing box bounds for the {axis} axis")]
    MissingBox { axis: char },
    #[error("No Atoms section found")]
    MissingAtoms,
}

#[derive(Debug, Error, PartialEq)]
pub enum LammpsParseErrorKind {
    #[error("Invalid integer '{value}'")]
    InvalidInt { value: String },
    #[error("Invalid float '{value}'")]
    InvalidFloat { value: String },
    #[error("Expected {expected} values before '{keyword}', found {found}")]
    WrongValueCount {
        keyword: String,
        expected: usize,
        found: usize,
    },
    #[error("Atom line has {found} columns, style '{style}' needs at least {expected}")]
    TooFewColumns {
        style: String,
        expected: usize,
        found: usize,
    },
    #[error("Unsupported atom style '{style}'")]
    UnsupportedAtomStyle { style: String },
}

fn strip_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((content, comment)) => (content.trim(), Some(comment.trim())),
        None => (line.trim(), None),
    }
}

fn parse_usize(value: &str, line: usize) -> Result<usize, LammpsError> {
    value.parse().map_err(|_| LammpsError::Parse {
        line,
        kind: LammpsParseErrorKind::InvalidInt {
            value: value.into(),
        },
    })
}

fn parse_f64(value: &str, line: usize) -> Result<f64, LammpsError> {
    value.parse().map_err(|_| LammpsError::Parse {
        line,
        kind: LammpsParseErrorKind::InvalidFloat {
            value: value.into(),
        },
    })
}

/// Splits a header line into its leading numeric values and trailing keyword.
fn split_header(content: &str) -> (Vec<&str>, String) {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let split = tokens
        .iter()
        .position(|t| t.parse::<f64>().is_err())
        .unwrap_or(tokens.len());
    (tokens[..split].to_vec(), tokens[split..].join(" "))
}

#[derive(Default)]
struct Header {
    natoms: Option<usize>,
    ntypes: Option<usize>,
    bounds: [Option<(f64, f64)>; 3],
}

impl Header {
    fn apply(&mut self, content: &str, line: usize) -> Result<(), LammpsError> {
        let (values, keyword) = split_header(content);
        let Some(&kind) = HEADER_KEYWORDS.get(keyword.as_str()) else {
            debug!(line, keyword = %keyword, "Ignoring LAMMPS header line");
            return Ok(());
        };

        let expected = match kind {
            HeaderKeyword::Atoms | HeaderKeyword::AtomTypes => 1,
            _ => 2,
        };
        if values.len() != expected {
            return Err(LammpsError::Parse {
                line,
                kind: LammpsParseErrorKind::WrongValueCount {
                    keyword,
                    expected,
                    found: values.len(),
                },
            });
        }

        match kind {
            HeaderKeyword::Atoms => self.natoms = Some(parse_usize(values[0], line)?),
            HeaderKeyword::AtomTypes => self.ntypes = Some(parse_usize(values[0], line)?),
            HeaderKeyword::XBounds | HeaderKeyword::YBounds | HeaderKeyword::ZBounds => {
                let axis = match kind {
                    HeaderKeyword::XBounds => 0,
                    HeaderKeyword::YBounds => 1,
                    _ => 2,
                };
                self.bounds[axis] = Some((parse_f64(values[0], line)?, parse_f64(values[1], line)?));
            }
        }
        Ok(())
    }

    fn simulation_box(&self) -> Result<SimulationBox, LammpsError> {
        let mut lo = [0.0; 3];
        let mut hi = [0.0; 3];
        for (axis, name) in ['x', 'y', 'z'].into_iter().enumerate() {
            let (l, h) = self.bounds[axis].ok_or(LammpsError::MissingBox { axis: name })?;
            lo[axis] = l;
            hi[axis] = h;
        }
        Ok(SimulationBox::new(lo, hi))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    OtherSection,
    AtomsLeadIn,
    Atoms,
}

/// LAMMPS data files (`write_data` output and hand-written inputs).
///
/// Only the header counts, the orthogonal box and the `Atoms` section are read; every
/// other section is skipped. The atom style is taken from the comment after the
/// `Atoms` keyword and defaults to `full`.
pub struct LammpsDataFile;

impl SnapshotFile for LammpsDataFile {
    type Metadata = LammpsMetadata;
    type Error = LammpsError;

    fn read_from(reader: &mut impl BufRead) -> Result<(PointCloud, Self::Metadata), Self::Error> {
        let mut lines = reader.lines().enumerate();
        let title = match lines.next() {
            Some((_, line)) => line?.trim().to_string(),
            None => return Err(LammpsError::MissingAtoms),
        };

        let mut header = Header::default();
        let mut state = State::Header;
        let mut style = DEFAULT_ATOM_STYLE.to_string();
        let mut columns = (2, 4);
        let mut cloud = PointCloud::new();
        let mut saw_atoms = false;

        for (line_num, line_res) in lines {
            let line = line_res?;
            let line_num = line_num + 1;
            let (content, comment) = strip_comment(&line);

            if SECTION_KEYWORDS.contains(content) {
                if content == "Atoms" {
                    if saw_atoms {
                        warn!(line = line_num, "Duplicate Atoms section; appending particles");
                    }
                    saw_atoms = true;
                    style = comment
                        .and_then(|c| c.split_whitespace().next())
                        .unwrap_or(DEFAULT_ATOM_STYLE)
                        .to_string();
                    columns = *ATOM_STYLE_COLUMNS.get(style.as_str()).ok_or_else(|| {
                        LammpsError::Parse {
                            line: line_num,
                            kind: LammpsParseErrorKind::UnsupportedAtomStyle {
                                style: style.clone(),
                            },
                        }
                    })?;
                    state = State::AtomsLeadIn;
                } else {
                    state = State::OtherSection;
                }
                continue;
            }

            match state {
                State::Header => {
                    if !content.is_empty() {
                        header.apply(content, line_num)?;
                    }
                }
                State::OtherSection => {}
                State::AtomsLeadIn | State::Atoms => {
                    if content.is_empty() {
                        if state == State::Atoms {
                            state = State::OtherSection;
                        }
                        continue;
                    }
                    state = State::Atoms;
                    cloud.push(parse_atom(content, &style, columns, line_num)?);
                }
            }
        }

        let simulation_box = header.simulation_box()?;
        if !saw_atoms {
            return Err(LammpsError::MissingAtoms);
        }
        if let Some(natoms) = header.natoms {
            if natoms != cloud.len() {
                warn!(
                    declared = natoms,
                    read = cloud.len(),
                    "Atom count in LAMMPS header does not match the Atoms section"
                );
            }
        }

        let metadata = LammpsMetadata {
            title,
            natoms: header.natoms,
            ntypes: header.ntypes,
            simulation_box,
            atom_style: style,
        };
        Ok((cloud, metadata))
    }
}

fn parse_atom(
    content: &str,
    style: &str,
    (type_col, x_col): (usize, usize),
    line: usize,
) -> Result<Particle, LammpsError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    let expected = x_col + 3;
    if parts.len() < expected {
        return Err(LammpsError::Parse {
            line,
            kind: LammpsParseErrorKind::TooFewColumns {
                style: style.into(),
                expected,
                found: parts.len(),
            },
        });
    }

    let type_id = parts[type_col]
        .parse::<u32>()
        .map_err(|_| LammpsError::Parse {
            line,
            kind: LammpsParseErrorKind::InvalidInt {
                value: parts[type_col].into(),
            },
        })?;
    let x = parse_f64(parts[x_col], line)?;
    let y = parse_f64(parts[x_col + 1], line)?;
    let z = parse_f64(parts[x_col + 2], line)?;
    Ok(Particle::new(type_id, x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::io::{BufReader, Cursor, Write};
    use tempfile::NamedTempFile;

    const FULL_DATA: &str = "\
LAMMPS data file via write_data, timestep = 1000

4 atoms
2 atom types
3 bonds

-5.0 70.0 xlo xhi
0.0 75.0 ylo yhi
0.0 75.0 zlo zhi

Masses

1 65.38
2 12.011

Atoms # full

1 1 1 0.0 1.0 2.0 3.0 0 0 0
2 1 2 0.0 4.0 5.0 6.0
3 2 1 0.5 7.0 8.0 9.0
4 2 2 -0.5 10.0 11.0 12.0

Velocities

1 0.0 0.0 0.0
";

    fn read(content: &str) -> Result<(PointCloud, LammpsMetadata), LammpsError> {
        LammpsDataFile::read_from(&mut BufReader::new(Cursor::new(content)))
    }

    #[test]
    fn reads_full_style_data_file() {
        let (cloud, metadata) = read(FULL_DATA).unwrap();

        assert_eq!(cloud.len(), 4);
        assert_eq!(cloud.particles()[0].type_id, 1);
        assert_eq!(cloud.particles()[0].position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.particles()[3].type_id, 2);
        assert_eq!(cloud.particles()[3].position, Point3::new(10.0, 11.0, 12.0));

        assert_eq!(metadata.title, "LAMMPS data file via write_data, timestep = 1000");
        assert_eq!(metadata.natoms, Some(4));
        assert_eq!(metadata.ntypes, Some(2));
        assert_eq!(metadata.atom_style, "full");
        assert_eq!(metadata.simulation_box.lo, [-5.0, 0.0, 0.0]);
        assert_eq!(metadata.simulation_box.hi, [70.0, 75.0, 75.0]);
    }

    #[test]
    fn atoms_section_without_style_defaults_to_full() {
        let content = FULL_DATA.replace("Atoms # full", "Atoms");
        let (cloud, metadata) = read(&content).unwrap();
        assert_eq!(cloud.len(), 4);
        assert_eq!(metadata.atom_style, "full");
    }

    #[test]
    fn reads_atomic_style_columns() {
        let content = "\
title

2 atoms
0 10 xlo xhi
0 10 ylo yhi
0 10 zlo zhi

Atoms # atomic

1 3 1.5 2.5 3.5
2 1 4.5 5.5 6.5
";
        let (cloud, metadata) = read(content).unwrap();
        assert_eq!(metadata.atom_style, "atomic");
        assert_eq!(cloud.particles()[0].type_id, 3);
        assert_eq!(cloud.particles()[0].position, Point3::new(1.5, 2.5, 3.5));
        assert_eq!(cloud.particles()[1].position, Point3::new(4.5, 5.5, 6.5));
    }

    #[test]
    fn atoms_section_ends_at_next_section_keyword_without_blank_line() {
        let content = "\
title
0 1 xlo xhi
0 1 ylo yhi
0 1 zlo zhi
Atoms
1 1 1 0.0 0.1 0.2 0.3
Velocities
1 9 9 9
";
        let (cloud, _) = read(content).unwrap();
        assert_eq!(cloud.len(), 1);
    }

    #[test]
    fn count_mismatch_is_not_fatal() {
        let content = FULL_DATA.replace("4 atoms", "5 atoms");
        let (cloud, metadata) = read(&content).unwrap();
        assert_eq!(cloud.len(), 4);
        assert_eq!(metadata.natoms, Some(5));
    }

    #[test]
    fn missing_box_is_an_error() {
        let content = FULL_DATA.replace("0.0 75.0 zlo zhi", "");
        assert!(matches!(
            read(&content),
            Err(LammpsError::MissingBox { axis: 'z' })
        ));
    }

    #[test]
    fn missing_atoms_section_is_an_error() {
        let content = "title\n\n0 1 xlo xhi\n0 1 ylo yhi\n0 1 zlo zhi\n\nMasses\n\n1 1.0\n";
        assert!(matches!(read(content), Err(LammpsError::MissingAtoms)));
    }

    #[test]
    fn empty_file_is_missing_atoms() {
        assert!(matches!(read(""), Err(LammpsError::MissingAtoms)));
    }

    #[test]
    fn malformed_coordinate_reports_line_number() {
        let content = FULL_DATA.replace("4.0 5.0 6.0", "4.0 five 6.0");
        match read(&content).unwrap_err() {
            LammpsError::Parse { line, kind } => {
                assert_eq!(line, 19);
                assert_eq!(
                    kind,
                    LammpsParseErrorKind::InvalidFloat {
                        value: "five".into()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_atom_line_is_an_error() {
        let content = FULL_DATA.replace("2 1 2 0.0 4.0 5.0 6.0", "2 1 2 0.0 4.0");
        assert!(matches!(
            read(&content),
            Err(LammpsError::Parse {
                line: 19,
                kind: LammpsParseErrorKind::TooFewColumns { expected: 7, found: 5, .. }
            })
        ));
    }

    #[test]
    fn unsupported_style_is_an_error() {
        let content = FULL_DATA.replace("Atoms # full", "Atoms # sphere");
        assert!(matches!(
            read(&content),
            Err(LammpsError::Parse {
                kind: LammpsParseErrorKind::UnsupportedAtomStyle { .. },
                ..
            })
        ));
    }

    #[test]
    fn bounds_with_wrong_value_count_are_rejected() {
        let content = FULL_DATA.replace("-5.0 70.0 xlo xhi", "70.0 xlo xhi");
        assert!(matches!(
            read(&content),
            Err(LammpsError::Parse {
                line: 7,
                kind: LammpsParseErrorKind::WrongValueCount { expected: 2, found: 1, .. }
            })
        ));
    }

    #[test]
    fn reads_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL_DATA.as_bytes()).unwrap();
        let (cloud, _) = LammpsDataFile::read_from_path(file.path()).unwrap();
        assert_eq!(cloud.len(), 4);
    }
}
