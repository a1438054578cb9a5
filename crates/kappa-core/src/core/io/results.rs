use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

/// One row of a results table: the metrics of a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CidRecord {
    pub snapshot: String,
    pub nbins: usize,
    pub n_particles: usize,
    pub cid: f64,
    pub cid_shuffled: f64,
    pub cid_shuffled_std: f64,
    pub cid_normalized: f64,
    pub compression_gain: f64,
}

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Returns the first run of ASCII digits in `name`, e.g. `12` for `snapshot_12.xyz`.
pub fn snapshot_number(name: &str) -> Option<u64> {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn compare_snapshots(a: &str, b: &str) -> Ordering {
    match (snapshot_number(a), snapshot_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Orders records by the number embedded in their snapshot name.
///
/// Unnumbered snapshots go last, sorted by name.
pub fn sort_by_snapshot_number(records: &mut [CidRecord]) {
    records.sort_by(|a, b| compare_snapshots(&a.snapshot, &b.snapshot));
}

pub fn write_records<W: Write>(writer: W, records: &[CidRecord]) -> Result<(), ResultsError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Sorts and writes `records` to a CSV file at `path`, replacing any existing file.
pub fn write_records_to_path<P: AsRef<Path>>(
    path: P,
    records: &[CidRecord],
) -> Result<(), ResultsError> {
    let mut sorted = records.to_vec();
    sort_by_snapshot_number(&mut sorted);
    let file = File::create(path)?;
    write_records(file, &sorted)
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<CidRecord>, ResultsError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records = csv_reader
        .deserialize()
        .collect::<Result<Vec<CidRecord>, csv::Error>>()?;
    Ok(records)
}

pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CidRecord>, ResultsError> {
    read_records(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, cid: f64) -> CidRecord {
        CidRecord {
            snapshot: name.to_string(),
            nbins: 32,
            n_particles: 100,
            cid,
            cid_shuffled: 0.5,
            cid_shuffled_std: 0.01,
            cid_normalized: cid / 0.5,
            compression_gain: 1.0 - cid / 0.5,
        }
    }

    #[test]
    fn snapshot_number_takes_first_integer() {
        assert_eq!(snapshot_number("snapshot_12.xyz"), Some(12));
        assert_eq!(snapshot_number("run3_snapshot_40.xyz"), Some(3));
        assert_eq!(snapshot_number("final.xyz"), None);
    }

    #[test]
    fn sorts_numerically_with_unnumbered_last() {
        let mut records = vec![
            record("snapshot_10.xyz", 0.1),
            record("final.xyz", 0.2),
            record("snapshot_2.xyz", 0.3),
            record("alpha.xyz", 0.4),
            record("snapshot_1.xyz", 0.5),
        ];
        sort_by_snapshot_number(&mut records);

        let names: Vec<&str> = records.iter().map(|r| r.snapshot.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "snapshot_1.xyz",
                "snapshot_2.xyz",
                "snapshot_10.xyz",
                "alpha.xyz",
                "final.xyz"
            ]
        );
    }

    #[test]
    fn writes_header_in_column_order() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &[record("snapshot_1.xyz", 0.25)]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "snapshot,nbins,n_particles,cid,cid_shuffled,cid_shuffled_std,cid_normalized,compression_gain"
        );
        assert!(text.lines().nth(1).unwrap().starts_with("snapshot_1.xyz,32,100,0.25,"));
    }

    #[test]
    fn file_output_is_sorted_and_readable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cid_results.csv");
        let records = vec![record("snapshot_5.xyz", 0.2), record("snapshot_3.xyz", 0.1)];

        write_records_to_path(&path, &records).unwrap();
        let read_back = read_records_from_path(&path).unwrap();

        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].snapshot, "snapshot_3.xyz");
        assert_eq!(read_back[1], records[0]);
    }

    #[test]
    fn reading_missing_file_fails_with_io_error() {
        let dir = tempdir().unwrap();
        let err = read_records_from_path(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ResultsError::Io(_)));
    }
}
