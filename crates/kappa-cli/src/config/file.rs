use crate::error::{CliError, Result};
use kappa::engine::symbols::{OverflowPolicy, SymbolAlphabet};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBinningConfig {
    pub nbins: Option<usize>,
    pub box_size: Option<f64>,
    pub alphabet: Option<SymbolAlphabet>,
    pub overflow: Option<OverflowPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileNormalizationConfig {
    pub n_shuffles: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSelectionConfig {
    pub atom_types: Option<Vec<u32>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBatchConfig {
    pub pattern: Option<String>,
    pub max_in_flight: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub binning: Option<FileBinningConfig>,
    pub normalization: Option<FileNormalizationConfig>,
    pub selection: Option<FileSelectionConfig>,
    pub batch: Option<FileBatchConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_every_section() {
        let config = FileConfig::from_toml(
            r#"
            [binning]
            nbins = 16
            box-size = 50.0
            alphabet = "bytes"
            overflow = "clip"

            [normalization]
            n-shuffles = 5
            seed = 42

            [selection]
            atom-types = [1, 2]

            [batch]
            pattern = "frame_*.data"
            max-in-flight = 4
            "#,
        )
        .unwrap();

        let binning = config.binning.unwrap();
        assert_eq!(binning.nbins, Some(16));
        assert_eq!(binning.box_size, Some(50.0));
        assert_eq!(binning.alphabet, Some(SymbolAlphabet::Bytes));
        assert_eq!(binning.overflow, Some(OverflowPolicy::Clip));
        let normalization = config.normalization.unwrap();
        assert_eq!(normalization.n_shuffles, Some(5));
        assert_eq!(normalization.seed, Some(42));
        assert_eq!(config.selection.unwrap().atom_types, Some(vec![1, 2]));
        let batch = config.batch.unwrap();
        assert_eq!(batch.pattern.as_deref(), Some("frame_*.data"));
        assert_eq!(batch.max_in_flight, Some(4));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert!(config.binning.is_none());
        assert!(config.batch.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[binning]\nbins = 4\n").is_err());
        assert!(FileConfig::from_toml("[output]\npath = \"x\"\n").is_err());
        assert!(FileConfig::from_toml("[binning]\nalphabet = \"hex\"\n").is_err());
    }

    #[test]
    fn from_file_reports_the_path_on_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[binning\nnbins = 4").unwrap();

        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
