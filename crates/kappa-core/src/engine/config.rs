use super::symbols::{OverflowPolicy, SymbolAlphabet};
use thiserror::Error;

/// Largest supported grid resolution per axis.
pub const MAX_NBINS: usize = 256;
pub const DEFAULT_NBINS: usize = 32;
pub const DEFAULT_N_SHUFFLES: usize = 1;
pub const DEFAULT_SEED: u64 = 0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Grid resolution must be a non-zero power of two, got {nbins}")]
    NotPowerOfTwo { nbins: usize },
    #[error("Grid resolution {nbins} exceeds the maximum of {MAX_NBINS}")]
    ResolutionTooLarge { nbins: usize },
    #[error("Box size must be finite and positive, got {box_size}")]
    InvalidBoxSize { box_size: f64 },
}

/// Checks that `nbins` is a power of two in `[1, MAX_NBINS]`.
pub fn validate_resolution(nbins: usize) -> Result<(), ConfigError> {
    if !nbins.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { nbins });
    }
    if nbins > MAX_NBINS {
        return Err(ConfigError::ResolutionTooLarge { nbins });
    }
    Ok(())
}

pub fn validate_box_size(box_size: f64) -> Result<(), ConfigError> {
    if box_size.is_finite() && box_size > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBoxSize { box_size })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinningConfig {
    pub nbins: usize,
    pub box_size: f64,
    pub alphabet: SymbolAlphabet,
    pub overflow: OverflowPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationConfig {
    /// Number of shuffled baselines; `0` reports the raw CID only.
    pub n_shuffles: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub binning: BinningConfig,
    pub normalization: NormalizationConfig,
    /// Particle types kept before binning; `None` keeps every particle.
    pub atom_types: Option<Vec<u32>>,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    nbins: Option<usize>,
    box_size: Option<f64>,
    alphabet: Option<SymbolAlphabet>,
    overflow: Option<OverflowPolicy>,
    n_shuffles: Option<usize>,
    seed: Option<u64>,
    atom_types: Option<Vec<u32>>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nbins(mut self, nbins: usize) -> Self {
        self.nbins = Some(nbins);
        self
    }
    pub fn box_size(mut self, box_size: f64) -> Self {
        self.box_size = Some(box_size);
        self
    }
    pub fn alphabet(mut self, alphabet: SymbolAlphabet) -> Self {
        self.alphabet = Some(alphabet);
        self
    }
    pub fn overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = Some(overflow);
        self
    }
    pub fn n_shuffles(mut self, n: usize) -> Self {
        self.n_shuffles = Some(n);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn atom_types(mut self, types: Vec<u32>) -> Self {
        self.atom_types = Some(types);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let nbins = self.nbins.unwrap_or(DEFAULT_NBINS);
        validate_resolution(nbins)?;
        let box_size = self
            .box_size
            .ok_or(ConfigError::MissingParameter("box_size"))?;
        validate_box_size(box_size)?;

        Ok(AnalysisConfig {
            binning: BinningConfig {
                nbins,
                box_size,
                alphabet: self.alphabet.unwrap_or_default(),
                overflow: self.overflow.unwrap_or_default(),
            },
            normalization: NormalizationConfig {
                n_shuffles: self.n_shuffles.unwrap_or(DEFAULT_N_SHUFFLES),
                seed: self.seed.unwrap_or(DEFAULT_SEED),
            },
            atom_types: self.atom_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = AnalysisConfigBuilder::new().box_size(75.0).build().unwrap();
        assert_eq!(config.binning.nbins, DEFAULT_NBINS);
        assert_eq!(config.binning.alphabet, SymbolAlphabet::Digits);
        assert_eq!(config.binning.overflow, OverflowPolicy::Reject);
        assert_eq!(config.normalization.n_shuffles, 1);
        assert_eq!(config.normalization.seed, 0);
        assert!(config.atom_types.is_none());
    }

    #[test]
    fn builder_requires_box_size() {
        let result = AnalysisConfigBuilder::new().nbins(16).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("box_size")));
    }

    #[test]
    fn builder_rejects_invalid_resolution() {
        for nbins in [0, 3, 30, 100] {
            let result = AnalysisConfigBuilder::new().nbins(nbins).box_size(1.0).build();
            assert_eq!(result, Err(ConfigError::NotPowerOfTwo { nbins }));
        }
        let result = AnalysisConfigBuilder::new().nbins(512).box_size(1.0).build();
        assert_eq!(result, Err(ConfigError::ResolutionTooLarge { nbins: 512 }));
    }

    #[test]
    fn builder_rejects_invalid_box_size() {
        for box_size in [0.0, -1.0, f64::INFINITY] {
            let result = AnalysisConfigBuilder::new().box_size(box_size).build();
            assert_eq!(result, Err(ConfigError::InvalidBoxSize { box_size }));
        }
        let result = AnalysisConfigBuilder::new().box_size(f64::NAN).build();
        assert!(matches!(result, Err(ConfigError::InvalidBoxSize { .. })));
    }

    #[test]
    fn builder_keeps_explicit_values() {
        let config = AnalysisConfigBuilder::new()
            .nbins(64)
            .box_size(50.0)
            .alphabet(SymbolAlphabet::Bytes)
            .overflow(OverflowPolicy::Clip)
            .n_shuffles(5)
            .seed(42)
            .atom_types(vec![1, 3])
            .build()
            .unwrap();
        assert_eq!(config.binning.nbins, 64);
        assert_eq!(config.binning.box_size, 50.0);
        assert_eq!(config.binning.alphabet, SymbolAlphabet::Bytes);
        assert_eq!(config.binning.overflow, OverflowPolicy::Clip);
        assert_eq!(config.normalization, NormalizationConfig { n_shuffles: 5, seed: 42 });
        assert_eq!(config.atom_types, Some(vec![1, 3]));
    }
}
