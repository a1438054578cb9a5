use super::complexity::{CidResult, compute_cid};
use super::config::NormalizationConfig;
use super::error::EngineError;
use super::utils::sampling::shuffled_copy;
use super::utils::stats::{mean, population_std};
use serde::Serialize;
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// CID of a sequence relative to shuffled copies of itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub original: CidResult,
    pub cid: f64,
    pub cid_shuffled_mean: f64,
    pub cid_shuffled_std: f64,
    pub cid_normalized: f64,
    pub compression_gain: f64,
    /// CID of each shuffled copy, by trial index.
    pub shuffled: Vec<f64>,
}

impl NormalizedResult {
    fn from_trials(original: CidResult, shuffled: Vec<f64>) -> Self {
        let cid = original.cid;
        let cid_shuffled_mean = mean(&shuffled);
        let cid_shuffled_std = population_std(&shuffled);
        let cid_normalized = if cid_shuffled_mean > 0.0 {
            cid / cid_shuffled_mean
        } else {
            1.0
        };
        Self {
            original,
            cid,
            cid_shuffled_mean,
            cid_shuffled_std,
            cid_normalized,
            compression_gain: 1.0 - cid_normalized,
            shuffled,
        }
    }

    pub fn n_shuffles(&self) -> usize {
        self.shuffled.len()
    }
}

/// Normalizes CIDs against a shuffled baseline.
///
/// Shuffling keeps the symbol histogram and destroys spatial order, so
/// `cid / mean(cid_shuffled)` isolates the compressibility coming from structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationHarness {
    n_shuffles: usize,
    seed: u64,
}

impl NormalizationHarness {
    pub fn new(n_shuffles: usize, seed: u64) -> Self {
        Self { n_shuffles, seed }
    }

    pub fn from_config(config: &NormalizationConfig) -> Self {
        Self::new(config.n_shuffles, config.seed)
    }

    pub fn n_shuffles(&self) -> usize {
        self.n_shuffles
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Computes the CID of `symbols` and of `n_shuffles` shuffled copies.
    ///
    /// With zero shuffles no baseline exists: mean and std are `0`, `cid_normalized` is
    /// `1.0` and `compression_gain` is `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] for an empty sequence.
    #[instrument(level = "debug", skip(self, symbols), fields(len = symbols.len(), n_shuffles = self.n_shuffles, seed = self.seed))]
    pub fn run(&self, symbols: &[u8]) -> Result<NormalizedResult, EngineError> {
        let original = compute_cid(symbols)?;

        if self.n_shuffles == 0 {
            warn!("No shuffled baseline requested; reporting the raw CID only.");
            return Ok(NormalizedResult::from_trials(original, Vec::new()));
        }

        #[cfg(not(feature = "parallel"))]
        let trials = 0..self.n_shuffles;

        #[cfg(feature = "parallel")]
        let trials = (0..self.n_shuffles).into_par_iter();

        let shuffled = trials
            .map(|trial| {
                let copy = shuffled_copy(symbols, self.seed, trial as u64);
                compute_cid(&copy).map(|r| r.cid)
            })
            .collect::<Result<Vec<f64>, EngineError>>()?;

        let result = NormalizedResult::from_trials(original, shuffled);
        debug!(
            cid = result.cid,
            cid_shuffled = result.cid_shuffled_mean,
            cid_normalized = result.cid_normalized,
            "Normalization finished."
        );
        Ok(result)
    }
}

/// One-shot form of [`NormalizationHarness::run`].
pub fn normalize(
    symbols: &[u8],
    n_shuffles: usize,
    seed: u64,
) -> Result<NormalizedResult, EngineError> {
    NormalizationHarness::new(n_shuffles, seed).run(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn periodic_sequence_is_more_ordered_than_its_shuffles() {
        let result = normalize(b"ABCABCABCABC", 20, 42).unwrap();
        assert_eq!(result.original.factor_count, 4);
        assert_eq!(result.n_shuffles(), 20);
        assert!(result.cid_normalized < 1.0);
        assert!(result.compression_gain > 0.0);
    }

    #[test]
    fn constant_sequence_compresses_to_two_factors() {
        let result = normalize(&[b'A'; 100], 5, 0).unwrap();
        assert_eq!(result.original.factor_count, 2);
        assert!(result.cid < 0.05);
        // Every shuffle of a constant sequence is the sequence itself.
        assert!(result.cid_shuffled_std < 1e-12);
        assert!((result.cid_normalized - 1.0).abs() < 1e-12);
    }

    #[test]
    fn random_bytes_normalize_to_about_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut symbols = vec![0u8; 100];
        rng.fill_bytes(&mut symbols);

        let result = normalize(&symbols, 10, 7).unwrap();
        assert!(
            (result.cid_normalized - 1.0).abs() < 0.2,
            "cid_normalized = {}",
            result.cid_normalized
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(normalize(b"", 3, 0), Err(EngineError::EmptyInput)));
        assert!(matches!(normalize(b"", 0, 0), Err(EngineError::EmptyInput)));
    }

    #[test]
    fn zero_shuffles_reports_raw_cid() {
        let result = normalize(b"0001000100010001", 0, 0).unwrap();
        assert!(result.shuffled.is_empty());
        assert_eq!(result.cid_shuffled_mean, 0.0);
        assert_eq!(result.cid_shuffled_std, 0.0);
        assert_eq!(result.cid_normalized, 1.0);
        assert_eq!(result.compression_gain, 0.0);
        assert!(result.cid > 0.0);
    }

    #[test]
    fn single_shuffle_has_zero_std() {
        let result = normalize(b"0102030405060708", 1, 3).unwrap();
        assert_eq!(result.n_shuffles(), 1);
        assert_eq!(result.cid_shuffled_std, 0.0);
        assert_eq!(result.cid_shuffled_mean, result.shuffled[0]);
    }

    #[test]
    fn results_depend_only_on_inputs_and_seed() {
        let symbols: Vec<u8> = (0..500u32).map(|i| b'0' + ((i * i) % 7) as u8).collect();
        let a = normalize(&symbols, 8, 99).unwrap();
        let b = normalize(&symbols, 8, 99).unwrap();
        assert_eq!(a, b);

        let c = normalize(&symbols, 8, 100).unwrap();
        assert_eq!(a.cid, c.cid);
    }

    #[test]
    fn normalized_value_is_finite_and_non_negative() {
        let symbols = b"00000000110000000011000000001100".to_vec();
        let result = normalize(&symbols, 6, 5).unwrap();
        assert!(result.cid_shuffled_mean > 0.0);
        assert!(result.cid_normalized.is_finite());
        assert!(result.cid_normalized >= 0.0);
        assert!((result.compression_gain - (1.0 - result.cid_normalized)).abs() < 1e-15);
    }

    #[test]
    fn harness_reads_config() {
        let harness = NormalizationHarness::from_config(&NormalizationConfig {
            n_shuffles: 4,
            seed: 11,
        });
        assert_eq!(harness.n_shuffles(), 4);
        assert_eq!(harness.seed(), 11);
    }
}
