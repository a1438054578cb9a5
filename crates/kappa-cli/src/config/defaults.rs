use kappa::engine::config::{DEFAULT_N_SHUFFLES, DEFAULT_NBINS, DEFAULT_SEED};
use kappa::engine::symbols::{OverflowPolicy, SymbolAlphabet};

pub struct DefaultsConfig {
    pub nbins: usize,
    pub box_size: f64,
    pub alphabet: SymbolAlphabet,
    pub overflow: OverflowPolicy,
    pub n_shuffles: usize,
    pub seed: u64,
    pub pattern: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            nbins: DEFAULT_NBINS,
            box_size: 75.0,
            alphabet: SymbolAlphabet::Digits,
            overflow: OverflowPolicy::Reject,
            n_shuffles: DEFAULT_N_SHUFFLES,
            seed: DEFAULT_SEED,
            pattern: "snapshot_*.xyz".to_string(),
        }
    }
}
