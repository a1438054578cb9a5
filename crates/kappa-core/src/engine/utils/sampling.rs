use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::instrument;

/// RNG for shuffle trial `trial` of a run seeded with `seed`.
///
/// Every trial reads its own ChaCha stream, so trials can run in any order or on any
/// thread and still produce the same permutations.
pub fn trial_rng(seed: u64, trial: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial);
    rng
}

/// Returns a uniformly shuffled copy of `symbols` (Fisher–Yates).
#[instrument(level = "trace", skip(symbols), fields(len = symbols.len()))]
pub fn shuffled_copy(symbols: &[u8], seed: u64, trial: u64) -> Vec<u8> {
    let mut rng = trial_rng(seed, trial);
    let mut copy = symbols.to_vec();
    copy.shuffle(&mut rng);
    copy
}
