use super::error::EngineError;
use crate::core::lz::{FactorizationResult, factorize};
use serde::Serialize;
use tracing::instrument;

/// Bits charged per symbol of the uncompressed sequence.
pub const LITERAL_BITS: f64 = 8.0;

/// Compressibility of one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CidResult {
    pub sequence_length: usize,
    pub factor_count: usize,
    /// Estimated size of the LZ77 encoding, in bits.
    pub compressed_bits: f64,
    /// `compressed_bits / (8 * sequence_length)`, in `[0, 1]`.
    pub cid: f64,
}

/// Estimated size in bits of a sequence of `length` symbols parsed into `factors`
/// factors.
///
/// Each factor costs `log2(z)` bits to index plus `2·log2(n/z)` bits for its offset and
/// length; the estimate never exceeds the literal-only cost `8n`, which is also what a
/// parse with no copies is charged.
pub fn compressed_bits(length: usize, factors: usize) -> f64 {
    let literal = LITERAL_BITS * length as f64;
    if factors >= length {
        return literal;
    }
    if factors == 0 {
        return 0.0;
    }
    let n = length as f64;
    let z = factors as f64;
    let bits = z * z.log2() + 2.0 * z * (n / z).log2();
    bits.min(literal)
}

/// Converts a factorization into a CID.
///
/// # Errors
///
/// Returns [`EngineError::EmptyInput`] for a zero-length sequence.
pub fn estimate(result: &FactorizationResult) -> Result<CidResult, EngineError> {
    let n = result.sequence_length;
    if n == 0 {
        return Err(EngineError::EmptyInput);
    }
    let bits = compressed_bits(n, result.factor_count);
    let cid = (bits / (LITERAL_BITS * n as f64)).clamp(0.0, 1.0);
    Ok(CidResult {
        sequence_length: n,
        factor_count: result.factor_count,
        compressed_bits: bits,
        cid,
    })
}

/// Factorizes `symbols` and estimates its CID.
#[instrument(level = "trace", skip_all, fields(len = symbols.len()))]
pub fn compute_cid(symbols: &[u8]) -> Result<CidResult, EngineError> {
    estimate(&factorize(symbols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_sequence_is_an_error() {
        assert!(matches!(compute_cid(b""), Err(EngineError::EmptyInput)));
        let empty = FactorizationResult::default();
        assert!(matches!(estimate(&empty), Err(EngineError::EmptyInput)));
    }

    #[test]
    fn incompressible_sequence_has_cid_one() {
        let distinct: Vec<u8> = (0..=255).collect();
        let result = compute_cid(&distinct).unwrap();
        assert_eq!(result.factor_count, 256);
        assert_eq!(result.compressed_bits, 8.0 * 256.0);
        assert_eq!(result.cid, 1.0);
    }

    #[test]
    fn single_symbol_is_charged_as_literal() {
        let result = compute_cid(b"7").unwrap();
        assert_eq!(result.sequence_length, 1);
        assert_eq!(result.factor_count, 1);
        assert_eq!(result.cid, 1.0);
    }

    #[test]
    fn repeated_symbol_is_highly_compressible() {
        let result = compute_cid(&[b'A'; 100]).unwrap();
        assert_eq!(result.factor_count, 2);
        // 2·log2(2) + 4·log2(50) bits out of 800.
        let expected = (2.0 + 4.0 * 50f64.log2()) / 800.0;
        assert!((result.cid - expected).abs() < 1e-12);
        assert!(result.cid < 0.05);
    }

    #[test]
    fn periodic_sequence_is_compressible() {
        let result = compute_cid(b"ABCABCABCABC").unwrap();
        assert_eq!(result.factor_count, 4);
        assert!(result.cid < 0.25);
    }

    proptest! {
        #[test]
        fn cost_is_bounded_and_monotone_in_factor_count(n in 1usize..2000) {
            let mut previous = 0.0;
            for z in 1..=n {
                let bits = compressed_bits(n, z);
                prop_assert!(bits >= 0.0);
                prop_assert!(bits <= 8.0 * n as f64);
                prop_assert!(bits >= previous);
                previous = bits;
            }
        }

        #[test]
        fn cid_is_in_unit_interval(symbols in proptest::collection::vec(any::<u8>(), 1..300)) {
            let result = compute_cid(&symbols).unwrap();
            prop_assert!((0.0..=1.0).contains(&result.cid));
            prop_assert_eq!(result.sequence_length, symbols.len());
        }
    }
}
