use super::error::EngineError;
use serde::{Deserialize, Serialize};

/// How voxel counts are written as bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolAlphabet {
    /// One ASCII digit per voxel, `'0'..='9'`.
    #[default]
    Digits,
    /// One raw byte per voxel, `0..=255`.
    Bytes,
}

impl SymbolAlphabet {
    pub fn max_count(self) -> u32 {
        match self {
            SymbolAlphabet::Digits => 9,
            SymbolAlphabet::Bytes => u8::MAX as u32,
        }
    }

    /// Encodes a count already known to be representable.
    #[inline]
    fn symbol(self, count: u32) -> u8 {
        match self {
            SymbolAlphabet::Digits => b'0' + count as u8,
            SymbolAlphabet::Bytes => count as u8,
        }
    }
}

/// What to do with a count the alphabet cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    #[default]
    Reject,
    /// Saturate at the alphabet maximum.
    Clip,
}

/// Voxel occupancy counts in Hilbert-curve order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    counts: Vec<u32>,
    nbins: usize,
    dropped: usize,
}

impl SymbolSequence {
    pub fn new(counts: Vec<u32>, nbins: usize, dropped: usize) -> Self {
        Self {
            counts,
            nbins,
            dropped,
        }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Points that fell outside the box and were not counted.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Points that were counted.
    pub fn binned(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Writes the counts as bytes of `alphabet`.
    ///
    /// # Errors
    ///
    /// With [`OverflowPolicy::Reject`], returns [`EngineError::SymbolRange`] for the first
    /// count above [`SymbolAlphabet::max_count`].
    pub fn encode(
        &self,
        alphabet: SymbolAlphabet,
        overflow: OverflowPolicy,
    ) -> Result<Vec<u8>, EngineError> {
        let max = alphabet.max_count();
        self.counts
            .iter()
            .enumerate()
            .map(|(position, &count)| match (count > max, overflow) {
                (false, _) => Ok(alphabet.symbol(count)),
                (true, OverflowPolicy::Clip) => Ok(alphabet.symbol(max)),
                (true, OverflowPolicy::Reject) => Err(EngineError::SymbolRange {
                    value: count,
                    position,
                    max,
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_encode_as_ascii() {
        let seq = SymbolSequence::new(vec![0, 1, 9, 3], 1, 0);
        let bytes = seq.encode(SymbolAlphabet::Digits, OverflowPolicy::Reject).unwrap();
        assert_eq!(bytes, b"0193");
    }

    #[test]
    fn bytes_encode_raw_counts() {
        let seq = SymbolSequence::new(vec![0, 10, 255], 1, 0);
        let bytes = seq.encode(SymbolAlphabet::Bytes, OverflowPolicy::Reject).unwrap();
        assert_eq!(bytes, vec![0, 10, 255]);
    }

    #[test]
    fn reject_reports_value_position_and_max() {
        let seq = SymbolSequence::new(vec![1, 2, 12, 40], 1, 0);
        let err = seq
            .encode(SymbolAlphabet::Digits, OverflowPolicy::Reject)
            .unwrap_err();
        match err {
            EngineError::SymbolRange { value, position, max } => {
                assert_eq!((value, position, max), (12, 2, 9));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clip_saturates_at_alphabet_maximum() {
        let seq = SymbolSequence::new(vec![12, 3, 300], 1, 0);
        assert_eq!(
            seq.encode(SymbolAlphabet::Digits, OverflowPolicy::Clip).unwrap(),
            b"939"
        );
        assert_eq!(
            seq.encode(SymbolAlphabet::Bytes, OverflowPolicy::Clip).unwrap(),
            vec![12, 3, 255]
        );
    }

    #[test]
    fn summary_accessors() {
        let seq = SymbolSequence::new(vec![0, 2, 5, 0, 1, 0, 0, 0], 2, 3);
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.nbins(), 2);
        assert_eq!(seq.binned(), 8);
        assert_eq!(seq.dropped(), 3);
        assert_eq!(seq.max_count(), 5);
    }
}
