use serde::Serialize;
use thiserror::Error;

/// One unit of LZ77 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    /// A symbol with no usable earlier occurrence.
    Literal(u8),
    /// A copy of `length` symbols starting `offset` positions back.
    ///
    /// `offset >= 1` and the source may overlap the destination
    /// (`offset < length`), in which case the copy repeats itself.
    Copy { offset: usize, length: usize },
}

impl Factor {
    /// Number of symbols the factor stands for.
    pub fn len(&self) -> usize {
        match self {
            Factor::Literal(_) => 1,
            Factor::Copy { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    fn is_copy(&self) -> bool {
        matches!(self, Factor::Copy { .. })
    }
}

/// Summary of a factorization: how long the input was and how many factors it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FactorizationResult {
    pub sequence_length: usize,
    pub factor_count: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error(
        "Factor {index} copies from offset {offset} but only {available} symbol(s) precede it"
    )]
    InvalidOffset {
        index: usize,
        offset: usize,
        available: usize,
    },
}

/// Rebuilds the sequence a list of factors describes.
///
/// Copies are resolved symbol by symbol against the output produced so far, so
/// overlapping copies behave as in classic LZ77 decoders.
pub fn expand(factors: &[Factor]) -> Result<Vec<u8>, ExpandError> {
    let mut output = Vec::with_capacity(factors.iter().map(Factor::len).sum());
    for (index, factor) in factors.iter().enumerate() {
        match *factor {
            Factor::Literal(symbol) => output.push(symbol),
            Factor::Copy { offset, length } => {
                if offset == 0 || offset > output.len() {
                    return Err(ExpandError::InvalidOffset {
                        index,
                        offset,
                        available: output.len(),
                    });
                }
                let start = output.len() - offset;
                for k in 0..length {
                    let symbol = output[start + k];
                    output.push(symbol);
                }
            }
        }
    }
    Ok(output)
}
