use super::factor::{Factor, FactorizationResult};
use tracing::{instrument, trace};

/// Shortest match worth a copy factor. Shorter matches are emitted as literals.
pub const MIN_MATCH: usize = 2;

/// Every 2-symbol anchor has its own chain head, so there are no hash collisions.
const ANCHOR_TABLE_SIZE: usize = 1 << 16;

const NIL: usize = usize::MAX;

/// Lazily yields the greedy LZ77 factors of a byte sequence.
///
/// The window is the entire prefix already consumed. Earlier positions are indexed by
/// their 2-symbol anchor: `head[anchor]` holds the most recent position starting with
/// that anchor and `prev[pos]` links to the next older one. At each position the chain
/// for the upcoming anchor is walked from newest to oldest and every candidate is
/// extended; the first candidate reaching the maximal length wins, which makes ties
/// resolve to the smallest offset.
///
/// Each candidate is extended until its first mismatch, which is at most one symbol
/// past the factor finally emitted, and there are at most `i` candidates at position
/// `i`, so parsing costs
/// `O(sum of i * (L_i + 1)) = O(n^2)` in the worst case, with `L_i` the length of
/// the factor emitted at `i`. Random-like data has short chains and parses in
/// near-linear time.
pub struct Factors<'a> {
    symbols: &'a [u8],
    position: usize,
    indexed: usize,
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl<'a> Factors<'a> {
    pub fn new(symbols: &'a [u8]) -> Self {
        let head = if symbols.len() >= MIN_MATCH {
            vec![NIL; ANCHOR_TABLE_SIZE]
        } else {
            Vec::new()
        };
        Self {
            symbols,
            position: 0,
            indexed: 0,
            head,
            prev: vec![NIL; symbols.len()],
        }
    }

    /// Position of the next factor to be emitted.
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    fn anchor(&self, at: usize) -> usize {
        (usize::from(self.symbols[at]) << 8) | usize::from(self.symbols[at + 1])
    }

    /// Adds every position before `end` that starts a full anchor to the chains.
    fn index_until(&mut self, end: usize) {
        let last_anchor = self.symbols.len().saturating_sub(MIN_MATCH - 1);
        while self.indexed < end {
            if self.indexed < last_anchor {
                let anchor = self.anchor(self.indexed);
                self.prev[self.indexed] = self.head[anchor];
                self.head[anchor] = self.indexed;
            }
            self.indexed += 1;
        }
    }

    /// Longest earlier occurrence of the text at `at`, as `(offset, length)`.
    fn longest_match(&self, at: usize) -> Option<(usize, usize)> {
        let remaining = self.symbols.len() - at;
        if remaining < MIN_MATCH {
            return None;
        }

        let target = &self.symbols[at + MIN_MATCH..];
        let mut best_length = 0;
        let mut best_start = NIL;
        let mut candidate = self.head[self.anchor(at)];

        while candidate != NIL {
            // The source may run into the text being matched; the whole input is
            // available, so overlapping comparisons need no special casing.
            let source = &self.symbols[candidate + MIN_MATCH..];
            let length = MIN_MATCH
                + source
                    .iter()
                    .zip(target)
                    .take_while(|(a, b)| a == b)
                    .count();

            if length > best_length {
                best_length = length;
                best_start = candidate;
                if length == remaining {
                    break;
                }
            }
            candidate = self.prev[candidate];
        }

        (best_start != NIL).then(|| (at - best_start, best_length))
    }
}

impl Iterator for Factors<'_> {
    type Item = Factor;

    fn next(&mut self) -> Option<Factor> {
        let at = self.position;
        if at >= self.symbols.len() {
            return None;
        }
        self.index_until(at);

        let factor = match self.longest_match(at) {
            Some((offset, length)) => Factor::Copy { offset, length },
            None => Factor::Literal(self.symbols[at]),
        };
        self.position += factor.len();
        Some(factor)
    }
}

/// Counts the greedy LZ77 factors of `symbols`.
///
/// An empty input yields zero factors; it is not an error here but cannot be turned
/// into a CID downstream.
#[instrument(level = "trace", skip_all, fields(len = symbols.len()))]
pub fn factorize(symbols: &[u8]) -> FactorizationResult {
    let factor_count = Factors::new(symbols).count();
    trace!(factor_count, "Factorization finished.");
    FactorizationResult {
        sequence_length: symbols.len(),
        factor_count,
    }
}

/// Returns the greedy LZ77 factors of `symbols`.
pub fn parse(symbols: &[u8]) -> Vec<Factor> {
    Factors::new(symbols).collect()
}
