//! Per-document token counts.

use std::collections::BTreeMap;

use super::stopwords::is_stop_word;
use super::tokenizer::Tokenizer;

/// Token occurrence counts for one document.
///
/// Counts are kept in token order so that pairwise metrics can walk two
/// documents with a single merge and produce bit-identical results
/// regardless of argument order.
///
/// Invariant: `total_words` equals the sum of all counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStatistics {
    counts: BTreeMap<String, u64>,
    total_words: u64,
}

impl DocumentStatistics {
    /// Create empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` into fresh statistics.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self::new();
        stats.add_text(text);
        stats
    }

    /// Count a completed token and clear the buffer.
    ///
    /// Empty tokens and stop words are not counted; the buffer is cleared
    /// either way.
    pub fn add_token(&mut self, token: &mut String) {
        if token.is_empty() {
            return;
        }
        if is_stop_word(token) {
            token.clear();
            return;
        }
        if let Some(count) = self.counts.get_mut(token.as_str()) {
            *count += 1;
            token.clear();
        } else {
            self.counts.insert(std::mem::take(token), 1);
        }
        self.total_words += 1;
    }

    /// Tokenize `text` and add its tokens.
    pub fn add_text(&mut self, text: &str) {
        let mut tokenizer = Tokenizer::new(self);
        tokenizer.add_chunk(text.as_bytes());
        tokenizer.finish();
    }

    /// Remove all counts.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total_words = 0;
    }

    /// Whether no token was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_words == 0
    }

    /// Total counted words (after stop-word removal).
    #[must_use]
    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn distinct_tokens(&self) -> usize {
        self.counts.len()
    }

    /// Occurrence count of `token`, zero if absent.
    #[must_use]
    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Iterate `(token, count)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(token, &count)| (token.as_str(), count))
    }

    /// L2 distance between the two normalised term-frequency vectors.
    ///
    /// Ranges from 0 (same distribution) to √2 (disjoint vocabularies).
    /// Empty statistics contribute a zero vector.
    #[must_use]
    pub fn frequency_distance(&self, other: &Self) -> f64 {
        let freq = |count: u64, total: u64| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        };
        let sum: f64 = merge_counts(self, other)
            .map(|(_, left, right)| {
                let d = freq(left, self.total_words) - freq(right, other.total_words);
                d * d
            })
            .sum();
        sum.sqrt()
    }
}

/// Map a [`DocumentStatistics::frequency_distance`] to a score in [0, 1].
#[must_use]
pub fn distance_to_similarity(distance: f64) -> f64 {
    (1.0 - distance / std::f64::consts::SQRT_2).clamp(0.0, 1.0)
}

/// Walk the union of both vocabularies in token order, yielding
/// `(token, count_left, count_right)`.
pub(crate) fn merge_counts<'a>(
    left: &'a DocumentStatistics,
    right: &'a DocumentStatistics,
) -> impl Iterator<Item = (&'a str, u64, u64)> + 'a {
    let mut lhs = left.counts.iter().peekable();
    let mut rhs = right.counts.iter().peekable();
    std::iter::from_fn(move || match (lhs.peek(), rhs.peek()) {
        (Some((lt, _)), Some((rt, _))) => match lt.cmp(rt) {
            std::cmp::Ordering::Less => lhs.next().map(|(t, &c)| (t.as_str(), c, 0)),
            std::cmp::Ordering::Greater => rhs.next().map(|(t, &c)| (t.as_str(), 0, c)),
            std::cmp::Ordering::Equal => {
                let (t, &lc) = lhs.next()?;
                let (_, &rc) = rhs.next()?;
                Some((t.as_str(), lc, rc))
            }
        },
        (Some(_), None) => lhs.next().map(|(t, &c)| (t.as_str(), c, 0)),
        (None, Some(_)) => rhs.next().map(|(t, &c)| (t.as_str(), 0, c)),
        (None, None) => None,
    })
}
