//! Best-match search over a corpus.
//!
//! Every unordered pair is scored once. A document's best match is the
//! candidate with the highest score; among equal scores the lowest index
//! wins, which is what an ascending scan with strict-greater replacement
//! produces. Rows are cut into a bounded number of contiguous chunks of
//! roughly equal work; each chunk fills one accumulator, and accumulators
//! are merged under the same rule, so the result does not depend on
//! scheduling.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use crate::progress::{ProgressCallback, PHASE_MATCHING};
use crate::similarity::Similarity;

/// Errors that prevent matching.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Matching needs at least two usable documents.
    #[error("need at least two non-empty documents to compare, found {found}")]
    NotEnoughDocuments {
        /// Number of usable documents.
        found: usize,
    },
}

/// Best candidate found for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Index of the best match, `None` if nothing was ever compared.
    pub index: Option<usize>,
    /// Score of the best match, -1.0 when `index` is `None`.
    pub score: f64,
}

impl Default for MatchResult {
    fn default() -> Self {
        Self {
            index: None,
            score: -1.0,
        }
    }
}

impl MatchResult {
    /// Offer a candidate; keeps the higher score, then the lower index.
    fn offer(&mut self, index: usize, score: f64) {
        let better = match self.index {
            None => true,
            Some(current) => score > self.score || (score == self.score && index < current),
        };
        if better {
            self.index = Some(index);
            self.score = score;
        }
    }

    fn merge(&mut self, other: &Self) {
        if let Some(index) = other.index {
            self.offer(index, other.score);
        }
    }
}

/// Best match of every document, indexed like the input.
#[derive(Debug, Clone, Default)]
pub struct BestMatches {
    results: Vec<MatchResult>,
}

impl BestMatches {
    /// Wrap precomputed results.
    #[must_use]
    pub fn from_results(results: Vec<MatchResult>) -> Self {
        Self { results }
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether there are no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result for document `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&MatchResult> {
        self.results.get(i)
    }

    /// Best-match index of `i`.
    #[must_use]
    pub fn best_index(&self, i: usize) -> Option<usize> {
        self.get(i).and_then(|r| r.index)
    }

    /// Best score of `i`, -1.0 when unknown.
    #[must_use]
    pub fn best_score(&self, i: usize) -> f64 {
        self.get(i).map_or(-1.0, |r| r.score)
    }

    /// `j` when `i` and `j` are each other's best match.
    #[must_use]
    pub fn reciprocal_partner(&self, i: usize) -> Option<usize> {
        let j = self.best_index(i)?;
        (j != i && self.best_index(j) == Some(i)).then_some(j)
    }

    /// All results in input order.
    #[must_use]
    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }
}

/// Runs the all-pairs best-match search.
#[derive(Default)]
pub struct MatchFinder {
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for MatchFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchFinder")
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl MatchFinder {
    /// Create a finder without progress reporting.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Find the best match of every item.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotEnoughDocuments`] for fewer than two items.
    pub fn find<T: Similarity>(&self, items: &[T]) -> Result<BestMatches, MatchError> {
        let n = items.len();
        if n < 2 {
            return Err(MatchError::NotEnoughDocuments { found: n });
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(PHASE_MATCHING, n);
        }
        let rows_done = AtomicUsize::new(0);

        let chunks = row_chunks(n, rayon::current_num_threads() * CHUNKS_PER_THREAD);
        log::debug!("Matching {} documents in {} row chunks", n, chunks.len());

        let results = chunks
            .into_par_iter()
            .map(|rows| {
                let mut acc = vec![MatchResult::default(); n];
                for i in rows {
                    for j in (i + 1)..n {
                        let score = items[i].similarity(&items[j]);
                        log::trace!("Compared {} and {}: {:.8}", i, j, score);
                        acc[i].offer(j, score);
                        acc[j].offer(i, score);
                    }
                    let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(done, "");
                    }
                }
                acc
            })
            .reduce(
                || vec![MatchResult::default(); n],
                |mut left, right| {
                    for (l, r) in left.iter_mut().zip(&right) {
                        l.merge(r);
                    }
                    left
                },
            );

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(PHASE_MATCHING);
        }

        Ok(BestMatches { results })
    }
}

const CHUNKS_PER_THREAD: usize = 4;

/// Split rows `0..n` into at most about `parts` contiguous ranges.
///
/// Row `i` is compared with the `n - 1 - i` rows after it, so early ranges
/// are shorter than late ones.
fn row_chunks(n: usize, parts: usize) -> Vec<Range<usize>> {
    let total = n * n.saturating_sub(1) / 2;
    let target = total.div_ceil(parts.max(1)).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut work = 0;
    for i in 0..n {
        work += n - 1 - i;
        if work >= target {
            chunks.push(start..i + 1);
            start = i + 1;
            work = 0;
        }
    }
    if start < n {
        chunks.push(start..n);
    }
    chunks
}

/// Score `sample` against every item, in input order.
pub fn score_against<T: Similarity>(sample: &T, items: &[T]) -> Vec<f64> {
    items.par_iter().map(|item| sample.similarity(item)).collect()
}
