//! Similarity metrics between documents.
//!
//! Two interchangeable metrics are provided:
//!
//! - [`tfidf::tfidf_cosine`]: exact pairwise TF-IDF cosine over full token counts
//! - [`simhash::SimHash128`]: 128-bit locality-sensitive signatures compared
//!   by Hamming distance
//!
//! Both are exposed through the [`Similarity`] trait so the match engine can
//! be written once for either representation.

pub mod simhash;
pub mod tfidf;

use serde::{Deserialize, Serialize};

use crate::text::DocumentStatistics;

pub use simhash::SimHash128;
pub use tfidf::tfidf_cosine;

/// A document representation that can be scored against another of the same kind.
///
/// Implementations must be symmetric and return a value in [0, 1].
pub trait Similarity: Sync {
    /// Score `self` against `other`.
    fn similarity(&self, other: &Self) -> f64;
}

impl Similarity for DocumentStatistics {
    fn similarity(&self, other: &Self) -> f64 {
        tfidf_cosine(self, other)
    }
}

impl Similarity for SimHash128 {
    fn similarity(&self, other: &Self) -> f64 {
        SimHash128::similarity(self, other)
    }
}

/// Which metric a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Pairwise TF-IDF cosine.
    #[default]
    Tfidf,
    /// 128-bit SimHash.
    Simhash,
}

impl Metric {
    /// Select the metric from the `--hash` flag.
    #[must_use]
    pub fn from_hash_flag(hash: bool) -> Self {
        if hash {
            Self::Simhash
        } else {
            Self::Tfidf
        }
    }

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tfidf => "tfidf",
            Self::Simhash => "simhash",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build SimHash signatures for a set of documents, in order.
#[must_use]
pub fn signatures(docs: &[DocumentStatistics]) -> Vec<SimHash128> {
    use rayon::prelude::*;
    docs.par_iter().map(SimHash128::from_statistics).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_dispatch_matches_functions() {
        let a = DocumentStatistics::from_text("alpha beta gamma");
        let b = DocumentStatistics::from_text("alpha beta delta");
        assert_eq!(Similarity::similarity(&a, &b), tfidf_cosine(&a, &b));

        let sa = SimHash128::from_statistics(&a);
        let sb = SimHash128::from_statistics(&b);
        assert_eq!(Similarity::similarity(&sa, &sb), sa.similarity(&sb));
    }

    #[test]
    fn test_metric_from_flag() {
        assert_eq!(Metric::from_hash_flag(false), Metric::Tfidf);
        assert_eq!(Metric::from_hash_flag(true), Metric::Simhash);
    }

    #[test]
    fn test_metric_serde_names() {
        let json = serde_json::to_string(&Metric::Simhash).unwrap();
        assert_eq!(json, "\"simhash\"");
        let parsed: Metric = serde_json::from_str("\"tfidf\"").unwrap();
        assert_eq!(parsed, Metric::Tfidf);
    }

    #[test]
    fn test_signatures_preserve_order() {
        let docs = vec![
            DocumentStatistics::from_text("first document"),
            DocumentStatistics::from_text("second document"),
        ];
        let sigs = signatures(&docs);
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0], SimHash128::from_statistics(&docs[0]));
        assert_eq!(sigs[1], SimHash128::from_statistics(&docs[1]));
    }
}
