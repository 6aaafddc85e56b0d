//! Pairwise TF-IDF cosine similarity.
//!
//! IDF weights are derived from the two documents being compared only, so no
//! corpus-wide index is needed:
//!
//! ```text
//! idf(t) = ln((totalA + totalB + 1) / (countA(t) + countB(t) + 1)) + 1
//! w(t)   = count(t) / total * idf(t)
//! ```

use crate::text::statistics::merge_counts;
use crate::text::DocumentStatistics;

/// Cosine similarity of the pairwise TF-IDF weight vectors, in [0, 1].
///
/// Returns 0 when either document is empty. The union of both vocabularies
/// is walked once in token order, so `tfidf_cosine(a, b)` and
/// `tfidf_cosine(b, a)` are bit-identical.
#[must_use]
pub fn tfidf_cosine(left: &DocumentStatistics, right: &DocumentStatistics) -> f64 {
    let left_total = left.total_words();
    let right_total = right.total_words();
    if left_total == 0 || right_total == 0 {
        return 0.0;
    }

    let total_terms = (left_total + right_total) as f64;
    let left_total = left_total as f64;
    let right_total = right_total as f64;

    let mut dot = 0.0;
    let mut norm_left = 0.0;
    let mut norm_right = 0.0;
    for (_, left_count, right_count) in merge_counts(left, right) {
        let combined = (left_count + right_count) as f64;
        let idf = ((total_terms + 1.0) / (combined + 1.0)).ln() + 1.0;
        let left_weight = left_count as f64 / left_total * idf;
        let right_weight = right_count as f64 / right_total * idf;
        dot += left_weight * right_weight;
        norm_left += left_weight * left_weight;
        norm_right += right_weight * right_weight;
    }

    if norm_left <= 0.0 || norm_right <= 0.0 {
        return 0.0;
    }
    let denom = norm_left.sqrt() * norm_right.sqrt();
    if denom <= 0.0 {
        return 0.0;
    }
    (dot / denom).clamp(0.0, 1.0)
}
