//! Result rows for the most-similar report.

use std::collections::HashMap;

use super::finder::BestMatches;
use super::plan::{choose_move_index, is_dedup_score, FileTimeInfo, OUTPUT_PAIR_THRESHOLD};
use super::version::VersionInfo;

/// One line of the report, by document index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRow {
    /// The file the row describes (the keeper for merged reciprocal pairs).
    pub file: usize,
    /// Its best match, if any.
    pub most_similar: Option<usize>,
    /// Score of the match.
    pub score: f64,
    /// Identifier shared by every row that references the same pair.
    pub pair_id: usize,
}

/// Hands out pair identifiers, starting at 1, in first-reference order.
#[derive(Debug, Default)]
pub struct PairRegistry {
    ids: HashMap<(usize, usize), usize>,
}

impl PairRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the unordered pair `{a, b}`.
    pub fn pair_id(&mut self, a: usize, b: usize) -> usize {
        let key = (a.min(b), a.max(b));
        let next = self.ids.len() + 1;
        *self.ids.entry(key).or_insert(next)
    }

    /// Number of distinct pairs seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no pair has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Build the report rows, sorted by descending score (stable).
///
/// A reciprocal pair whose two scores reach the output threshold becomes a
/// single row keyed on the keeper. Every other document gets its own row.
#[must_use]
pub fn build_rows(
    matches: &BestMatches,
    versions: &[VersionInfo],
    times: &[FileTimeInfo],
) -> Vec<MatchRow> {
    let mut registry = PairRegistry::new();
    let mut rows = Vec::with_capacity(matches.len());

    for i in 0..matches.len() {
        let best = matches.best_index(i);

        if let Some(j) = matches.reciprocal_partner(i) {
            if is_dedup_score(matches.best_score(i), OUTPUT_PAIR_THRESHOLD)
                && is_dedup_score(matches.best_score(j), OUTPUT_PAIR_THRESHOLD)
            {
                let duplicate = choose_move_index(i, j, versions, times);
                let keeper = if duplicate == i { j } else { i };
                if i == keeper {
                    rows.push(MatchRow {
                        file: keeper,
                        most_similar: Some(duplicate),
                        score: matches.best_score(keeper),
                        pair_id: registry.pair_id(keeper, duplicate),
                    });
                }
                continue;
            }
        }

        rows.push(MatchRow {
            file: i,
            most_similar: best,
            score: matches.best_score(i),
            pair_id: registry.pair_id(i, best.unwrap_or(i)),
        });
    }

    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    rows
}
