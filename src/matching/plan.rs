//! Keeper/duplicate decisions for reciprocal pairs.

use std::cmp::Ordering;
use std::path::Path;
use std::time::SystemTime;

use super::finder::BestMatches;
use super::version::VersionInfo;

/// Threshold a reciprocal pair must reach to be merged into one output row.
pub const OUTPUT_PAIR_THRESHOLD: f64 = 1e-8;

/// Default `--dedup` threshold: only identical scores.
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 1.0;

/// Half a unit of the last printed decimal.
const SCORE_EPSILON: f64 = 0.5e-8;

/// Whether `score` reaches `threshold` at 8-decimal display resolution.
#[must_use]
pub fn is_dedup_score(score: f64, threshold: f64) -> bool {
    score + SCORE_EPSILON >= threshold
}

/// Modification time of a file, if it could be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTimeInfo {
    /// Last modification time.
    pub modified: Option<SystemTime>,
}

impl FileTimeInfo {
    /// Query the filesystem; failures leave the time unavailable.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        if modified.is_none() {
            log::debug!("No modification time for {}", path.display());
        }
        Self { modified }
    }
}

/// Pick which of `left` and `right` is the older copy to move aside.
///
/// Newer version/date markers win first, then a newer modification time,
/// and a file with a readable time beats one without. When nothing
/// distinguishes them the later-scanned file (higher index) is moved.
///
/// The result does not depend on argument order.
#[must_use]
pub fn choose_move_index(
    left: usize,
    right: usize,
    versions: &[VersionInfo],
    times: &[FileTimeInfo],
) -> usize {
    if let (Some(lv), Some(rv)) = (versions.get(left), versions.get(right)) {
        match lv.compare(rv) {
            Ordering::Greater => return right,
            Ordering::Less => return left,
            Ordering::Equal => {}
        }
    }

    let lt = times.get(left).and_then(|t| t.modified);
    let rt = times.get(right).and_then(|t| t.modified);
    match (lt, rt) {
        (Some(l), Some(r)) if l != r => {
            if l < r {
                left
            } else {
                right
            }
        }
        (Some(_), None) => right,
        (None, Some(_)) => left,
        _ => left.max(right),
    }
}

/// A reciprocal pair selected for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupPair {
    /// Index of the file that stays.
    pub keeper: usize,
    /// Index of the file to move.
    pub duplicate: usize,
}

/// Reciprocal pairs whose scores both reach `threshold`, once each, ordered by
/// the lower index of the pair.
#[must_use]
pub fn dedup_plan(
    matches: &BestMatches,
    versions: &[VersionInfo],
    times: &[FileTimeInfo],
    threshold: f64,
) -> Vec<DedupPair> {
    (0..matches.len())
        .filter_map(|i| {
            let j = matches.reciprocal_partner(i)?;
            if j < i {
                return None;
            }
            if !is_dedup_score(matches.best_score(i), threshold)
                || !is_dedup_score(matches.best_score(j), threshold)
            {
                return None;
            }
            let duplicate = choose_move_index(i, j, versions, times);
            let keeper = if duplicate == i { j } else { i };
            log::debug!("Dedup candidate: keep {} and move {}", keeper, duplicate);
            Some(DedupPair { keeper, duplicate })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::finder::MatchResult;
    use crate::matching::version::extract_version_info;
    use std::time::Duration;

    fn versions(names: &[&str]) -> Vec<VersionInfo> {
        names
            .iter()
            .map(|n| extract_version_info(Path::new(n)))
            .collect()
    }

    fn at(secs: u64) -> FileTimeInfo {
        FileTimeInfo {
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
        }
    }

    #[test]
    fn test_threshold_resolution() {
        assert!(is_dedup_score(0.999_999_996, 1.0));
        assert!(!is_dedup_score(0.999_999_99, 1.0));
        assert!(is_dedup_score(1e-8, OUTPUT_PAIR_THRESHOLD));
        assert!(!is_dedup_score(0.0, OUTPUT_PAIR_THRESHOLD));
    }

    #[test]
    fn test_version_decides_first() {
        let v = versions(&["report_v1.2.txt", "report_v1.10.txt"]);
        let times = [at(200), at(100)];
        assert_eq!(choose_move_index(0, 1, &v, &times), 0);
        assert_eq!(choose_move_index(1, 0, &v, &times), 0);
    }

    #[test]
    fn test_newer_mtime_kept() {
        let v = versions(&["a.txt", "b.txt"]);
        let times = [at(500), at(100)];
        assert_eq!(choose_move_index(0, 1, &v, &times), 1);
        assert_eq!(choose_move_index(1, 0, &v, &times), 1);
    }

    #[test]
    fn test_missing_time_loses() {
        let v = versions(&["a.txt", "b.txt"]);
        let times = [FileTimeInfo::default(), at(100)];
        assert_eq!(choose_move_index(0, 1, &v, &times), 0);
        assert_eq!(choose_move_index(1, 0, &v, &times), 0);
    }

    #[test]
    fn test_scan_order_fallback_moves_higher_index() {
        let v = versions(&["a.txt", "b.txt"]);
        let times = [at(100), at(100)];
        assert_eq!(choose_move_index(0, 1, &v, &times), 1);
        assert_eq!(choose_move_index(1, 0, &v, &times), 1);
        let unknown = [FileTimeInfo::default(), FileTimeInfo::default()];
        assert_eq!(choose_move_index(1, 0, &v, &unknown), 1);
    }

    #[test]
    fn test_file_time_from_missing_path() {
        let info = FileTimeInfo::from_path(Path::new("/definitely/not/here.txt"));
        assert!(info.modified.is_none());
    }

    fn matches(results: &[(Option<usize>, f64)]) -> BestMatches {
        BestMatches::from_results(
            results
                .iter()
                .map(|&(index, score)| MatchResult { index, score })
                .collect(),
        )
    }

    #[test]
    fn test_plan_selects_reciprocal_pairs_once() {
        let m = matches(&[(Some(1), 1.0), (Some(0), 1.0), (Some(0), 1.0)]);
        let v = versions(&["notes_v1.txt", "notes_v2.txt", "other.txt"]);
        let times = [at(1), at(1), at(1)];
        let plan = dedup_plan(&m, &v, &times, DEFAULT_DEDUP_THRESHOLD);
        assert_eq!(plan, vec![DedupPair {
            keeper: 1,
            duplicate: 0
        }]);
    }

    #[test]
    fn test_plan_respects_threshold_on_both_sides() {
        let m = matches(&[(Some(1), 0.95), (Some(0), 0.95)]);
        let v = versions(&["a.txt", "b.txt"]);
        let times = [at(1), at(2)];
        assert!(dedup_plan(&m, &v, &times, 1.0).is_empty());
        assert_eq!(dedup_plan(&m, &v, &times, 0.9), vec![DedupPair {
            keeper: 1,
            duplicate: 0
        }]);
    }
}
