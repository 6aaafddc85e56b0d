//! Output formatters for match results.
//!
//! This module provides the two renderings of a most-similar run:
//! - [`table`]: bordered console table with wrapped path columns
//! - [`csv`]: `file,most_similar,score,pair_id` file for spreadsheets
//!
//! Both take [`DisplayRow`]s, which carry paths already masked against the
//! scanned root.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use textmatch::output::{masked_path, format_score};
//!
//! assert_eq!(masked_path(Path::new("/data/docs/a.txt"), Path::new("/data")), ".../docs/a.txt");
//! assert_eq!(format_score(0.5), "0.50000000");
//! ```

pub mod csv;
pub mod table;

use std::path::{Path, PathBuf};

use crate::matching::MatchRow;
use crate::scanner::path_utils::{absolute_lexical, relative_to_root};
use crate::similarity::Metric;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use table::TableOutput;

/// A report row with rendered paths.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// Masked path of the file.
    pub file: String,
    /// Masked path of its best match, empty if none.
    pub most_similar: String,
    /// Similarity score.
    pub score: f64,
    /// Pair identifier.
    pub pair_id: usize,
}

/// Render a path for display: `.../<relative>` under `root`, else absolute.
///
/// Separators are always `/`.
#[must_use]
pub fn masked_path(path: &Path, root: &Path) -> String {
    match relative_to_root(path, root) {
        Some(rel) => format!(".../{}", generic_string(&rel)),
        None => generic_string(&absolute_lexical(path)),
    }
}

fn generic_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Score with 8 decimals.
#[must_use]
pub fn format_score(score: f64) -> String {
    format!("{score:.8}")
}

/// Turn index rows into display rows.
#[must_use]
pub fn display_rows(rows: &[MatchRow], paths: &[PathBuf], root: &Path) -> Vec<DisplayRow> {
    let show = |i: usize| {
        paths
            .get(i)
            .map(|p| masked_path(p, root))
            .unwrap_or_default()
    };
    rows.iter()
        .map(|row| DisplayRow {
            file: show(row.file),
            most_similar: row.most_similar.map(show).unwrap_or_default(),
            score: row.score,
            pair_id: row.pair_id,
        })
        .collect()
}

/// Default CSV file name for a run over `root`.
///
/// Uses the root directory's name (or its parent's when the name is empty,
/// `.` or `..`), falling back to `output`.
#[must_use]
pub fn csv_file_name(root: &Path, metric: Metric) -> String {
    let abs = absolute_lexical(root);
    let usable = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty() && n != "." && n != "..")
    };
    let base = usable(&abs)
        .or_else(|| abs.parent().and_then(usable))
        .unwrap_or_else(|| "output".to_string());
    match metric {
        Metric::Tfidf => format!("{base}_mostsimilar.csv"),
        Metric::Simhash => format!("{base}_mostsimilar_hash.csv"),
    }
}
