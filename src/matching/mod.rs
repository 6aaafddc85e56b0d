//! Best-match search, tie-breaking and report assembly.
//!
//! # Overview
//!
//! 1. [`finder::MatchFinder`] finds each document's best match
//! 2. [`plan::choose_move_index`] decides which file of a reciprocal pair is
//!    the duplicate, using [`version`] markers, then modification times,
//!    then scan order
//! 3. [`report::build_rows`] and [`plan::dedup_plan`] turn the matches into
//!    report rows and relocation work
//!
//! # Example
//!
//! ```
//! use textmatch::matching::{build_rows, FileTimeInfo, MatchFinder, VersionInfo};
//! use textmatch::text::DocumentStatistics;
//!
//! let docs = vec![
//!     DocumentStatistics::from_text("annual budget review"),
//!     DocumentStatistics::from_text("annual budget review"),
//!     DocumentStatistics::from_text("garden planting schedule"),
//! ];
//! let matches = MatchFinder::new().find(&docs).unwrap();
//! assert_eq!(matches.reciprocal_partner(0), Some(1));
//!
//! let rows = build_rows(&matches, &vec![VersionInfo::default(); 3], &vec![FileTimeInfo::default(); 3]);
//! assert_eq!(rows.len(), 2);
//! ```

pub mod finder;
pub mod plan;
pub mod report;
pub mod version;

pub use finder::{score_against, BestMatches, MatchError, MatchFinder, MatchResult};
pub use plan::{
    choose_move_index, dedup_plan, is_dedup_score, DedupPair, FileTimeInfo,
    DEFAULT_DEDUP_THRESHOLD, OUTPUT_PAIR_THRESHOLD,
};
pub use report::{build_rows, MatchRow, PairRegistry};
pub use version::{extract_version_info, VersionInfo, VersionKind};
