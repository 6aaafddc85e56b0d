//! Moving duplicates aside.
//!
//! # Overview
//!
//! Duplicates are moved into a directory under the scanned root, keeping
//! their path relative to the root:
//!
//! ```text
//! <root>/reports/q1_v1.txt  ->  <root>/Duplicates/reports/q1_v1.txt
//! ```
//!
//! - Parent directories are created as needed
//! - A taken name gets `_1`, `_2`, ... appended to its stem
//! - A rename that fails (e.g. across filesystems) falls back to copy + delete
//! - Files already inside the duplicates directory are left alone
//!
//! # Example
//!
//! ```no_run
//! use textmatch::actions::relocate::relocate_duplicates;
//! use std::path::{Path, PathBuf};
//!
//! let root = Path::new("/data/docs");
//! let result = relocate_duplicates(
//!     &[PathBuf::from("/data/docs/old_copy.txt")],
//!     root,
//!     &root.join("Duplicates"),
//! );
//! println!("{}", result.summary());
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scanner::path_utils::{is_under, path_key, relative_to_root};

/// Highest numeric suffix tried before giving up on a free name.
pub const MAX_UNIQUE_SUFFIX: u32 = 1000;

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Source file was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Every candidate name in the target directory is taken.
    #[error("no free name for {0} after 1000 attempts")]
    NoFreeName(PathBuf),

    /// Creating the target directory failed.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Both the rename and the copy fallback failed.
    #[error("cannot move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::NoFreeName(p) => p,
            Self::CreateDir { path, .. } => path,
            Self::Move { from, .. } => from,
        }
    }
}

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Original location.
    pub from: PathBuf,
    /// New location.
    pub to: PathBuf,
}

/// Results of a batch relocation.
#[derive(Debug, Clone, Default)]
pub struct BatchMoveResult {
    /// Successfully moved files.
    pub successes: Vec<MoveResult>,
    /// Failed moves with their errors.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchMoveResult {
    /// Number of successful moves.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed moves.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all moves succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!("Moved {} file(s)", self.success_count())
        } else {
            format!(
                "Moved {} file(s), {} failed",
                self.success_count(),
                self.failure_count()
            )
        }
    }
}

/// Where `path` goes inside `dup_dir`.
///
/// Paths outside `root` keep only their file name.
#[must_use]
pub fn target_for(path: &Path, root: &Path, dup_dir: &Path) -> PathBuf {
    match relative_to_root(path, root) {
        Some(rel) => dup_dir.join(rel),
        None => dup_dir.join(path.file_name().unwrap_or(path.as_os_str())),
    }
}

/// `target` itself if free, else the first free `<stem>_<n><ext>`.
///
/// # Errors
///
/// Returns [`MoveError::NoFreeName`] when every suffix up to
/// [`MAX_UNIQUE_SUFFIX`] is taken.
pub fn unique_path(target: &Path) -> Result<PathBuf, MoveError> {
    if !target.exists() {
        return Ok(target.to_path_buf());
    }
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = target
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..=MAX_UNIQUE_SUFFIX)
        .map(|n| target.with_file_name(format!("{stem}_{n}{ext}")))
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| MoveError::NoFreeName(target.to_path_buf()))
}

/// Move one file to `target`, creating parents and avoiding collisions.
///
/// # Errors
///
/// - `NotFound` if the source no longer exists
/// - `CreateDir` if the parent directory cannot be created
/// - `NoFreeName` if every suffixed name is taken
/// - `Move` if both rename and copy + delete fail
pub fn move_file(from: &Path, target: &Path) -> Result<MoveResult, MoveError> {
    if !from.exists() {
        return Err(MoveError::NotFound(from.to_path_buf()));
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| MoveError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let to = unique_path(target)?;

    if let Err(rename_err) = fs::rename(from, &to) {
        log::debug!(
            "Rename {} -> {} failed ({}); copying instead",
            from.display(),
            to.display(),
            rename_err
        );
        fs::copy(from, &to)
            .and_then(|_| fs::remove_file(from))
            .map_err(|source| MoveError::Move {
                from: from.to_path_buf(),
                to: to.clone(),
                source,
            })?;
    }

    log::info!("Moved {} -> {}", from.display(), to.display());
    Ok(MoveResult {
        from: from.to_path_buf(),
        to,
    })
}

/// Move every file in `paths` into `dup_dir`.
///
/// Files already under `dup_dir` and repeated paths are skipped. Failures are
/// collected and do not stop the batch.
pub fn relocate_duplicates(paths: &[PathBuf], root: &Path, dup_dir: &Path) -> BatchMoveResult {
    let mut result = BatchMoveResult::default();
    let mut seen = HashSet::new();

    let pending: Vec<&PathBuf> = paths
        .iter()
        .filter(|p| {
            if is_under(p, dup_dir) {
                log::debug!("Already in duplicates directory: {}", p.display());
                return false;
            }
            seen.insert(path_key(p))
        })
        .collect();
    if pending.is_empty() {
        return result;
    }

    if let Err(source) = fs::create_dir_all(dup_dir) {
        let error = MoveError::CreateDir {
            path: dup_dir.to_path_buf(),
            source,
        };
        log::error!("{}", error);
        result.failures = pending
            .into_iter()
            .map(|p| (p.clone(), error.to_string()))
            .collect();
        return result;
    }

    for path in pending {
        let target = target_for(path, root, dup_dir);
        match move_file(path, &target) {
            Ok(moved) => result.successes.push(moved),
            Err(e) => {
                log::warn!("Failed to move {}: {}", e.path().display(), e);
                result.failures.push((path.clone(), e.to_string()));
            }
        }
    }
    result
}
