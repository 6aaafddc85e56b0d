//! File actions module.
//!
//! This module provides relocation of duplicates found by a most-similar run:
//! - Move into a duplicates directory under the scanned root
//! - Relative layout preserved, name collisions resolved with numeric suffixes
//! - Rename with copy + delete fallback
//! - Batch operation with per-file failure reporting
//!
//! ```no_run
//! use textmatch::actions::relocate::move_file;
//! use std::path::Path;
//!
//! let result = move_file(Path::new("notes_v1.txt"), Path::new("Duplicates/notes_v1.txt"));
//! ```

pub mod relocate;

// Re-export commonly used types
pub use relocate::{
    move_file, relocate_duplicates, target_for, unique_path, BatchMoveResult, MoveError,
    MoveResult,
};
