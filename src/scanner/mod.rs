//! Scanner module for file discovery and document loading.
//!
//! This module provides functionality for:
//! - Directory enumeration using walkdir, filtered to text-like extensions
//! - Format-aware text extraction (PDF, OOXML/ODF, RTF, legacy Office, raw)
//! - A concurrent worker pool turning paths into [`DocumentStatistics`]
//! - Unicode path normalization
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`document`]: The [`DocumentLoader`] seam and the default format loader
//! - [`markup`]: Byte-level text scrapers for XML, RTF and binary formats
//! - [`queue`]: Closable blocking work queue
//! - [`loader`]: The [`ConcurrentLoader`] worker pool
//!
//! # Example
//!
//! ```no_run
//! use textmatch::scanner::{ConcurrentLoader, FormatLoader, LoadOptions, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let files = walker.collect_files().unwrap();
//!
//! let loader = ConcurrentLoader::new(FormatLoader::new(LoadOptions::default()));
//! let outcome = loader.load_paths(&files);
//! for doc in &outcome.documents {
//!     println!("{}: {} words", doc.path.display(), doc.stats.total_words());
//! }
//! ```
//!
//! [`DocumentStatistics`]: crate::text::DocumentStatistics

pub mod document;
pub mod loader;
pub mod markup;
pub mod path_utils;
pub mod queue;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use document::{DocumentError, DocumentLoader, FormatLoader, LoadOptions};
pub use loader::{ConcurrentLoader, LoadOutcome, LoadedDocument};
pub use queue::WorkQueue;
pub use walker::{is_allowed_text_file, Walker, WalkerConfig};

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error for `path` into the matching variant.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}
