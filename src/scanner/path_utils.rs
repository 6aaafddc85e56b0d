//! Path helpers: Unicode normalization and root-relative paths.
//!
//! macOS stores file names decomposed (NFD) while most other systems store
//! them composed (NFC), so the same visible name can arrive with different
//! bytes. Comparison keys are NFC-normalized.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use textmatch::scanner::path_utils::{path_key, relative_to_root};
//!
//! assert_eq!(path_key(Path::new("café.txt")), path_key(Path::new("cafe\u{0301}.txt")));
//!
//! let rel = relative_to_root(Path::new("/data/docs/a.txt"), Path::new("/data"));
//! assert_eq!(rel, Some(Path::new("docs/a.txt").to_path_buf()));
//! ```

use std::path::{Component, Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Create a normalized comparison key for a path.
///
/// Invalid UTF-8 is converted lossily.
#[must_use]
pub fn path_key(path: &Path) -> String {
    normalize_path_str(&path.to_string_lossy())
}

/// Make `path` absolute against the current directory without touching the
/// filesystem, dropping `.` components and folding `..` lexically.
#[must_use]
pub fn absolute_lexical(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` relative to `root`, if it lies under it.
///
/// Both sides are made absolute lexically first. Returns `None` when `path`
/// is outside `root` or equal to it.
#[must_use]
pub fn relative_to_root(path: &Path, root: &Path) -> Option<PathBuf> {
    let path = absolute_lexical(path);
    let root = absolute_lexical(root);
    match path.strip_prefix(&root) {
        Ok(rel) if !rel.as_os_str().is_empty() => Some(rel.to_path_buf()),
        _ => None,
    }
}

/// Whether `path` is `dir` itself or lies anywhere beneath it.
#[must_use]
pub fn is_under(path: &Path, dir: &Path) -> bool {
    absolute_lexical(path).starts_with(absolute_lexical(dir))
}

/// Lowercased extension of `path`, without the dot; empty if none.
#[must_use]
pub fn lower_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
