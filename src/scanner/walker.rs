//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! [`Walker`] enumerates candidate documents below a root directory. It only
//! yields regular files (or symlinks to regular files) whose extension is in
//! the fixed allowed-text set, in file-name order so that the scan order is
//! reproducible between runs.
//!
//! # Features
//!
//! - Recursive or single-level traversal
//! - An excluded directory that is never descended into
//! - Per-entry errors are yielded, not fatal
//!
//! # Example
//!
//! ```no_run
//! use textmatch::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Documents"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use walkdir::WalkDir;

use super::path_utils::lower_extension;
use super::ScanError;

/// Extensions (lowercase, without the dot) of files worth comparing.
const ALLOWED_EXTENSIONS: &[&str] = &[
    "1", "1p", "3", "3p", "adoc", "ads", "adb", "ada", "ahk", "as", "asm", "asciidoc", "awk",
    "bash", "bas", "bat", "bib", "c", "c++", "cc", "cfg", "cl", "clj", "cljc", "cljs", "cmake",
    "cmd", "cob", "cbl", "coffee", "conf", "cp", "cpp", "cppm", "cs", "csproj", "csx", "css",
    "csv", "cxx", "d", "dart", "diff", "doc", "docm", "docx", "dot", "dotm", "dotx", "dpr", "dts",
    "dtsi", "edn", "el", "elm", "erl", "ex", "exs", "f", "f03", "f08", "f77", "f90", "f95", "fish",
    "for", "fs", "fsi", "fsproj", "fsx", "fpp", "go", "gql", "gradle", "groovy", "gvy", "gyp",
    "gypi", "h", "h++", "hxx", "hh", "hpp", "hrl", "hs", "htm", "html", "idl", "inc", "inl", "ini",
    "ipp", "ipynb", "ixx", "java", "jl", "js", "json", "jsx", "kt", "kts", "less", "lhs", "lisp",
    "log", "lua", "m", "make", "markdown", "md", "mk", "mm", "mjs", "cjs", "ml", "mli", "mll",
    "mly", "mpp", "nim", "odin", "odp", "ods", "odt", "pas", "p", "php", "phtml", "phps", "pl",
    "pm", "pod", "pp", "proto", "ps1", "psd1", "psm1", "py", "pyi", "pyw", "pyx", "pxd", "qml",
    "qbs", "r", "rake", "rmd", "rb", "rei", "res", "rst", "rs", "rtf", "s", "scala", "sc", "scm",
    "scss", "sh", "sql", "ss", "sld", "sty", "sv", "svh", "svg", "swift", "t", "tex", "thrift",
    "toml", "ts", "tsv", "tsx", "txt", "vala", "vapi", "vb", "vba", "vbs", "v", "vh", "vhd",
    "vhdl", "vue", "xaml", "xsd", "xsl", "xslt", "xml", "yaml", "yml", "zsh", "zig", "pdf", "pot",
    "potm", "potx", "pps", "ppsm", "ppsx", "ppt", "pptm", "pptx", "xls", "xlsm", "xlsx", "xlt",
    "xltm", "xltx",
];

static ALLOWED: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ALLOWED_EXTENSIONS.iter().copied().collect());

/// Whether `path` has one of the allowed text-like extensions (case-insensitive).
#[must_use]
pub fn is_allowed_text_file(path: &Path) -> bool {
    let ext = lower_extension(path);
    !ext.is_empty() && ALLOWED.contains(ext.as_str())
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into subdirectories.
    pub recursive: bool,

    /// Directory that is never descended into (the duplicates directory
    /// during dedup runs).
    pub exclude_dir: Option<PathBuf>,
}

/// Directory walker for document discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists and is a directory.
    pub fn check_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) => Err(ScanError::from_io(self.root.clone(), e)),
        }
    }

    /// Walk the directory tree, yielding candidate file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Call [`Walker::check_root`] first to fail early on a bad
    /// root.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let exclude = self.config.exclude_dir.clone();

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                let skip = entry.file_type().is_dir()
                    && exclude.as_deref().is_some_and(|dir| entry.path() == dir);
                if skip {
                    log::debug!("Not descending into {}", entry.path().display());
                }
                !skip
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    let is_file = if file_type.is_symlink() {
                        std::fs::metadata(path).is_ok_and(|m| m.is_file())
                    } else {
                        file_type.is_file()
                    };
                    if !is_file {
                        log::trace!("Skipping non-regular file: {}", path.display());
                        return None;
                    }
                    if !is_allowed_text_file(path) {
                        log::trace!("Skipping by extension: {}", path.display());
                        return None;
                    }
                    Some(Ok(entry.into_path()))
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Validate the root and collect every candidate path.
    ///
    /// Per-entry errors are logged and skipped.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>, ScanError> {
        self.check_root()?;
        Ok(self
            .walk()
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Skipping path due to error: {}", e);
                    None
                }
            })
            .collect())
    }

    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            },
        }
    }
}
