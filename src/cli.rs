//! Command-line interface definitions for textmatch.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, error format, config file) apply to both subcommands.
//!
//! # Example
//!
//! ```bash
//! # Rank every file in a directory tree against one sample
//! textmatch match notes.txt ~/Documents -r
//!
//! # Best match for each file, moving identical copies into ./corpus/Duplicates
//! textmatch most-similar ./corpus --dedup
//!
//! # Same, with SimHash and a looser threshold
//! textmatch -v most-similar ./corpus --hash --dedup 0.95
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Near-duplicate document finder.
///
/// textmatch scores documents by TF-IDF cosine similarity (or 128-bit
/// SimHash), reports each file's closest match, and can move older
/// near-duplicates aside.
#[derive(Debug, Parser)]
#[command(name = "textmatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for per-file reads, -vv for every pairwise score)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score one sample file against every file in a directory
    Match(MatchArgs),
    /// Find each file's most similar file within a directory
    MostSimilar(MostSimilarArgs),
}

/// Loading and scoring options shared by both subcommands.
#[derive(Debug, Args, Default)]
pub struct CommonArgs {
    /// Use 128-bit SimHash instead of TF-IDF cosine
    #[arg(long)]
    pub hash: bool,

    /// Number of loader threads (default: detected parallelism)
    #[arg(long, value_name = "N", value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Serialize PDF extraction (for backends that are not thread-safe)
    #[arg(long)]
    pub safe: bool,

    /// Tokenize raw bytes without format-specific text extraction
    #[arg(long)]
    pub no_convert: bool,
}

/// Arguments for the match subcommand.
#[derive(Debug, Args)]
pub struct MatchArgs {
    /// File to compare against the repository
    #[arg(value_name = "SAMPLE")]
    pub sample: PathBuf,

    /// Directory of files to score
    #[arg(value_name = "REPOSITORY")]
    pub repository: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the most-similar subcommand.
#[derive(Debug, Args)]
pub struct MostSimilarArgs {
    /// Directory to scan (recursively)
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Move reciprocal duplicates scoring at least THRESHOLD into the duplicates directory
    ///
    /// Without a value the configured threshold is used (1.0 by default,
    /// i.e. identical scores only).
    #[arg(long, value_name = "THRESHOLD", num_args = 0..=1, value_parser = parse_threshold)]
    pub dedup: Option<Option<f64>>,

    /// CSV output path (default: <directory name>_mostsimilar[_hash].csv)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Parse a thread count (at least 1).
///
/// # Examples
///
/// ```
/// use textmatch::cli::parse_threads;
///
/// assert_eq!(parse_threads("4").unwrap(), 4);
/// assert!(parse_threads("0").is_err());
/// ```
///
/// # Errors
///
/// Returns an error for anything that is not a positive integer.
pub fn parse_threads(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid thread count: '{s}'"))?;
    if n == 0 {
        return Err("Thread count must be at least 1".to_string());
    }
    Ok(n)
}

/// Parse a similarity threshold in [0, 1].
///
/// # Examples
///
/// ```
/// use textmatch::cli::parse_threshold;
///
/// assert_eq!(parse_threshold("0.95").unwrap(), 0.95);
/// assert!(parse_threshold("1.5").is_err());
/// ```
///
/// # Errors
///
/// Returns an error for non-numbers and values outside [0, 1].
pub fn parse_threshold(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid threshold: '{s}'"))?;
    if !(0.0..=1.0).contains(&t) {
        return Err(format!("Threshold must be between 0 and 1, got {t}"));
    }
    Ok(t)
}
