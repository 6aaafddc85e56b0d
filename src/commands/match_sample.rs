//! `match`: score one sample against every file in a repository directory.
//!
//! Output is one `"{score:.8} {path}"` line per usable repository file,
//! highest score first, ties by ascending path.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::RunSettings;
use crate::cli::MatchArgs;
use crate::error::ExitCode;
use crate::matching::score_against;
use crate::output::format_score;
use crate::scanner::{Walker, WalkerConfig};
use crate::similarity::{Metric, SimHash128};
use crate::text::DocumentStatistics;

/// One scored repository file.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleScore {
    /// Similarity to the sample.
    pub score: f64,
    /// Repository path.
    pub path: PathBuf,
}

/// Run the subcommand, writing the ranking to `out`.
///
/// # Errors
///
/// Fails if the sample cannot be read or has no words, if the repository is
/// not a readable directory, or if writing the output fails.
pub fn run(args: &MatchArgs, settings: &RunSettings, out: &mut dyn Write) -> Result<ExitCode> {
    let loader = settings.loader();

    let sample = loader
        .load_one(&args.sample)
        .with_context(|| format!("Cannot load sample {}", args.sample.display()))?;
    if sample.is_empty() {
        bail!("Sample file must be non-empty: {}", args.sample.display());
    }

    let walker = Walker::new(
        &args.repository,
        WalkerConfig {
            recursive: args.recursive,
            exclude_dir: None,
        },
    );
    walker
        .check_root()
        .with_context(|| format!("Cannot open repository {}", args.repository.display()))?;

    let paths = walker.walk().filter_map(|entry| match entry {
        Ok(path) => Some(path),
        Err(e) => {
            log::warn!("Skipping path due to error: {}", e);
            None
        }
    });
    let outcome = loader.load_stream(paths, 0);
    settings.report_threads(&loader);
    log::debug!(
        "Loaded {} of {} repository files",
        outcome.documents.len(),
        outcome.processed()
    );

    let (paths, docs): (Vec<PathBuf>, Vec<DocumentStatistics>) = outcome
        .documents
        .into_iter()
        .map(|doc| (doc.path, doc.stats))
        .unzip();

    let ranked = rank(&sample, &docs, paths, settings.metric);
    for entry in &ranked {
        writeln!(out, "{} {}", format_score(entry.score), entry.path.display())?;
    }
    out.flush()?;

    Ok(ExitCode::Success)
}

/// Score `sample` against `docs` and order the result for display.
#[must_use]
pub fn rank(
    sample: &DocumentStatistics,
    docs: &[DocumentStatistics],
    paths: Vec<PathBuf>,
    metric: Metric,
) -> Vec<SampleScore> {
    let scores = match metric {
        Metric::Tfidf => score_against(sample, docs),
        Metric::Simhash => {
            let signature = SimHash128::from_statistics(sample);
            score_against(&signature, &crate::similarity::signatures(docs))
        }
    };

    let mut ranked: Vec<SampleScore> = scores
        .into_iter()
        .zip(paths)
        .map(|(score, path)| SampleScore { score, path })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| cmp_paths(&a.path, &b.path))
    });
    ranked
}

fn cmp_paths(a: &Path, b: &Path) -> std::cmp::Ordering {
    a.as_os_str().cmp(b.as_os_str())
}
