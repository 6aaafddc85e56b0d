//! Subcommand drivers.
//!
//! Each driver wires the scanner, the similarity metric and the matching
//! engine together for one subcommand and writes its report to the given
//! writer. Diagnostics go through `log`; progress bars go to stderr.

pub mod match_sample;
pub mod most_similar;

use std::sync::Arc;

use crate::cli::CommonArgs;
use crate::config::Config;
use crate::matching::{BestMatches, MatchError, MatchFinder};
use crate::progress::ProgressCallback;
use crate::scanner::{ConcurrentLoader, FormatLoader, LoadOptions};
use crate::similarity::{signatures, Metric};
use crate::text::DocumentStatistics;

/// Effective settings for one run: configuration overridden by flags.
#[derive(Clone)]
pub struct RunSettings {
    /// Similarity metric.
    pub metric: Metric,
    /// Loader thread override.
    pub threads: Option<usize>,
    /// Document loader flags.
    pub load_options: LoadOptions,
    /// Threshold used by a bare `--dedup`.
    pub dedup_threshold: f64,
    /// Duplicates directory name.
    pub duplicates_dir: String,
    /// Progress reporter.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for RunSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSettings")
            .field("metric", &self.metric)
            .field("threads", &self.threads)
            .field("load_options", &self.load_options)
            .field("dedup_threshold", &self.dedup_threshold)
            .field("duplicates_dir", &self.duplicates_dir)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl RunSettings {
    /// Merge command-line flags over the loaded configuration.
    #[must_use]
    pub fn resolve(config: &Config, common: &CommonArgs) -> Self {
        Self {
            metric: if common.hash {
                Metric::Simhash
            } else {
                config.metric
            },
            threads: common.threads.or(config.threads),
            load_options: LoadOptions {
                safe_mode: common.safe || config.safe_mode,
                raw_only: common.no_convert || config.raw_only,
            },
            dedup_threshold: config.dedup_threshold,
            duplicates_dir: config.duplicates_dir.clone(),
            progress: None,
        }
    }

    /// Attach a progress reporter.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Worker pool over the default format loader.
    #[must_use]
    pub fn loader(&self) -> ConcurrentLoader<FormatLoader> {
        let loader = ConcurrentLoader::new(FormatLoader::new(self.load_options))
            .with_threads(self.threads);
        match self.progress {
            Some(ref progress) => loader.with_progress_callback(Arc::clone(progress)),
            None => loader,
        }
    }

    /// Best-match search with this run's progress reporter.
    #[must_use]
    pub fn finder(&self) -> MatchFinder {
        match self.progress {
            Some(ref progress) => MatchFinder::new().with_progress_callback(Arc::clone(progress)),
            None => MatchFinder::new(),
        }
    }

    /// Log the pool size when it was not set explicitly.
    pub fn report_threads(&self, loader: &ConcurrentLoader<FormatLoader>) {
        if self.threads.is_none() {
            log::info!("Threads used (max): {}", loader.worker_count());
        }
    }
}

/// Run the best-match search under `metric`.
///
/// # Errors
///
/// Returns [`MatchError::NotEnoughDocuments`] for fewer than two documents.
pub fn find_matches(
    finder: &MatchFinder,
    metric: Metric,
    docs: &[DocumentStatistics],
) -> Result<BestMatches, MatchError> {
    match metric {
        Metric::Tfidf => finder.find(docs),
        Metric::Simhash => finder.find(&signatures(docs)),
    }
}
