//! Concurrent document loading.
//!
//! [`ConcurrentLoader`] runs a fixed pool of workers that drain a
//! [`WorkQueue`] of paths. The producer (the caller's thread) may still be
//! enumerating files while workers are loading. Each worker writes into its
//! own output slot; slots are merged and restored to enumeration order once
//! every worker has finished.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::document::{DocumentError, DocumentLoader};
use super::queue::WorkQueue;
use crate::progress::{ProgressCallback, PHASE_READING};
use crate::text::DocumentStatistics;

/// A successfully loaded, non-empty document.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Position of the path in the input sequence.
    pub index: usize,
    /// Path as enumerated.
    pub path: PathBuf,
    /// Token statistics, read-only from here on.
    pub stats: DocumentStatistics,
}

/// Result of one loading run, every list in enumeration order.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Usable documents.
    pub documents: Vec<LoadedDocument>,
    /// Paths whose loading failed.
    pub failed: Vec<PathBuf>,
    /// Paths that loaded but produced no countable words.
    pub empty: Vec<PathBuf>,
}

impl LoadOutcome {
    /// Number of paths processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.documents.len() + self.failed.len() + self.empty.len()
    }
}

#[derive(Default)]
struct WorkerOutput {
    documents: Vec<LoadedDocument>,
    failed: Vec<(usize, PathBuf)>,
    empty: Vec<(usize, PathBuf)>,
}

/// Fixed-size worker pool turning paths into [`DocumentStatistics`].
pub struct ConcurrentLoader<L> {
    loader: L,
    threads: Option<usize>,
    processed: Arc<AtomicUsize>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl<L: std::fmt::Debug> std::fmt::Debug for ConcurrentLoader<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentLoader")
            .field("loader", &self.loader)
            .field("threads", &self.threads)
            .field("processed", &self.processed)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl<L: DocumentLoader> ConcurrentLoader<L> {
    /// Create a loader using the detected hardware parallelism.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            threads: None,
            processed: Arc::new(AtomicUsize::new(0)),
            progress_callback: None,
        }
    }

    /// Override the number of workers (`None` means detected parallelism).
    #[must_use]
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Set a progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Number of workers a run will use (always at least 1).
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.threads
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from))
            .max(1)
    }

    /// Shared processed-items counter.
    ///
    /// Monotonically increasing across runs; may be polled from any thread.
    #[must_use]
    pub fn processed_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.processed)
    }

    /// Load one document through the wrapped loader.
    ///
    /// A panic inside the loader is reported as an error.
    pub fn load_one(&self, path: &Path) -> Result<DocumentStatistics, DocumentError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.loader.load(path))).unwrap_or_else(|_| {
            Err(DocumentError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other("document loader panicked"),
            })
        })
    }

    /// Load a known list of paths.
    pub fn load_paths(&self, paths: &[PathBuf]) -> LoadOutcome {
        self.load_stream(paths.iter().cloned(), paths.len())
    }

    /// Load paths as they are produced by `paths`.
    ///
    /// The iterator runs on the calling thread while workers consume the
    /// queue. `expected` sizes the progress bar; pass 0 when unknown.
    pub fn load_stream<I>(&self, paths: I, expected: usize) -> LoadOutcome
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let workers = self.worker_count();
        let queue = WorkQueue::new();
        let mut slots: Vec<WorkerOutput> = (0..workers).map(|_| WorkerOutput::default()).collect();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(PHASE_READING, expected);
        }

        let produce = |queue: &WorkQueue<(usize, PathBuf)>| {
            for (index, path) in paths.into_iter().enumerate() {
                queue.push((index, path));
            }
            queue.close();
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("textmatch-loader-{i}"))
            .build()
        {
            Ok(pool) => {
                log::debug!("Loading documents with {} workers", workers);
                pool.in_place_scope(|scope| {
                    for slot in slots.iter_mut() {
                        let queue = &queue;
                        scope.spawn(move |_| self.drain(queue, slot));
                    }
                    produce(&queue);
                });
            }
            Err(e) => {
                log::warn!("Failed to create loader thread pool ({}); loading inline", e);
                produce(&queue);
                if let Some(slot) = slots.first_mut() {
                    self.drain(&queue, slot);
                }
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(PHASE_READING);
        }

        merge(slots)
    }

    fn drain(&self, queue: &WorkQueue<(usize, PathBuf)>, out: &mut WorkerOutput) {
        while let Some((index, path)) = queue.pop() {
            log::debug!("Reading file: {}", path.display());
            let result = self.load_one(&path);

            let done = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(done, &path.to_string_lossy());
            }

            match result {
                Ok(stats) if stats.is_empty() => {
                    log::warn!("Skipping empty file {}", path.display());
                    out.empty.push((index, path));
                }
                Ok(stats) => out.documents.push(LoadedDocument { index, path, stats }),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    out.failed.push((index, path));
                }
            }
        }
    }
}

fn merge(slots: Vec<WorkerOutput>) -> LoadOutcome {
    let mut documents = Vec::new();
    let mut failed = Vec::new();
    let mut empty = Vec::new();
    for slot in slots {
        documents.extend(slot.documents);
        failed.extend(slot.failed);
        empty.extend(slot.empty);
    }
    documents.sort_by_key(|doc| doc.index);
    failed.sort_by_key(|(index, _)| *index);
    empty.sort_by_key(|(index, _)| *index);

    LoadOutcome {
        documents,
        failed: failed.into_iter().map(|(_, path)| path).collect(),
        empty: empty.into_iter().map(|(_, path)| path).collect(),
    }
}
