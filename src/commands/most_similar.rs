//! `most-similar`: best match for every file under a directory.
//!
//! Prints the report table, writes the CSV file and, with `--dedup`, moves
//! the older file of each qualifying reciprocal pair into the duplicates
//! directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::{find_matches, RunSettings};
use crate::actions::relocate::relocate_duplicates;
use crate::cli::MostSimilarArgs;
use crate::error::ExitCode;
use crate::matching::{
    build_rows, dedup_plan, extract_version_info, FileTimeInfo, VersionInfo,
};
use crate::output::{csv_file_name, display_rows, CsvOutput, TableOutput};
use crate::scanner::{Walker, WalkerConfig};
use crate::text::DocumentStatistics;

/// Run the subcommand, writing the table to `out`.
///
/// # Errors
///
/// Fails if the directory cannot be scanned, holds no candidate files or
/// fewer than two usable documents, or if the CSV cannot be written.
pub fn run(
    args: &MostSimilarArgs,
    settings: &RunSettings,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let root = args.directory.as_path();
    let dup_dir = root.join(&settings.duplicates_dir);
    let dedup_threshold = args
        .dedup
        .map(|value| value.unwrap_or(settings.dedup_threshold));

    let walker = Walker::new(
        root,
        WalkerConfig {
            recursive: true,
            exclude_dir: dedup_threshold.is_some().then(|| dup_dir.clone()),
        },
    );
    let files = walker
        .collect_files()
        .with_context(|| format!("Cannot open directory {}", root.display()))?;
    if files.is_empty() {
        bail!("No files found in {}", root.display());
    }
    log::debug!("Found {} candidate files", files.len());

    let loader = settings.loader();
    let outcome = loader.load_paths(&files);
    settings.report_threads(&loader);

    let (paths, docs): (Vec<PathBuf>, Vec<DocumentStatistics>) = outcome
        .documents
        .into_iter()
        .map(|doc| (doc.path, doc.stats))
        .unzip();

    let matches = find_matches(&settings.finder(), settings.metric, &docs)?;
    drop(docs);

    let versions: Vec<VersionInfo> = paths.iter().map(|p| extract_version_info(p)).collect();
    let times: Vec<FileTimeInfo> = paths.iter().map(|p| FileTimeInfo::from_path(p)).collect();

    let rows = build_rows(&matches, &versions, &times);
    let shown = display_rows(&rows, &paths, root);

    TableOutput::new(&shown).write_to(&mut *out)?;

    let csv_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(csv_file_name(root, settings.metric)));
    CsvOutput::new(&shown)
        .write_file(&csv_path)
        .with_context(|| format!("Cannot write CSV {}", csv_path.display()))?;
    log::info!("Wrote {}", csv_path.display());

    match dedup_threshold {
        Some(threshold) => Ok(dedup(&matches, &paths, &versions, &times, root, &dup_dir, threshold)),
        None => Ok(ExitCode::Success),
    }
}

fn dedup(
    matches: &crate::matching::BestMatches,
    paths: &[PathBuf],
    versions: &[VersionInfo],
    times: &[FileTimeInfo],
    root: &Path,
    dup_dir: &Path,
    threshold: f64,
) -> ExitCode {
    let plan = dedup_plan(matches, versions, times, threshold);
    let to_move: Vec<PathBuf> = plan
        .iter()
        .filter_map(|pair| paths.get(pair.duplicate).cloned())
        .collect();

    let result = relocate_duplicates(&to_move, root, dup_dir);
    if result.success_count() == 0 && result.failure_count() == 0 {
        log::info!("Dedup: no matches at or above the threshold.");
    } else {
        log::info!(
            "Dedup: moved {} file(s) to {}",
            result.success_count(),
            dup_dir.display()
        );
    }

    if result.all_succeeded() {
        ExitCode::Success
    } else {
        for (path, error) in &result.failures {
            log::error!("Dedup failed for {}: {}", path.display(), error);
        }
        ExitCode::Failure
    }
}
