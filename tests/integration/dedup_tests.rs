use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use tempfile::tempdir;
use textmatch::commands::most_similar;
use textmatch::error::ExitCode;

use super::common::{most_similar_args, settings, write, BUDGET, GARDEN, ROCKET};

fn set_age(path: &std::path::Path, seconds_ago: u64) {
    let when = SystemTime::now() - Duration::from_secs(seconds_ago);
    set_file_mtime(path, FileTime::from_system_time(when)).unwrap();
}

#[test]
fn test_dedup_moves_lower_version() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("notes_v1.txt"), BUDGET);
    write(&root.join("notes_v2.txt"), BUDGET);
    write(&root.join("garden.txt"), GARDEN);
    let csv = dir.path().join("out.csv");

    let args = most_similar_args(&root, csv, Some(None));
    let mut out = Vec::new();
    let code = most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(root.join("Duplicates").join("notes_v1.txt").exists());
    assert!(!root.join("notes_v1.txt").exists());
    assert!(root.join("notes_v2.txt").exists());
    assert!(root.join("garden.txt").exists());
}

#[test]
fn test_dedup_moves_older_file_without_versions() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    let first = root.join("first.txt");
    let second = root.join("second.txt");
    write(&first, ROCKET);
    write(&second, ROCKET);
    write(&root.join("garden.txt"), GARDEN);
    set_age(&first, 60);
    set_age(&second, 3600);

    let args = most_similar_args(&root, dir.path().join("out.csv"), Some(None));
    let mut out = Vec::new();
    let code = most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(first.exists());
    assert!(!second.exists());
    assert!(root.join("Duplicates").join("second.txt").exists());
}

#[test]
fn test_dedup_preserves_relative_layout() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("team").join("minutes_v1.txt"), BUDGET);
    write(&root.join("team").join("minutes_v2.txt"), BUDGET);
    write(&root.join("garden.txt"), GARDEN);

    let args = most_similar_args(&root, dir.path().join("out.csv"), Some(None));
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    assert!(root
        .join("Duplicates")
        .join("team")
        .join("minutes_v1.txt")
        .exists());
    assert!(root.join("team").join("minutes_v2.txt").exists());
}

#[test]
fn test_threshold_controls_near_duplicates() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    let edited = format!("{BUDGET} Approved by the finance committee.");
    write(&root.join("draft_v1.txt"), BUDGET);
    write(&root.join("draft_v2.txt"), &edited);
    write(&root.join("garden.txt"), GARDEN);

    // Not identical, so the default threshold of 1.0 moves nothing.
    let args = most_similar_args(&root, dir.path().join("strict.csv"), Some(None));
    let mut out = Vec::new();
    let code = most_similar::run(&args, &settings(&args.common), &mut out).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(root.join("draft_v1.txt").exists());
    assert!(!root.join("Duplicates").exists());

    let args = most_similar_args(&root, dir.path().join("loose.csv"), Some(Some(0.5)));
    let mut out = Vec::new();
    let code = most_similar::run(&args, &settings(&args.common), &mut out).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(!root.join("draft_v1.txt").exists());
    assert!(root.join("Duplicates").join("draft_v1.txt").exists());
}

#[test]
fn test_rerun_skips_duplicates_directory() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("notes_v1.txt"), BUDGET);
    write(&root.join("notes_v2.txt"), BUDGET);
    write(&root.join("garden.txt"), GARDEN);

    let args = most_similar_args(&root, dir.path().join("one.csv"), Some(None));
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();
    assert!(root.join("Duplicates").join("notes_v1.txt").exists());

    // The moved copy is not rescanned, so nothing else moves.
    let args = most_similar_args(&root, dir.path().join("two.csv"), Some(None));
    let mut out = Vec::new();
    let code = most_similar::run(&args, &settings(&args.common), &mut out).unwrap();
    assert_eq!(code, ExitCode::Success);
    assert!(root.join("notes_v2.txt").exists());
    assert!(root.join("garden.txt").exists());

    let report = std::fs::read_to_string(dir.path().join("two.csv")).unwrap();
    assert!(!report.contains("Duplicates"));
}

#[test]
fn test_without_dedup_nothing_moves() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("notes_v1.txt"), BUDGET);
    write(&root.join("notes_v2.txt"), BUDGET);

    let args = most_similar_args(&root, dir.path().join("out.csv"), None);
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    assert!(root.join("notes_v1.txt").exists());
    assert!(root.join("notes_v2.txt").exists());
    assert!(!root.join("Duplicates").exists());
}
