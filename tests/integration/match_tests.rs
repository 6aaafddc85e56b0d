use std::fs;
use std::path::Path;

use tempfile::tempdir;
use textmatch::cli::MatchArgs;
use textmatch::commands::match_sample;
use textmatch::error::{exit_code_for, ExitCode};

use super::common::{common_args, settings, write, BUDGET, GARDEN, ROCKET};

fn match_args(sample: &Path, repository: &Path, recursive: bool) -> MatchArgs {
    MatchArgs {
        sample: sample.to_path_buf(),
        repository: repository.to_path_buf(),
        recursive,
        common: common_args(),
    }
}

fn run_lines(args: &MatchArgs) -> Vec<(f64, String)> {
    let mut out = Vec::new();
    let code = match_sample::run(args, &settings(&args.common), &mut out).unwrap();
    assert_eq!(code, ExitCode::Success);
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| {
            let (score, path) = line.split_once(' ').unwrap();
            (score.parse().unwrap(), path.to_string())
        })
        .collect()
}

#[test]
fn test_ranks_repository_against_sample() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, BUDGET);
    let repo = dir.path().join("repo");
    write(&repo.join("garden.txt"), GARDEN);
    write(&repo.join("copy.txt"), BUDGET);
    write(&repo.join("thrust.txt"), ROCKET);

    let lines = run_lines(&match_args(&sample, &repo, false));
    assert_eq!(lines.len(), 3);
    assert!(lines[0].1.ends_with("copy.txt"));
    assert!((lines[0].0 - 1.0).abs() < 1e-8);
    assert!(lines.windows(2).all(|w| w[0].0 >= w[1].0));
}

#[test]
fn test_scores_have_eight_decimals() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, GARDEN);
    let repo = dir.path().join("repo");
    write(&repo.join("garden.txt"), GARDEN);

    let mut out = Vec::new();
    let args = match_args(&sample, &repo, false);
    match_sample::run(&args, &settings(&args.common), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let score = text.split_whitespace().next().unwrap();
    assert_eq!(score, "1.00000000");
}

#[test]
fn test_recursive_flag() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, ROCKET);
    let repo = dir.path().join("repo");
    write(&repo.join("top.txt"), ROCKET);
    write(&repo.join("nested").join("deep.txt"), ROCKET);

    let flat = run_lines(&match_args(&sample, &repo, false));
    assert_eq!(flat.len(), 1);
    assert!(flat[0].1.ends_with("top.txt"));

    let all = run_lines(&match_args(&sample, &repo, true));
    assert_eq!(all.len(), 2);
}

#[test]
fn test_equal_scores_ordered_by_path() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, BUDGET);
    let repo = dir.path().join("repo");
    write(&repo.join("zeta.txt"), GARDEN);
    write(&repo.join("alpha.txt"), GARDEN);

    let lines = run_lines(&match_args(&sample, &repo, false));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].0, lines[1].0);
    assert!(lines[0].1.ends_with("alpha.txt"));
    assert!(lines[1].1.ends_with("zeta.txt"));
}

#[test]
fn test_empty_repository_prints_nothing() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, BUDGET);
    let repo = dir.path().join("repo");
    fs::create_dir_all(&repo).unwrap();

    assert!(run_lines(&match_args(&sample, &repo, true)).is_empty());
}

#[test]
fn test_empty_sample_is_error() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, " ... \n");
    let repo = dir.path().join("repo");
    write(&repo.join("garden.txt"), GARDEN);

    let args = match_args(&sample, &repo, false);
    let mut out = Vec::new();
    let err = match_sample::run(&args, &settings(&args.common), &mut out).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
    assert_eq!(exit_code_for(&err), ExitCode::Failure);
}

#[test]
fn test_missing_sample_is_error() {
    let dir = tempdir().unwrap();
    let repo = dir.path().join("repo");
    write(&repo.join("garden.txt"), GARDEN);

    let args = match_args(&dir.path().join("absent.txt"), &repo, false);
    let mut out = Vec::new();
    assert!(match_sample::run(&args, &settings(&args.common), &mut out).is_err());
}

#[test]
fn test_missing_repository_is_error() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.txt");
    write(&sample, BUDGET);

    let args = match_args(&sample, &dir.path().join("absent"), false);
    let mut out = Vec::new();
    let err = match_sample::run(&args, &settings(&args.common), &mut out).unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::Failure);
    assert!(out.is_empty());
}
