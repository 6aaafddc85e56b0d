use std::fs;

use tempfile::tempdir;
use textmatch::cli::{CommonArgs, MostSimilarArgs};
use textmatch::commands::most_similar;
use textmatch::error::{exit_code_for, ExitCode};
use textmatch::matching::MatchError;

use super::common::{most_similar_args, settings, write, BUDGET, GARDEN, ROCKET};

fn read_csv(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["file", "most_similar", "score", "pair_id"]);
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

#[test]
fn test_report_shows_pair_once() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("notes_v1.txt"), BUDGET);
    write(&root.join("notes_v2.txt"), BUDGET);
    write(&root.join("garden.txt"), GARDEN);
    let csv = dir.path().join("report.csv");

    let args = most_similar_args(&root, csv.clone(), None);
    let mut out = Vec::new();
    let code = most_similar::run(&args, &settings(&args.common), &mut out).unwrap();
    assert_eq!(code, ExitCode::Success);

    let records = read_csv(&csv);
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0][..3],
        [".../notes_v2.txt", ".../notes_v1.txt", "1.00000000"]
    );
    assert_eq!(records[1][0], ".../garden.txt");
    assert_ne!(records[0][3], records[1][3]);

    let table = String::from_utf8(out).unwrap();
    assert!(table.contains("| File"));
    assert!(table.contains(".../notes_v2.txt"));
    assert!(table.contains("1.00000000"));
    assert!(table.contains("Reciprocal best matches"));
}

#[test]
fn test_unrelated_documents_each_get_a_row() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("budget.txt"), BUDGET);
    write(&root.join("garden.txt"), GARDEN);
    write(&root.join("thrust.txt"), ROCKET);
    let csv = dir.path().join("report.csv");

    let args = most_similar_args(&root, csv.clone(), None);
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    // Reciprocal pairs share a row, so every file shows up in one of the
    // two path columns.
    let records = read_csv(&csv);
    let mut files: Vec<&str> = records
        .iter()
        .flat_map(|r| [r[0].as_str(), r[1].as_str()])
        .collect();
    files.sort_unstable();
    files.dedup();
    assert_eq!(files, [".../budget.txt", ".../garden.txt", ".../thrust.txt"]);

    let scores: Vec<f64> = records.iter().map(|r| r[2].parse().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| (0.0..1.0).contains(s)));
}

#[test]
fn test_hash_metric() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("copy_a.txt"), ROCKET);
    write(&root.join("copy_c.txt"), ROCKET);
    write(&root.join("garden.txt"), GARDEN);
    let csv = dir.path().join("hash.csv");

    let args = MostSimilarArgs {
        directory: root.clone(),
        dedup: None,
        output: Some(csv.clone()),
        common: CommonArgs {
            hash: true,
            threads: Some(2),
            ..CommonArgs::default()
        },
    };
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    let records = read_csv(&csv);
    assert_eq!(records[0][2], "1.00000000");
    assert_eq!(records.len(), 2);
}

#[test]
fn test_nested_files_are_scanned() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("one").join("deep").join("budget.md"), BUDGET);
    write(&root.join("two").join("budget.txt"), BUDGET);
    write(&root.join("image.png"), BUDGET);

    let csv = dir.path().join("nested.csv");
    let args = most_similar_args(&root, csv.clone(), None);
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    let records = read_csv(&csv);
    assert_eq!(records.len(), 1);
    let pair = [records[0][0].as_str(), records[0][1].as_str()];
    assert!(pair.contains(&".../one/deep/budget.md"));
    assert!(pair.contains(&".../two/budget.txt"));
}

#[cfg(unix)]
#[test]
fn test_csv_quotes_awkward_names() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("say \"hi\", twice.txt"), BUDGET);
    write(&root.join("plain.txt"), BUDGET);
    let csv = dir.path().join("quoted.csv");

    let args = most_similar_args(&root, csv.clone(), None);
    let mut out = Vec::new();
    most_similar::run(&args, &settings(&args.common), &mut out).unwrap();

    let raw = fs::read_to_string(&csv).unwrap();
    assert!(raw.contains("\"\"hi\"\""));

    let records = read_csv(&csv);
    assert_eq!(records.len(), 1);
    let pair = [records[0][0].as_str(), records[0][1].as_str()];
    assert!(pair.contains(&".../say \"hi\", twice.txt"));
}

#[test]
fn test_empty_directory_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    fs::create_dir_all(&root).unwrap();

    let args = most_similar_args(&root, dir.path().join("x.csv"), None);
    let mut out = Vec::new();
    let err = most_similar::run(&args, &settings(&args.common), &mut out).unwrap_err();
    assert!(err.to_string().contains("No files found"));
    assert_eq!(exit_code_for(&err), ExitCode::Failure);
}

#[test]
fn test_single_document_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("docs");
    write(&root.join("budget.txt"), BUDGET);
    write(&root.join("blank.txt"), "   \n\t ");

    let args = most_similar_args(&root, dir.path().join("x.csv"), None);
    let mut out = Vec::new();
    let err = most_similar::run(&args, &settings(&args.common), &mut out).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MatchError>(),
        Some(MatchError::NotEnoughDocuments { found: 1 })
    ));
    assert_eq!(exit_code_for(&err), ExitCode::Failure);
    assert!(!dir.path().join("x.csv").exists());
}

#[test]
fn test_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let args = most_similar_args(&dir.path().join("absent"), dir.path().join("x.csv"), None);
    let mut out = Vec::new();
    let err = most_similar::run(&args, &settings(&args.common), &mut out).unwrap_err();
    assert_eq!(exit_code_for(&err), ExitCode::Failure);
}
