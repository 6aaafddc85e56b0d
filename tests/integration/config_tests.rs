use std::fs;

use anyhow::Error;
use tempfile::tempdir;
use textmatch::commands::RunSettings;
use textmatch::cli::CommonArgs;
use textmatch::config::{Config, ConfigError};
use textmatch::error::{exit_code_for, ExitCode};
use textmatch::similarity::Metric;

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("textmatch.toml");
    fs::write(
        &path,
        r#"
threads = 3
metric = "simhash"
raw_only = true
dedup_threshold = 0.75
duplicates_dir = "Older"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.threads, Some(3));
    assert_eq!(config.metric, Metric::Simhash);
    assert!(config.raw_only);
    assert!(!config.safe_mode);
    assert_eq!(config.dedup_threshold, 0.75);
    assert_eq!(config.duplicates_dir, "Older");
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.metric, Metric::Tfidf);
    assert_eq!(config.dedup_threshold, 1.0);
    assert_eq!(config.duplicates_dir, "Duplicates");
}

#[test]
fn test_invalid_config_maps_to_usage_exit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("textmatch.toml");
    fs::write(&path, "dedup_threshold = 2.0\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "dedup_threshold",
            ..
        }
    ));
    assert_eq!(exit_code_for(&Error::from(err)), ExitCode::UsageError);
}

#[test]
fn test_malformed_config_is_load_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("textmatch.toml");
    fs::write(&path, "metric = \"levenshtein\"\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_flags_win_over_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("textmatch.toml");
    fs::write(&path, "threads = 6\nmetric = \"tfidf\"\n").unwrap();
    let config = Config::load(Some(&path)).unwrap();

    let common = CommonArgs {
        hash: true,
        threads: Some(1),
        ..CommonArgs::default()
    };
    let settings = RunSettings::resolve(&config, &common);
    assert_eq!(settings.metric, Metric::Simhash);
    assert_eq!(settings.threads, Some(1));
}
