use std::fs;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use tempfile::tempdir;
use textmatch::scanner::{ConcurrentLoader, FormatLoader, LoadOptions, Walker, WalkerConfig};

use super::common::{write, BUDGET, GARDEN, ROCKET};

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_walk_is_sorted_and_filtered() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("c.md"), BUDGET);
    write(&dir.path().join("a.txt"), GARDEN);
    write(&dir.path().join("B.TXT"), ROCKET);
    write(&dir.path().join("photo.jpg"), BUDGET);
    write(&dir.path().join("Makefile"), BUDGET);

    let files = Walker::new(dir.path(), WalkerConfig::default())
        .collect_files()
        .unwrap();
    assert_eq!(file_names(&files), ["B.TXT", "a.txt", "c.md"]);
}

#[test]
fn test_walk_depth_and_exclusion() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("top.txt"), BUDGET);
    write(&root.join("sub").join("inner.txt"), GARDEN);
    write(&root.join("Duplicates").join("moved.txt"), ROCKET);

    let shallow = Walker::new(root, WalkerConfig::default())
        .collect_files()
        .unwrap();
    assert_eq!(file_names(&shallow), ["top.txt"]);

    let deep = Walker::new(
        root,
        WalkerConfig {
            recursive: true,
            exclude_dir: None,
        },
    )
    .collect_files()
    .unwrap();
    assert_eq!(file_names(&deep), ["moved.txt", "inner.txt", "top.txt"]);

    let excluded = Walker::new(
        root,
        WalkerConfig {
            recursive: true,
            exclude_dir: Some(root.join("Duplicates")),
        },
    )
    .collect_files()
    .unwrap();
    assert_eq!(file_names(&excluded), ["inner.txt", "top.txt"]);
}

#[test]
fn test_walk_rejects_file_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("single.txt");
    write(&file, BUDGET);
    assert!(Walker::new(&file, WalkerConfig::default())
        .collect_files()
        .is_err());
}

#[test]
fn test_load_directory_end_to_end() {
    let dir = tempdir().unwrap();
    for i in 0..24 {
        let text = match i % 3 {
            0 => BUDGET,
            1 => GARDEN,
            _ => ROCKET,
        };
        write(&dir.path().join(format!("doc{i:02}.txt")), text);
    }
    write(&dir.path().join("zz_blank.txt"), "  \n");
    fs::write(dir.path().join("zz_binary.log"), [0xFF_u8, 0xFE, 0x00, 0x01]).unwrap();

    let files = Walker::new(dir.path(), WalkerConfig::default())
        .collect_files()
        .unwrap();
    assert_eq!(files.len(), 26);

    let loader =
        ConcurrentLoader::new(FormatLoader::new(LoadOptions::default())).with_threads(Some(4));
    let outcome = loader.load_paths(&files);

    assert_eq!(outcome.documents.len(), 24);
    assert_eq!(outcome.empty.len(), 2);
    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.processed(), 26);
    assert_eq!(loader.processed_counter().load(Ordering::Relaxed), 26);

    for (i, doc) in outcome.documents.iter().enumerate() {
        assert_eq!(doc.path, files[doc.index]);
        assert_eq!(
            doc.path.file_name().unwrap().to_string_lossy(),
            format!("doc{i:02}.txt")
        );
        assert!(!doc.stats.is_empty());
    }
}

#[test]
fn test_thread_count_does_not_change_results() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        write(
            &dir.path().join(format!("part{i}.txt")),
            &format!("{BUDGET} item{i}"),
        );
    }
    let files = Walker::new(dir.path(), WalkerConfig::default())
        .collect_files()
        .unwrap();

    let load = |threads| {
        ConcurrentLoader::new(FormatLoader::default())
            .with_threads(Some(threads))
            .load_paths(&files)
            .documents
            .into_iter()
            .map(|doc| (doc.path, doc.stats))
            .collect::<Vec<_>>()
    };
    assert_eq!(load(1), load(8));
}
