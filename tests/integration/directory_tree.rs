//! Integration tests for directory snapshots and their set operations

use filetime::{set_file_mtime, FileTime};
use modpack_manifest::error::ManifestError;
use modpack_manifest::tree::DirectoryTree;
use std::fs;
use tempfile::TempDir;

fn names(files: &[modpack_manifest::tree::FileDescriptor]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.full_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Snapshots before and after an edit partition the files as expected
#[test]
fn test_set_operations_across_edit() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("x.txt"), "x").unwrap();
    fs::write(root.join("y.txt"), "y").unwrap();
    set_file_mtime(root.join("y.txt"), FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let before = DirectoryTree::build(root).unwrap();

    fs::remove_file(root.join("x.txt")).unwrap();
    fs::write(root.join("y.txt"), "y changed").unwrap();
    set_file_mtime(root.join("y.txt"), FileTime::from_unix_time(2_000_000, 0)).unwrap();
    fs::write(root.join("z.txt"), "z").unwrap();

    let after = DirectoryTree::build(root).unwrap();

    // y changed metadata, so nothing survives identically.
    assert!(before.intersect(&after).is_empty());
    assert_eq!(names(&before.difference(&after)), vec!["x.txt", "y.txt"]);
    assert_eq!(names(&before.complement(&after)), vec!["y.txt", "z.txt"]);
    assert_eq!(before.union(&after).len(), 4);
}

/// Untouched files are shared between two snapshots
#[test]
fn test_unchanged_files_intersect() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("config")).unwrap();
    fs::write(root.join("config").join("a.cfg"), "a").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();

    let first = DirectoryTree::build(root).unwrap();
    let second = DirectoryTree::build(root).unwrap();

    assert_eq!(first.intersect(&second).len(), 2);
    assert!(first.difference(&second).is_empty());
    assert!(first.complement(&second).is_empty());
}

/// Operations against the empty snapshot
#[test]
fn test_empty_snapshot_operands() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("only.txt"), "1").unwrap();
    let tree = DirectoryTree::build(temp_dir.path()).unwrap();
    let empty = DirectoryTree::empty();

    assert!(tree.intersect(&empty).is_empty());
    assert_eq!(names(&tree.difference(&empty)), vec!["only.txt"]);
    assert_eq!(names(&empty.complement(&tree)), vec!["only.txt"]);
    assert!(empty.all_directories().is_empty());
}

/// Every directory is listed, root first, including empty ones
#[test]
fn test_all_directories_includes_empty() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("mods").join("disabled")).unwrap();
    fs::create_dir(root.join("scripts")).unwrap();
    fs::write(root.join("mods").join("a.jar"), "a").unwrap();

    let tree = DirectoryTree::build(root).unwrap();
    let dirs = tree.all_directories();

    assert_eq!(dirs.len(), 4);
    assert_eq!(dirs[0], tree.directory_path().unwrap());
    assert!(dirs.iter().any(|d| d.ends_with("disabled")));
    assert!(dirs.iter().any(|d| d.ends_with("scripts")));
    assert_eq!(tree.file_count(), 1);
}

/// Building from a regular file is rejected
#[test]
fn test_build_from_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(matches!(
        DirectoryTree::build(&file),
        Err(ManifestError::NotFound(_))
    ));
}
