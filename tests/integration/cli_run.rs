//! Integration tests for the modpack-manifest binary

use super::test_utils::{sha1_of, TestModpack};
use modpack_manifest::manifest::FileRecord;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    // Keep the user's global config out of the run.
    let home = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_modpack-manifest"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("MODPACK_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_no_arguments_exits_quietly() {
    let output = run(&[]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_directory_exits_quietly() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");
    let output = run(&[missing.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_update_text_output() {
    let pack = TestModpack::new("0.1.0", vec![FileRecord::new("mods/a.jar", "H1")]);
    pack.write_override("mods/a.jar", "a");

    let output = run(&[pack.root().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Creating modpack..."));
    assert!(stdout.contains("Create modpack completed."));

    let manifest = pack.read_manifest();
    assert_eq!(manifest.version, "0.1.1");
    assert_eq!(manifest.files, vec![FileRecord::new("mods/a.jar", sha1_of("a"))]);
}

#[test]
fn test_dry_run_json_output() {
    let pack = TestModpack::new("0.1.0", Vec::new());
    pack.write_override("config/x.cfg", "x");
    let before = fs::read_to_string(pack.manifest_path()).unwrap();

    let output = run(&[pack.root().to_str().unwrap(), "--dry-run", "--format", "json"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["version"], "0.1.1");
    assert_eq!(report["written"], false);
    assert_eq!(report["changes"][0]["kind"], "added");
    assert_eq!(report["changes"][0]["path"], "config/x.cfg");
    assert_eq!(fs::read_to_string(pack.manifest_path()).unwrap(), before);
}

#[test]
fn test_malformed_manifest_fails() {
    let pack = TestModpack::new("0.1.0", Vec::new());
    fs::write(pack.manifest_path(), "[]").unwrap();

    let output = run(&[pack.root().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Modpack not supported"));
}

#[test]
fn test_missing_manifest_fails() {
    let pack = TestModpack::new("0.1.0", Vec::new());
    fs::remove_file(pack.manifest_path()).unwrap();

    let output = run(&[pack.root().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Modpack not supported"));
}
