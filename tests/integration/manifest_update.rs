//! Integration tests for a full manifest update run

use super::test_utils::{sha1_of, TestModpack};
use modpack_manifest::config::ToolConfig;
use modpack_manifest::error::ManifestError;
use modpack_manifest::lock::{CancelToken, LockProbe, Sleeper};
use modpack_manifest::manifest::{Addon, FileRecord, Manifest};
use modpack_manifest::pipeline::{update_modpack, update_modpack_with, ModpackPaths};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::time::Duration;

struct AlwaysLocked;

impl LockProbe for AlwaysLocked {
    fn is_locked(&self, _path: &Path) -> bool {
        true
    }
}

struct CountingSleeper {
    calls: Cell<u32>,
}

impl Sleeper for CountingSleeper {
    fn sleep(&self, _duration: Duration) {
        self.calls.set(self.calls.get() + 1);
    }
}

/// The manifest on disk gets the new file list and a bumped version
#[test]
fn test_update_writes_manifest() {
    let pack = TestModpack::new("1.2.9", vec![FileRecord::new("mods/a.jar", "H1")]);
    pack.write_override("mods/a.jar", "a v2");
    pack.write_override("mods/b.jar", "b");
    let paths = ModpackPaths::resolve(pack.root()).unwrap();

    let report = update_modpack(&paths, &ToolConfig::default(), &CancelToken::new(), false).unwrap();

    assert!(report.written);
    assert_eq!(report.previous_version, "1.2.9");
    assert_eq!(report.version, "1.2.10");

    let manifest = pack.read_manifest();
    assert_eq!(manifest.version, "1.2.10");
    assert_eq!(
        manifest.files,
        vec![
            FileRecord::new("mods/a.jar", sha1_of("a v2")),
            FileRecord::new("mods/b.jar", sha1_of("b")),
        ]
    );
    assert!(!pack.root().join("server-manifest.json.tmp").exists());
}

/// The version is bumped even when no file changed
#[test]
fn test_unchanged_pack_still_bumps() {
    let pack = TestModpack::new("2.0.0", Vec::new());
    let paths = ModpackPaths::resolve(pack.root()).unwrap();

    let first = update_modpack(&paths, &ToolConfig::default(), &CancelToken::new(), false).unwrap();
    let second = update_modpack(&paths, &ToolConfig::default(), &CancelToken::new(), false).unwrap();

    assert!(first.changes.is_empty());
    assert!(second.changes.is_empty());
    assert_eq!(pack.read_manifest().version, "2.0.2");
}

/// Fields other than files and version survive the rewrite
#[test]
fn test_other_fields_preserved() {
    let pack = TestModpack::new("1.0.0", Vec::new());
    let mut manifest = pack.read_manifest();
    manifest.addons = vec![Addon {
        id: "forge".to_string(),
        version: "47.2.0".to_string(),
    }];
    manifest.description = "Pack für Server".to_string();
    manifest.update = Some("https://example.invalid/update".to_string());
    manifest.save(&pack.manifest_path()).unwrap();

    let paths = ModpackPaths::resolve(pack.root()).unwrap();
    update_modpack(&paths, &ToolConfig::default(), &CancelToken::new(), false).unwrap();

    let after = pack.read_manifest();
    assert_eq!(after.addons, manifest.addons);
    assert_eq!(after.description, "Pack für Server");
    assert_eq!(after.update, manifest.update);
    assert_eq!(after.file_api, manifest.file_api);
    assert!(fs::read_to_string(pack.manifest_path()).unwrap().contains("für"));
}

/// A manifest that stays locked past the timeout is left untouched
#[test]
fn test_lock_timeout_leaves_manifest() {
    let pack = TestModpack::new("1.0.0", Vec::new());
    pack.write_override("a.txt", "a");
    let paths = ModpackPaths::resolve(pack.root()).unwrap();
    let before = fs::read_to_string(pack.manifest_path()).unwrap();

    let mut config = ToolConfig::default();
    config.lock.interval_ms = 500;
    config.lock.timeout_secs = Some(2);
    let sleeper = CountingSleeper { calls: Cell::new(0) };

    let result = update_modpack_with(
        &paths,
        &config,
        &CancelToken::new(),
        false,
        &AlwaysLocked,
        &sleeper,
    );

    assert!(matches!(result, Err(ManifestError::LockTimeout { .. })));
    assert_eq!(sleeper.calls.get(), 4);
    assert_eq!(fs::read_to_string(pack.manifest_path()).unwrap(), before);
}

/// A cancelled wait aborts without writing
#[test]
fn test_cancelled_wait() {
    let pack = TestModpack::new("1.0.0", Vec::new());
    let paths = ModpackPaths::resolve(pack.root()).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let sleeper = CountingSleeper { calls: Cell::new(0) };

    let result = update_modpack_with(
        &paths,
        &ToolConfig::default(),
        &cancel,
        false,
        &AlwaysLocked,
        &sleeper,
    );

    assert!(matches!(result, Err(ManifestError::Cancelled)));
    assert_eq!(pack.read_manifest().version, "1.0.0");
}

/// Malformed JSON is reported as a format error
#[test]
fn test_malformed_manifest() {
    let pack = TestModpack::new("1.0.0", Vec::new());
    fs::write(pack.manifest_path(), "{ not json").unwrap();
    let paths = ModpackPaths::resolve(pack.root()).unwrap();

    let result = update_modpack(&paths, &ToolConfig::default(), &CancelToken::new(), false);
    assert!(matches!(result, Err(ManifestError::Format(_))));
    assert!(Manifest::load(&pack.manifest_path()).is_err());
}
