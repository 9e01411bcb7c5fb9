//! Shared fixtures for integration tests

use modpack_manifest::manifest::{FileRecord, Manifest, MANIFEST_FILE_NAME, OVERRIDES_DIR_NAME};
use modpack_manifest::tree::{hasher, HashAlgorithm};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A modpack directory holding a manifest and an empty `overrides/`.
pub struct TestModpack {
    pub dir: TempDir,
}

impl TestModpack {
    pub fn new(version: &str, files: Vec<FileRecord>) -> Self {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest {
            name: "Test Pack".to_string(),
            author: "tester".to_string(),
            version: version.to_string(),
            description: "integration fixture".to_string(),
            update: None,
            file_api: "https://example.invalid/files".to_string(),
            files,
            addons: Vec::new(),
        };
        fs::write(dir.path().join(MANIFEST_FILE_NAME), manifest.to_json().unwrap()).unwrap();
        fs::create_dir(dir.path().join(OVERRIDES_DIR_NAME)).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn overrides(&self) -> PathBuf {
        self.dir.path().join(OVERRIDES_DIR_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join(MANIFEST_FILE_NAME)
    }

    /// Write `content` to `overrides/<rel>`, creating parent directories.
    pub fn write_override(&self, rel: &str, content: &str) {
        let path = self.overrides().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read_manifest(&self) -> Manifest {
        Manifest::load(&self.manifest_path()).unwrap()
    }
}

pub fn sha1_of(content: &str) -> String {
    hasher::compute_content_hash(content.as_bytes(), HashAlgorithm::Sha1)
}
