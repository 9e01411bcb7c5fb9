//! Manifest reconciliation
//!
//! Compares the recorded file list against the overrides directory and
//! produces the updated list:
//!
//! 1. Recorded files that still exist are rehashed; a changed digest replaces
//!    the recorded one, the path is kept.
//! 2. Recorded files that no longer exist are dropped.
//! 3. Files in the snapshot that no record accounts for are hashed and added.
//!
//! Every candidate file is hashed in full on every run. A failure to hash any
//! single file aborts the whole reconciliation.

use crate::error::ManifestError;
use crate::manifest::FileRecord;
use crate::tree::hasher::{self, HashAlgorithm};
use crate::tree::path;
use crate::tree::DirectoryTree;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// How the final file list is keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// One record per path. Files with identical content are all kept.
    #[default]
    Path,
    /// One record per content hash; the last path in path order wins.
    /// Matches manifests produced by older tooling.
    Hash,
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPolicy::Path => write!(f, "path"),
            KeyPolicy::Hash => write!(f, "hash"),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "path" => Ok(KeyPolicy::Path),
            "hash" => Ok(KeyPolicy::Hash),
            other => Err(ManifestError::Config(format!(
                "Unknown key policy: {} (must be 'path' or 'hash')",
                other
            ))),
        }
    }
}

fn default_hash_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Reconciliation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    #[serde(default)]
    pub key_policy: KeyPolicy,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    /// Number of files hashed concurrently. `1` hashes sequentially.
    #[serde(default = "default_hash_workers")]
    pub hash_workers: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            key_policy: KeyPolicy::default(),
            algorithm: HashAlgorithm::default(),
            hash_workers: default_hash_workers(),
        }
    }
}

/// A difference between the recorded and the reconciled file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileChange {
    Added {
        path: String,
        hash: String,
    },
    Modified {
        path: String,
        old_hash: String,
        new_hash: String,
    },
    Removed {
        path: String,
        hash: String,
    },
}

impl FileChange {
    pub fn path(&self) -> &str {
        match self {
            FileChange::Added { path, .. }
            | FileChange::Modified { path, .. }
            | FileChange::Removed { path, .. } => path,
        }
    }
}

/// Result of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Updated file list, sorted by path.
    pub files: Vec<FileRecord>,
    /// Changes relative to the recorded list, sorted by path.
    pub changes: Vec<FileChange>,
}

impl Reconciliation {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Reconciles recorded file lists against directory snapshots.
pub struct ManifestReconciler {
    options: ReconcileOptions,
}

impl ManifestReconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Reconcile `recorded` against `tree`, which must have been built from `root`.
    #[instrument(skip(self, recorded, tree, root), fields(root = %root.display(), recorded = recorded.len()))]
    pub fn reconcile(
        &self,
        recorded: &[FileRecord],
        tree: &DirectoryTree,
        root: &Path,
    ) -> Result<Reconciliation, ManifestError> {
        let start = Instant::now();
        let root = dunce::canonicalize(root).map_err(|e| ManifestError::from_io(root, e))?;

        // Recorded entries in manifest order, keyed by normalized path.
        let mut prior: Vec<(String, String)> = Vec::with_capacity(recorded.len());
        let mut seen_paths: HashSet<String> = HashSet::new();
        for record in recorded {
            match path::normalize_manifest_path(&record.path) {
                Some(normalized) => {
                    if seen_paths.insert(normalized.clone()) {
                        prior.push((normalized, record.hash.clone()));
                    } else {
                        debug!(path = %record.path, "Duplicate manifest path ignored");
                    }
                }
                None => warn!(path = %record.path, "Dropping manifest entry outside overrides root"),
            }
        }

        // Files on disk keyed like recorded paths, carrying their on-disk spelling.
        let mut on_disk: HashMap<String, (String, PathBuf)> = HashMap::new();
        let mut disk_order: Vec<String> = Vec::new();
        for descriptor in tree.all_files() {
            let rel = path::relative_manifest_path(&root, &descriptor.full_path)?;
            let key = path::manifest_path_key(&rel);
            if !on_disk.contains_key(&key) {
                disk_order.push(key.clone());
                on_disk.insert(key, (rel, descriptor.full_path.clone()));
            }
        }

        // Changed-file and deleted-file passes. A recorded file survives only if
        // the snapshot holds it, so both passes see the same set of files.
        let (surviving, deleted): (Vec<_>, Vec<_>) = prior
            .iter()
            .partition(|(key, _)| on_disk.contains_key(key));
        debug!(
            surviving = surviving.len(),
            deleted = deleted.len(),
            "Partitioned recorded files"
        );

        let rehash_targets: Vec<(String, PathBuf)> = surviving
            .iter()
            .filter_map(|(key, _)| on_disk.get(key).cloned())
            .collect();
        let rehashed = self.hash_all(rehash_targets)?;

        // Added-file pass.
        let accounted: HashSet<&str> = surviving.iter().map(|(key, _)| key.as_str()).collect();
        let added_targets: Vec<(String, PathBuf)> = disk_order
            .iter()
            .filter(|key| !accounted.contains(key.as_str()))
            .filter_map(|key| on_disk.get(key).cloned())
            .collect();
        let added = self.hash_all(added_targets)?;

        // Sorted before any collapse so the surviving path for a hash never
        // depends on what the previous manifest listed.
        let ordered = sorted_by_path(
            rehashed
                .into_iter()
                .chain(added)
                .map(|(path, hash)| FileRecord { path, hash })
                .collect(),
        );

        let files = match self.options.key_policy {
            KeyPolicy::Path => ordered,
            KeyPolicy::Hash => collapse_by_hash(ordered),
        };
        let files = sorted_by_path(files);
        let changes = diff(&prior, &files);

        info!(
            files = files.len(),
            changes = changes.len(),
            duration_ms = start.elapsed().as_millis(),
            "Reconciliation completed"
        );

        Ok(Reconciliation { files, changes })
    }

    /// Hash every target; results keep input order. Nothing is returned unless all succeed.
    fn hash_all(
        &self,
        targets: Vec<(String, PathBuf)>,
    ) -> Result<Vec<(String, String)>, ManifestError> {
        let algorithm = self.options.algorithm;
        let hash_one = |(rel, full): &(String, PathBuf)| -> Result<(String, String), ManifestError> {
            let hash = hasher::content_hash(full, algorithm)?;
            Ok((rel.clone(), hash))
        };

        if self.options.hash_workers <= 1 || targets.len() <= 1 {
            return targets.iter().map(hash_one).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.hash_workers)
            .build()
            .map_err(|e| ManifestError::Config(format!("Failed to start hash workers: {}", e)))?;
        pool.install(|| targets.par_iter().map(hash_one).collect())
    }
}

/// Key the list by hash with last-write-wins, keeping first-seen position.
fn collapse_by_hash(records: Vec<FileRecord>) -> Vec<FileRecord> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<FileRecord> = Vec::with_capacity(records.len());
    for record in records {
        let existing = slots.get(&record.hash).copied();
        match existing {
            Some(slot) => {
                debug!(
                    kept = %record.path,
                    dropped = %out[slot].path,
                    "Collapsed files with identical content"
                );
                out[slot] = record;
            }
            None => {
                slots.insert(record.hash.clone(), out.len());
                out.push(record);
            }
        }
    }
    out
}

fn sorted_by_path(mut files: Vec<FileRecord>) -> Vec<FileRecord> {
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn diff(prior: &[(String, String)], files: &[FileRecord]) -> Vec<FileChange> {
    let before: BTreeMap<&str, &str> = prior
        .iter()
        .map(|(path, hash)| (path.as_str(), hash.as_str()))
        .collect();
    let after: BTreeMap<String, (&str, &str)> = files
        .iter()
        .map(|r| (path::manifest_path_key(&r.path), (r.path.as_str(), r.hash.as_str())))
        .collect();

    let mut changes = Vec::new();
    for (key, (path, new_hash)) in &after {
        match before.get(key.as_str()) {
            None => changes.push(FileChange::Added {
                path: path.to_string(),
                hash: new_hash.to_string(),
            }),
            Some(old_hash) if old_hash != new_hash => changes.push(FileChange::Modified {
                path: path.to_string(),
                old_hash: old_hash.to_string(),
                new_hash: new_hash.to_string(),
            }),
            Some(_) => {}
        }
    }
    for (path, hash) in &before {
        if !after.contains_key(*path) {
            changes.push(FileChange::Removed {
                path: path.to_string(),
                hash: hash.to_string(),
            });
        }
    }
    changes.sort_by(|a, b| a.path().cmp(b.path()));
    changes
}
