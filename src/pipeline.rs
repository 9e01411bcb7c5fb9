//! One manifest update run over a modpack directory.

use crate::config::ToolConfig;
use crate::error::ManifestError;
use crate::lock::{self, CancelToken, ExclusiveLockProbe, LockProbe, Sleeper, ThreadSleeper};
use crate::manifest::{Manifest, MANIFEST_FILE_NAME, OVERRIDES_DIR_NAME};
use crate::reconcile::{FileChange, ManifestReconciler};
use crate::tree::DirectoryTree;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Locations derived from a modpack directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModpackPaths {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub overrides: PathBuf,
}

impl ModpackPaths {
    /// Derive paths for `modpack_dir`, which must be an existing directory.
    pub fn resolve(modpack_dir: &Path) -> Result<Self, ManifestError> {
        if !modpack_dir.is_dir() {
            return Err(ManifestError::NotFound(modpack_dir.to_path_buf()));
        }
        Ok(Self {
            root: modpack_dir.to_path_buf(),
            manifest: modpack_dir.join(MANIFEST_FILE_NAME),
            overrides: modpack_dir.join(OVERRIDES_DIR_NAME),
        })
    }
}

/// Outcome of [`update_modpack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub name: String,
    pub previous_version: String,
    pub version: String,
    pub file_count: usize,
    pub changes: Vec<FileChange>,
    /// False for dry runs.
    pub written: bool,
}

/// Load, reconcile, bump and persist the manifest using the real filesystem lock probe.
pub fn update_modpack(
    paths: &ModpackPaths,
    config: &ToolConfig,
    cancel: &CancelToken,
    dry_run: bool,
) -> Result<UpdateReport, ManifestError> {
    update_modpack_with(
        paths,
        config,
        cancel,
        dry_run,
        &ExclusiveLockProbe,
        &ThreadSleeper,
    )
}

/// [`update_modpack`] with injectable lock probe and sleeper.
///
/// Nothing is written unless every step before the write succeeded. The
/// version is bumped on every run, whether or not the file list changed.
#[instrument(skip_all, fields(modpack = %paths.root.display(), dry_run = dry_run))]
pub fn update_modpack_with(
    paths: &ModpackPaths,
    config: &ToolConfig,
    cancel: &CancelToken,
    dry_run: bool,
    probe: &dyn LockProbe,
    sleeper: &dyn Sleeper,
) -> Result<UpdateReport, ManifestError> {
    let mut manifest = Manifest::load(&paths.manifest)?;
    let tree = DirectoryTree::build(&paths.overrides)?;

    let reconciler = ManifestReconciler::new(config.reconcile.clone());
    let reconciliation = reconciler.reconcile(&manifest.files, &tree, &paths.overrides)?;

    let previous_version = manifest.version.clone();
    manifest.files = reconciliation.files;
    manifest.bump_version()?;

    let written = if dry_run {
        false
    } else {
        lock::wait_for_unlock(
            &paths.manifest,
            &config.lock.policy(),
            probe,
            sleeper,
            cancel,
        )?;
        manifest.save(&paths.manifest)?;
        true
    };

    info!(
        previous_version = %previous_version,
        version = %manifest.version,
        files = manifest.files.len(),
        changes = reconciliation.changes.len(),
        written,
        "Manifest update finished"
    );

    Ok(UpdateReport {
        name: manifest.name,
        previous_version,
        version: manifest.version,
        file_count: manifest.files.len(),
        changes: reconciliation.changes,
        written,
    })
}
