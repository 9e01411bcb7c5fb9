//! Single-directory listing used to build snapshots one level at a time

use crate::error::ManifestError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Filesystem entry types
#[derive(Debug, Clone)]
pub enum Entry {
    /// A regular file with the metadata that defines its identity
    File {
        path: PathBuf,
        size: u64,
        created: Option<SystemTime>,
        modified: Option<SystemTime>,
    },
    /// A directory entry with its path
    Directory { path: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path, .. } | Entry::Directory { path } => path,
        }
    }
}

/// Walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Whether to descend into directory symlinks (default: false, so link cycles
    /// cannot recurse). Symlinked files are listed either way.
    pub follow_symlinks: bool,
}

/// Lists the immediate children of one directory.
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    pub fn new() -> Self {
        Self {
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// List the files and subdirectories directly inside `dir`.
    ///
    /// Returns entries sorted by file name for determinism. Entries that are
    /// neither files nor directories (directory or dangling symlinks, sockets)
    /// are skipped.
    pub fn list(&self, dir: &Path) -> Result<Vec<Entry>, ManifestError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                match e.into_io_error() {
                    Some(io) => ManifestError::from_io(path, io),
                    None => ManifestError::Io {
                        path,
                        source: std::io::Error::new(
                            std::io::ErrorKind::Other,
                            "filesystem loop detected",
                        ),
                    },
                }
            })?;

            let path = entry.path().to_path_buf();
            let metadata = if entry.path_is_symlink() && !self.config.follow_symlinks {
                // Linked files are listed with their target's metadata; linked
                // directories are not descended.
                match std::fs::metadata(&path) {
                    Ok(target) if target.is_file() => target,
                    Ok(_) => {
                        debug!(path = %path.display(), "Skipping directory symlink");
                        continue;
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Skipping dangling symlink");
                        continue;
                    }
                }
            } else {
                entry.metadata().map_err(|e| match e.into_io_error() {
                    Some(io) => ManifestError::from_io(&path, io),
                    None => ManifestError::NotFound(path.clone()),
                })?
            };

            if metadata.is_file() {
                entries.push(Entry::File {
                    path,
                    size: metadata.len(),
                    created: metadata.created().ok(),
                    modified: metadata.modified().ok(),
                });
            } else if metadata.is_dir() {
                entries.push(Entry::Directory { path });
            }
        }

        Ok(entries)
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}
