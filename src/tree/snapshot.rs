//! Immutable directory-tree snapshot with metadata-based set algebra

use crate::error::ManifestError;
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};
use tracing::{debug, info, instrument};

/// Identity of a file at snapshot time.
///
/// Equality and hashing cover path, size and both timestamps. Content is not
/// part of identity: two descriptors compare equal when the metadata did not
/// change, regardless of what the bytes are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDescriptor {
    pub full_path: PathBuf,
    pub size: u64,
    /// Birth time; `None` where the filesystem does not report one.
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

/// One directory node of a snapshot, owning all of its descendants.
#[derive(Debug, Clone, Default)]
pub struct DirectoryTree {
    directory_path: Option<PathBuf>,
    files: Vec<FileDescriptor>,
    children: Vec<DirectoryTree>,
}

impl DirectoryTree {
    /// Synthetic empty root with no directory path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `root` recursively with the default walker configuration.
    pub fn build(root: &Path) -> Result<Self, ManifestError> {
        Self::build_with_config(root, &WalkerConfig::default())
    }

    /// Scan `root` recursively.
    ///
    /// Fails with [`ManifestError::NotFound`] if `root` is missing or not a directory.
    #[instrument(skip(root, config), fields(root = %root.display()))]
    pub fn build_with_config(root: &Path, config: &WalkerConfig) -> Result<Self, ManifestError> {
        let start = Instant::now();
        if !root.is_dir() {
            return Err(ManifestError::NotFound(root.to_path_buf()));
        }
        let root = dunce::canonicalize(root).map_err(|e| ManifestError::from_io(root, e))?;

        let walker = Walker::with_config(config.clone());
        let tree = Self::scan(&walker, root)?;

        info!(
            files = tree.file_count(),
            directories = tree.all_directories().len(),
            duration_ms = start.elapsed().as_millis(),
            "Directory snapshot completed"
        );
        Ok(tree)
    }

    fn scan(walker: &Walker, dir: PathBuf) -> Result<Self, ManifestError> {
        let mut files = Vec::new();
        let mut subdirectories = Vec::new();

        for entry in walker.list(&dir)? {
            match entry {
                Entry::File {
                    path,
                    size,
                    created,
                    modified,
                } => files.push(FileDescriptor {
                    full_path: path,
                    size,
                    created,
                    modified,
                }),
                Entry::Directory { path } => subdirectories.push(path),
            }
        }
        debug!(
            dir = %dir.display(),
            files = files.len(),
            subdirectories = subdirectories.len(),
            "Scanned directory"
        );

        let children = subdirectories
            .into_iter()
            .map(|sub| Self::scan(walker, sub))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            directory_path: Some(dir),
            files,
            children,
        })
    }

    /// Directory this node describes; `None` only for [`DirectoryTree::empty`].
    pub fn directory_path(&self) -> Option<&Path> {
        self.directory_path.as_deref()
    }

    /// Files directly inside this directory.
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Immediate subdirectory nodes.
    pub fn children(&self) -> &[DirectoryTree] {
        &self.children
    }

    /// All files of this node and its descendants. Each call starts a fresh pass.
    pub fn all_files(&self) -> Box<dyn Iterator<Item = &FileDescriptor> + '_> {
        Box::new(
            self.files
                .iter()
                .chain(self.children.iter().flat_map(|child| child.all_files())),
        )
    }

    /// All directory paths, including this node's own.
    pub fn all_directories(&self) -> Vec<&Path> {
        let mut dirs = Vec::new();
        self.collect_directories(&mut dirs);
        dirs
    }

    fn collect_directories<'a>(&'a self, out: &mut Vec<&'a Path>) {
        if let Some(path) = self.directory_path.as_deref() {
            out.push(path);
        }
        for child in &self.children {
            child.collect_directories(out);
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len() + self.children.iter().map(Self::file_count).sum::<usize>()
    }

    fn file_set(&self) -> HashSet<&FileDescriptor> {
        self.all_files().collect()
    }

    /// Files present, with identical metadata, in both snapshots.
    pub fn intersect(&self, other: &DirectoryTree) -> Vec<FileDescriptor> {
        let ours = self.file_set();
        let theirs = other.file_set();
        sorted(ours.intersection(&theirs).copied())
    }

    /// Files present in either snapshot.
    pub fn union(&self, other: &DirectoryTree) -> Vec<FileDescriptor> {
        let ours = self.file_set();
        let theirs = other.file_set();
        sorted(ours.union(&theirs).copied())
    }

    /// Files in `self` with no metadata-identical counterpart in `other`.
    pub fn difference(&self, other: &DirectoryTree) -> Vec<FileDescriptor> {
        let ours = self.file_set();
        let theirs = other.file_set();
        sorted(ours.difference(&theirs).copied())
    }

    /// Files in `other` with no metadata-identical counterpart in `self`.
    pub fn complement(&self, other: &DirectoryTree) -> Vec<FileDescriptor> {
        let ours = self.file_set();
        let theirs = other.file_set();
        sorted(theirs.difference(&ours).copied())
    }
}

fn sorted<'a>(files: impl Iterator<Item = &'a FileDescriptor>) -> Vec<FileDescriptor> {
    let mut out: Vec<FileDescriptor> = files.cloned().collect();
    out.sort_by(|a, b| a.full_path.cmp(&b.full_path));
    out
}
