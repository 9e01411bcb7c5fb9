//! Directory-tree snapshots of the overrides directory.
//!
//! A snapshot records file identity (path, size, timestamps) only. Content
//! hashes are computed on demand by [`hasher`] when a file is reconciled.

pub mod hasher;
pub mod path;
pub mod snapshot;
pub mod walker;

pub use hasher::HashAlgorithm;
pub use snapshot::{DirectoryTree, FileDescriptor};
