//! Conversion between on-disk paths and manifest paths
//!
//! Manifest paths are relative to the overrides root and `/` separated
//! regardless of platform. Paths written to the manifest keep the on-disk
//! spelling of each name; paths are compared by their NFC form so a recorded
//! name still matches a file stored decomposed (or the other way round).

use crate::error::ManifestError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Manifest path of `file` relative to `root`, spelled as on disk.
pub fn relative_manifest_path(root: &Path, file: &Path) -> Result<String, ManifestError> {
    let relative = file.strip_prefix(root).map_err(|_| {
        ManifestError::Format(format!(
            "{} is not inside {}",
            file.display(),
            root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            other => {
                return Err(ManifestError::Format(format!(
                    "Unexpected path component {:?} in {}",
                    other,
                    file.display()
                )))
            }
        }
    }
    Ok(segments.join("/"))
}

/// Comparison key for a `/` separated manifest path.
pub fn manifest_path_key(path: &str) -> String {
    path.nfc().collect()
}

/// Normalize a recorded manifest path into its comparison key, without
/// filesystem access.
///
/// Backslashes are treated as separators, empty and `.` segments are dropped.
/// Returns `None` for paths that are absolute, carry a drive prefix or climb
/// out of the root.
pub fn normalize_manifest_path(path: &str) -> Option<String> {
    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return None;
    }
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return None,
            name => segments.push(name.nfc().collect::<String>()),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Platform path for a normalized manifest path under `root`.
pub fn resolve_manifest_path(root: &Path, manifest_path: &str) -> PathBuf {
    let mut resolved = root.to_path_buf();
    for segment in manifest_path.split('/') {
        resolved.push(segment);
    }
    resolved
}
