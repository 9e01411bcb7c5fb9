//! Server manifest model and persistence.
//!
//! The manifest is the `server-manifest.json` file at the root of a modpack
//! directory. Only `files` and `version` are rewritten by a run; every other
//! field passes through untouched.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument};

/// Name of the manifest file inside a modpack directory.
pub const MANIFEST_FILE_NAME: &str = "server-manifest.json";

/// Name of the tracked directory inside a modpack directory.
pub const OVERRIDES_DIR_NAME: &str = "overrides";

/// One tracked override file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the overrides root, `/` separated.
    pub path: String,
    /// Lowercase hex content digest.
    pub hash: String,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
        }
    }
}

/// Addon (mod loader etc.) pinned by the modpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    pub version: String,
}

/// The persisted modpack description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(rename = "fileApi")]
    pub file_api: String,
    pub files: Vec<FileRecord>,
    pub addons: Vec<Addon>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let contents =
            fs::read_to_string(path).map_err(|e| ManifestError::from_io(path, e))?;
        let manifest = Self::from_json(&contents)?;
        debug!(
            files = manifest.files.len(),
            version = %manifest.version,
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::Format(format!("Malformed manifest JSON: {}", e)))
    }

    /// Render as indented JSON. Non-ASCII text is written verbatim.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to `path` via a sibling temp file and rename.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file =
                fs::File::create(&tmp_path).map_err(|e| ManifestError::from_io(&tmp_path, e))?;
            file.write_all(json.as_bytes())
                .and_then(|_| file.sync_all())
                .map_err(|e| ManifestError::from_io(&tmp_path, e))?;
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ManifestError::from_io(path, e));
        }
        debug!(bytes = json.len(), "Manifest written");
        Ok(())
    }

    /// Increment the patch (last) component of `version` in place.
    pub fn bump_version(&mut self) -> Result<(), ManifestError> {
        self.version = bump_version(&self.version)?;
        Ok(())
    }
}

/// Increment the last dot-separated component of a version string.
///
/// Every component must be a base-10 non-negative integer.
pub fn bump_version(version: &str) -> Result<String, ManifestError> {
    let mut parts = version
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ManifestError::Format(format!(
                    "Invalid version component {:?} in {:?}",
                    part, version
                )));
            }
            part.parse::<u64>().map_err(|e| {
                ManifestError::Format(format!(
                    "Invalid version component {:?} in {:?}: {}",
                    part, version, e
                ))
            })
        })
        .collect::<Result<Vec<u64>, ManifestError>>()?;

    // split always yields at least one element
    if let Some(last) = parts.last_mut() {
        *last = last.checked_add(1).ok_or_else(|| {
            ManifestError::Format(format!("Version component overflow in {:?}", version))
        })?;
    }

    Ok(parts
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("."))
}
