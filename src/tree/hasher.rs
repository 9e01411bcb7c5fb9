//! Content hashing for override files
//!
//! Hashes are a change-detection fingerprint rendered as lowercase hex. SHA-1
//! is the default because existing launchers compare against it; BLAKE3 is
//! available for packs whose consumers agree on it.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

/// Digest applied uniformly to every file of a manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(ManifestError::Config(format!(
                "Unknown hash algorithm: {} (must be 'sha1' or 'blake3')",
                other
            ))),
        }
    }
}

/// Hash a file's full content.
///
/// The handle is opened, streamed and closed within this call, so it is
/// released even when reading fails partway.
pub fn content_hash(path: &Path, algorithm: HashAlgorithm) -> Result<String, ManifestError> {
    let mut file = File::open(path).map_err(|e| ManifestError::from_io(path, e))?;

    let digest = match algorithm {
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            io::copy(&mut file, &mut hasher).map_err(|e| ManifestError::from_io(path, e))?;
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            io::copy(&mut file, &mut hasher).map_err(|e| ManifestError::from_io(path, e))?;
            hex::encode(hasher.finalize().as_bytes())
        }
    };

    trace!(path = %path.display(), hash = %digest, "Computed content hash");
    Ok(digest)
}

/// Hash in-memory bytes with the same rendering as [`content_hash`].
pub fn compute_content_hash(content: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha1 => hex::encode(Sha1::digest(content)),
        HashAlgorithm::Blake3 => hex::encode(blake3::hash(content).as_bytes()),
    }
}
