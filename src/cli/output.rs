//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ManifestError;

/// Map domain errors to a message for standard error.
pub fn map_error(e: &ManifestError) -> String {
    match e {
        ManifestError::NotFound(_) | ManifestError::Format(_) => {
            format!("Modpack not supported: {}", e)
        }
        _ => e.to_string(),
    }
}
