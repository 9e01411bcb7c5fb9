//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::ToolConfig;
use crate::error::ManifestError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a modpack directory from files and environment, then validate.
    pub fn load(modpack_dir: &Path) -> Result<ToolConfig, ManifestError> {
        let config = MergeService::load(modpack_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, then validate.
    pub fn load_from_file(path: &Path) -> Result<ToolConfig, ManifestError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
