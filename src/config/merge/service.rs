//! MergeService: orchestrates sources, applies merge policy, deserializes to ToolConfig.

use crate::config::sources::{environment, global_file, modpack_file};
use crate::config::ToolConfig;
use config::{ConfigError, File};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a modpack directory.
    /// Precedence: global file (lowest) -> modpack file -> environment (highest).
    pub fn load(modpack_dir: &Path) -> Result<ToolConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = modpack_file::add_to_builder(builder, modpack_dir)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ToolConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
