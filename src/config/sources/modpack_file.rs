//! Per-modpack config file source: <modpack>/modpack-manifest.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

/// File name looked up next to `server-manifest.json`.
pub const MODPACK_CONFIG_FILE_NAME: &str = "modpack-manifest.toml";

pub fn modpack_config_path(modpack_dir: &Path) -> PathBuf {
    modpack_dir.join(MODPACK_CONFIG_FILE_NAME)
}

/// Add the modpack config file to builder when present.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    modpack_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = modpack_config_path(modpack_dir);
    if path.is_file() {
        return Ok(builder.add_source(File::from(path.as_path()).required(false)));
    }
    Ok(builder)
}
