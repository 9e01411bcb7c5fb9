//! Configuration System
//!
//! Layered configuration for a run: built-in defaults, a global user file, a
//! per-modpack file and `MODPACK__*` environment variables, in increasing
//! precedence.

use crate::error::ManifestError;
use crate::lock::LockWaitPolicy;
use crate::logging::LoggingConfig;
use crate::reconcile::ReconcileOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::modpack_file::{modpack_config_path, MODPACK_CONFIG_FILE_NAME};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Reconciliation settings
    #[serde(default)]
    pub reconcile: ReconcileOptions,

    /// Manifest lock wait settings
    #[serde(default)]
    pub lock: LockSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Manifest lock wait settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSettings {
    /// Poll interval while the manifest is locked
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Give up after this many seconds; unset waits forever
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_secs: None,
        }
    }
}

impl LockSettings {
    pub fn policy(&self) -> LockWaitPolicy {
        LockWaitPolicy {
            interval: Duration::from_millis(self.interval_ms),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl ToolConfig {
    /// Reject settings that would stall or misbehave at runtime.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut errors = Vec::new();

        if self.reconcile.hash_workers == 0 {
            errors.push("reconcile.hash_workers must be at least 1".to_string());
        }
        if self.lock.interval_ms == 0 {
            errors.push("lock.interval_ms must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ManifestError::Config(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}
