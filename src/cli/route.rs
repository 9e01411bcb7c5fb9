//! CLI route: run context. Folds flags into configuration and dispatches to the pipeline.

use crate::cli::parse::Cli;
use crate::cli::presentation::{format_report_json, format_report_text};
use crate::config::{ConfigLoader, ToolConfig};
use crate::error::ManifestError;
use crate::lock::CancelToken;
use crate::pipeline::{update_modpack, ModpackPaths};
use std::path::PathBuf;
use tracing::debug;

/// Runtime context for CLI execution: modpack location and effective configuration.
pub struct RunContext {
    paths: ModpackPaths,
    config: ToolConfig,
    cancel: CancelToken,
}

impl RunContext {
    /// Create run context from the modpack directory and optional config path.
    pub fn new(modpack_dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ManifestError> {
        let paths = ModpackPaths::resolve(&modpack_dir)?;
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&paths.root)?
        };

        Ok(Self {
            paths,
            config,
            cancel: CancelToken::new(),
        })
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&mut self, cli: &Cli) -> Result<(), ManifestError> {
        if let Some(ref key_by) = cli.key_by {
            self.config.reconcile.key_policy = key_by.parse()?;
        }
        if let Some(ref algorithm) = cli.algorithm {
            self.config.reconcile.algorithm = algorithm.parse()?;
        }
        if let Some(jobs) = cli.jobs {
            self.config.reconcile.hash_workers = jobs;
        }
        if let Some(timeout) = cli.lock_timeout {
            self.config.lock.timeout_secs = Some(timeout);
        }
        self.config.validate()?;
        debug!(config = ?self.config, "Effective configuration");
        Ok(())
    }

    /// Run the update and render its report.
    pub fn execute(&self, cli: &Cli) -> Result<String, ManifestError> {
        let report = update_modpack(&self.paths, &self.config, &self.cancel, cli.dry_run)?;
        match cli.format.as_str() {
            "json" => format_report_json(&report),
            _ => Ok(format_report_text(&report, self.config.logging.color)),
        }
    }
}
