//! Merge rules: defaults applied beneath every other source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("reconcile.key_policy", "path")?
        .set_default("reconcile.algorithm", "sha1")?
        .set_default("lock.interval_ms", 1000)?
        .set_default("logging.level", "warn")?
        .set_default("logging.output", "stderr")
}
