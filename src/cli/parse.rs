//! CLI parse: clap types for modpack-manifest. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Update a modpack's server manifest from its overrides directory
#[derive(Parser, Debug)]
#[command(name = "modpack-manifest")]
#[command(about = "Reconcile server-manifest.json with the files under overrides/")]
pub struct Cli {
    /// Modpack directory containing server-manifest.json and overrides/
    pub modpack_dir: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reconcile and report without waiting for or writing the manifest
    #[arg(long)]
    pub dry_run: bool,

    /// Key the file list by path or by hash (hash collapses identical files)
    #[arg(long, value_parser = ["path", "hash"])]
    pub key_by: Option<String>,

    /// Content digest (sha1, blake3)
    #[arg(long, value_parser = ["sha1", "blake3"])]
    pub algorithm: Option<String>,

    /// Number of files hashed concurrently
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Stop waiting for a locked manifest after this many seconds
    #[arg(long)]
    pub lock_timeout: Option<u64>,

    /// Output format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
