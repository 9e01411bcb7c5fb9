//! modpack-manifest CLI Binary
//!
//! Updates `server-manifest.json` in a modpack directory from its `overrides/` tree.

use clap::Parser;
use modpack_manifest::cli::{map_error, Cli, RunContext};
use modpack_manifest::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Without a usable modpack directory there is nothing to do.
    let modpack_dir = match cli.modpack_dir.clone() {
        Some(dir) if dir.is_dir() => dir,
        _ => return,
    };

    let mut context = match RunContext::new(modpack_dir, cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &context.config().logging);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = context.apply_overrides(&cli) {
        error!("Invalid options: {}", e);
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }

    if cli.format == "text" {
        println!("Creating modpack...");
    }

    match context.execute(&cli) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
            if cli.format == "text" {
                println!("Create modpack completed.");
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args on top of the loaded config.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, loaded: &LoggingConfig) -> LoggingConfig {
    let mut config = loaded.clone();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
