//! Modpack Manifest: keeps `server-manifest.json` in step with `overrides/`
//!
//! Snapshots the overrides directory, rehashes every recorded and newly found
//! file, rewrites the manifest's file list and bumps its patch version. The
//! write waits until no other process holds the manifest open exclusively.

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod reconcile;
pub mod tree;
