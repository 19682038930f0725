//! # Container Rename Command (`dockrs container rename`)
//!
//! File: cli/src/commands/container/rename.rs
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container rename`.
#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Current container name or ID.
    container: String,
    /// New name.
    new_name: String,
}

pub async fn handle_rename(args: RenameArgs) -> Result<()> {
    info!(
        "Handling container rename command ({} -> {})",
        args.container, args.new_name
    );
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    docker::rename_container(&cfg.engine, &args.container, &args.new_name).await
}
