//! # Container Restart Command (`dockrs container restart`)
//!
//! File: cli/src/commands/container/restart.rs
//!
use super::run_for_each;
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container restart`.
#[derive(Parser, Debug)]
pub struct RestartArgs {
    /// Container names or IDs.
    #[arg(required = true, num_args = 1..)]
    containers: Vec<String>,
    /// Seconds to wait for the stop before killing the container.
    #[arg(short, long)]
    time: Option<u32>,
}

pub async fn handle_restart(args: RestartArgs) -> Result<()> {
    info!("Handling container restart command ({:?})", args.containers);
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let timeout = args.time;
    run_for_each(&args.containers, "restart", |name| {
        let engine = cfg.engine.clone();
        async move { docker::restart_container(&engine, &name, timeout).await }
    })
    .await
}
