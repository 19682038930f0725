//! # Container Stop Command (`dockrs container stop`)
//!
//! File: cli/src/commands/container/stop.rs
//!
use super::run_for_each;
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container stop`.
#[derive(Parser, Debug)]
pub struct StopArgs {
    /// Container names or IDs.
    #[arg(required = true, num_args = 1..)]
    containers: Vec<String>,
    /// Seconds to wait before killing the container.
    #[arg(short, long)]
    time: Option<u32>,
}

pub async fn handle_stop(args: StopArgs) -> Result<()> {
    info!(
        "Handling container stop command ({:?}, timeout: {:?})",
        args.containers, args.time
    );
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let timeout = args.time;
    run_for_each(&args.containers, "stop", |name| {
        let engine = cfg.engine.clone();
        async move { docker::stop_container(&engine, &name, timeout).await }
    })
    .await
}
