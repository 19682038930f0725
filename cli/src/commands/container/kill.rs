//! # Container Kill Command (`dockrs container kill`)
//!
//! File: cli/src/commands/container/kill.rs
//!
use super::run_for_each;
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container kill`.
#[derive(Parser, Debug)]
pub struct KillArgs {
    /// Container names or IDs.
    #[arg(required = true, num_args = 1..)]
    containers: Vec<String>,
    /// Signal to send, by name or number.
    #[arg(short, long, default_value = "SIGKILL")]
    signal: String,
}

pub async fn handle_kill(args: KillArgs) -> Result<()> {
    info!(
        "Handling container kill command ({:?}, signal: {})",
        args.containers, args.signal
    );
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    run_for_each(&args.containers, "kill", |name| {
        let engine = cfg.engine.clone();
        let signal = args.signal.clone();
        async move { docker::kill_container(&engine, &name, &signal).await }
    })
    .await
}
