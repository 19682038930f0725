//! # Container Start Command (`dockrs container start`)
//!
//! File: cli/src/commands/container/start.rs
//!
use super::run_for_each;
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container start`.
#[derive(Parser, Debug)]
pub struct StartArgs {
    /// Container names or IDs.
    #[arg(required = true, num_args = 1..)]
    containers: Vec<String>,
}

pub async fn handle_start(args: StartArgs) -> Result<()> {
    info!("Handling container start command ({:?})", args.containers);
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    run_for_each(&args.containers, "start", |name| {
        let engine = cfg.engine.clone();
        async move { docker::start_container(&engine, &name).await }
    })
    .await
}
