//! # Container Wait Command (`dockrs container wait`)
//!
//! File: cli/src/commands/container/wait.rs
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker::{self, WaitCondition};
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container wait`.
#[derive(Parser, Debug)]
pub struct WaitArgs {
    /// Container name or ID.
    container: String,
    /// State to wait for.
    #[arg(long, value_enum, default_value_t = WaitCondition::NotRunning)]
    condition: WaitCondition,
}

pub async fn handle_wait(args: WaitArgs) -> Result<()> {
    info!(
        "Handling container wait command ({}, condition: {})",
        args.container,
        args.condition.as_str()
    );
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let code = docker::wait_container(&cfg.engine, &args.container, args.condition).await?;
    println!("{}", code);
    Ok(())
}
