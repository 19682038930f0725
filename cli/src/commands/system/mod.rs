//! # System Command Group (`dockrs system`)
//!
//! File: cli/src/commands/system/mod.rs
//!
use anyhow::Context;
use clap::{Parser, Subcommand};
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;

/// Arguments for `dockrs system`.
#[derive(Parser, Debug)]
pub struct SystemArgs {
    #[command(subcommand)]
    command: SystemCommand,
}

#[derive(Subcommand, Debug)]
enum SystemCommand {
    /// Show the engine's version information.
    Version,
    /// Check that the engine is reachable.
    Ping,
}

/// Dispatches `dockrs system <subcommand>`.
pub async fn handle_system(args: SystemArgs) -> Result<()> {
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    match args.command {
        SystemCommand::Version => {
            let version = docker::engine_version(&cfg.engine).await?;
            println!("{}", version);
        }
        SystemCommand::Ping => {
            let reply = docker::ping(&cfg.engine).await?;
            println!("{}", reply);
        }
    }
    Ok(())
}
