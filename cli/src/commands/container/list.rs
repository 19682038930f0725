//! # Container List Command (`dockrs container ls`)
//!
//! File: cli/src/commands/container/list.rs
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker::{self, containers, images};
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container ls`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Include stopped containers.
    #[arg(short, long)]
    all: bool,
}

pub async fn handle_list(args: ListArgs) -> Result<()> {
    info!("Handling container ls command (All: {})...", args.all);
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let list = docker::list_containers(&cfg.engine, args.all).await?;

    if list.is_empty() {
        println!("No containers found.");
        if !args.all {
            println!("Try running with --all to include stopped containers.");
        }
        return Ok(());
    }

    println!(
        "{:<14} {:<30} {:<25} {}",
        "CONTAINER ID", "IMAGE", "NAMES", "STATUS"
    );
    for container in &list {
        println!(
            "{:<14} {:<30} {:<25} {}",
            images::short_id(container.id.as_deref().unwrap_or("<unknown>")),
            container.image.as_deref().unwrap_or("<none>"),
            containers::display_names(container),
            container.status.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
