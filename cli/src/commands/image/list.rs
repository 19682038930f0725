//! # Image List Command (`dockrs image ls`)
//!
//! File: cli/src/commands/image/list.rs
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker::{self, images};
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs image ls`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Include intermediate images.
    #[arg(short, long)]
    all: bool,
}

pub async fn handle_list(args: ListArgs) -> Result<()> {
    info!("Handling image ls command...");
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let list = docker::list_images(&cfg.engine, args.all).await?;

    if list.is_empty() {
        println!("No images found.");
        return Ok(());
    }

    println!("{:<40} {:<14} {:>12}", "REPOSITORY:TAG", "IMAGE ID", "SIZE");
    for image in &list {
        for tag in images::display_tags(image) {
            println!(
                "{:<40} {:<14} {:>12}",
                tag,
                images::short_id(&image.id),
                image.size
            );
        }
    }
    Ok(())
}
