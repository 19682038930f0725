//! # Image Remove Command (`dockrs image rm`)
//!
//! File: cli/src/commands/image/rm.rs
//!
//! Removes each named image in turn. Failures are collected and reported
//! together; the command fails if any removal failed.
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::{error, info};

/// Arguments for `dockrs image rm`.
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Image names or IDs.
    #[arg(required = true, num_args = 1..)]
    images: Vec<String>,
    /// Remove even if the image has several tags or stopped containers use it.
    #[arg(short, long)]
    force: bool,
    /// Keep untagged parent images.
    #[arg(long)]
    no_prune: bool,
}

pub async fn handle_rm(args: RmArgs) -> Result<()> {
    info!(
        "Handling image rm command (Images: {:?}, Force: {})",
        args.images, args.force
    );
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;

    let mut failures = Vec::new();
    for name in &args.images {
        match docker::remove_image(&cfg.engine, name, args.force, args.no_prune).await {
            Ok(records) => {
                for record in records {
                    if let Some(untagged) = record.untagged {
                        println!("Untagged: {}", untagged);
                    }
                    if let Some(deleted) = record.deleted {
                        println!("Deleted: {}", deleted);
                    }
                }
            }
            Err(e) => {
                error!("Failed to remove image '{}': {:?}", name, e);
                failures.push((name, e));
            }
        }
    }

    if failures.is_empty() {
        return Ok(());
    }
    eprintln!("\nErrors occurred during image removal:");
    for (name, err) in &failures {
        eprintln!("- {}: {:#}", name, err);
    }
    let count = failures.len();
    let (_, first_error) = failures.remove(0);
    Err(first_error).context(format!("Failed to remove {} image(s)", count))
}
