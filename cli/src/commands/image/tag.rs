//! # Image Tag Command (`dockrs image tag`)
//!
//! File: cli/src/commands/image/tag.rs
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs image tag`.
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Existing image name or ID.
    source: String,
    /// New reference, `repo[:tag]`. The tag defaults to `latest`.
    target: String,
}

pub async fn handle_tag(args: TagArgs) -> Result<()> {
    info!("Handling image tag command ({} -> {})", args.source, args.target);
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    docker::tag_image(&cfg.engine, &args.source, &args.target).await?;
    println!("Tagged '{}' as '{}'", args.source, args.target);
    Ok(())
}
