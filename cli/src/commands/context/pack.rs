//! # Context Pack Command (`dockrs context pack`)
//!
//! File: cli/src/commands/context/pack.rs
//!
//! Archives a directory the same way `dockrs image build` does and writes the
//! result to a file, so a context can be inspected with `tar -tzf`.
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::archive::{ContextBuilder, ContextStrategy};
use dockrs::common::fs::io;
use dockrs::core::config;
use dockrs::core::error::{DockrsError, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for `dockrs context pack`.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Directory to archive.
    dir: PathBuf,

    /// Where to write the `.tar.gz` archive.
    #[arg(short, long)]
    output: PathBuf,

    /// Staging strategy; overrides `context.strategy`.
    #[arg(short, long, value_enum)]
    strategy: Option<ContextStrategy>,

    /// Gzip level 0-9; overrides `context.compression_level`.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: Option<u32>,
}

pub async fn handle_pack(args: PackArgs) -> Result<()> {
    info!("Handling context pack command...");
    debug!("Pack args: {:?}", args);

    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let mut builder = ContextBuilder::from_config(&cfg.context);
    if let Some(strategy) = args.strategy {
        builder = builder.strategy(strategy);
    }
    if let Some(level) = args.level {
        builder = builder.compression_level(level);
    }

    let root = args.dir.clone();
    let archive = tokio::task::spawn_blocking(move || builder.build(&root))
        .await
        .context("Build context task panicked or was cancelled")?
        .map_err(DockrsError::from)
        .with_context(|| format!("Failed to pack '{}'", args.dir.display()))?;

    io::write_bytes_to_file(&args.output, &archive)?;
    println!(
        "Packed {} into {} ({} bytes)",
        args.dir.display(),
        args.output.display(),
        archive.len()
    );
    Ok(())
}
