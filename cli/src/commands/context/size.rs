//! # Context Size Command (`dockrs context size`)
//!
//! File: cli/src/commands/context/size.rs
//!
//! Prints what the in-memory strategy would measure before archiving.
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::archive::measure_directory;
use dockrs::core::error::{DockrsError, Result};
use std::path::PathBuf;
use tracing::info;

/// Arguments for `dockrs context size`.
#[derive(Parser, Debug)]
pub struct SizeArgs {
    /// Directory to measure.
    dir: PathBuf,
}

pub async fn handle_size(args: SizeArgs) -> Result<()> {
    info!("Measuring build context {}", args.dir.display());
    let size = measure_directory(&args.dir)
        .map_err(DockrsError::from)
        .with_context(|| format!("Failed to measure '{}'", args.dir.display()))?;

    println!("Files:            {}", size.files);
    println!("Directories:      {}", size.directories);
    println!("Bytes:            {}", size.bytes);
    println!("Archive capacity: {}", size.archive_capacity());
    Ok(())
}
