//! # Context Command Group (`dockrs context`)
//!
//! File: cli/src/commands/context/mod.rs
//!
//! Local build-context tooling that never talks to the engine:
//! - `pack`: archive a directory to a `.tar.gz` file.
//! - `size`: report what the size pre-pass sees in a directory.
//!
use dockrs::core::error::Result;
use clap::{Parser, Subcommand};

mod pack;
mod size;

/// Arguments for `dockrs context`.
#[derive(Parser, Debug)]
pub struct ContextArgs {
    #[command(subcommand)]
    command: ContextCommand,
}

#[derive(Subcommand, Debug)]
enum ContextCommand {
    /// Archive a directory as a gzipped tar build context.
    Pack(pack::PackArgs),
    /// Show the uncompressed size and file count of a directory.
    Size(size::SizeArgs),
}

/// Dispatches `dockrs context <subcommand>`.
pub async fn handle_context(args: ContextArgs) -> Result<()> {
    match args.command {
        ContextCommand::Pack(args) => pack::handle_pack(args).await,
        ContextCommand::Size(args) => size::handle_size(args).await,
    }
}
