//! # Image Command Group (`dockrs image`)
//!
//! File: cli/src/commands/image/mod.rs
//!
//! - `build`: archive a context directory and build an image from it.
//! - `ls`: list images known to the engine.
//! - `tag`: add a reference to an existing image.
//! - `rm`: remove images.
//!
use clap::{Parser, Subcommand};
use dockrs::core::error::Result;

mod build;
mod list;
mod rm;
mod tag;

/// Arguments for `dockrs image`.
#[derive(Parser, Debug)]
pub struct ImageArgs {
    #[command(subcommand)]
    command: ImageCommand,
}

#[derive(Subcommand, Debug)]
enum ImageCommand {
    /// Build an image from a context directory.
    Build(build::BuildArgs),
    /// List images.
    #[command(name = "ls", alias = "list")]
    List(list::ListArgs),
    /// Add a new reference to an image.
    Tag(tag::TagArgs),
    /// Remove one or more images.
    #[command(name = "rm", alias = "remove")]
    Rm(rm::RmArgs),
}

/// Dispatches `dockrs image <subcommand>`.
pub async fn handle_image(args: ImageArgs) -> Result<()> {
    match args.command {
        ImageCommand::Build(args) => build::handle_build(args).await,
        ImageCommand::List(args) => list::handle_list(args).await,
        ImageCommand::Tag(args) => tag::handle_tag(args).await,
        ImageCommand::Rm(args) => rm::handle_rm(args).await,
    }
}
