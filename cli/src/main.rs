//! # dockrs Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `dockrs` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command group handlers
//!
//! ## Examples
//!
//! ```bash
//! # Pack a build context to disk
//! dockrs context pack ./app --output app.tar.gz
//!
//! # Build an image with debug logging
//! dockrs -vv image build ./app --tag app:latest
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "dockrs",
    about = "dockrs: build contexts and image builds for a container engine",
    long_about = "Packs directories into gzipped tar build contexts and drives image builds\n\
                  on a Docker-compatible engine.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Pack or measure build contexts without an engine.
    #[command(alias = "ctx")]
    Context(commands::context::ContextArgs),
    /// Build, list, tag and remove images.
    #[command(alias = "i")]
    Image(commands::image::ImageArgs),
    /// Start, stop and remove existing containers.
    #[command(alias = "c")]
    Container(commands::container::ContainerArgs),
    /// Engine version and liveness.
    System(commands::system::SystemArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Context(args) => commands::context::handle_context(args).await,
        Commands::Image(args) => commands::image::handle_image(args).await,
        Commands::Container(args) => commands::container::handle_container(args).await,
        Commands::System(args) => commands::system::handle_system(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
