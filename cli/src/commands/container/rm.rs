//! # Container Remove Command (`dockrs container rm`)
//!
//! File: cli/src/commands/container/rm.rs
//!
use super::run_for_each;
use anyhow::Context;
use clap::Parser;
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use tracing::info;

/// Arguments for `dockrs container rm`.
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Container names or IDs.
    #[arg(required = true, num_args = 1..)]
    containers: Vec<String>,
    /// Kill running containers before removing them.
    #[arg(short, long)]
    force: bool,
    /// Also remove anonymous volumes.
    #[arg(long)]
    volumes: bool,
}

pub async fn handle_rm(args: RmArgs) -> Result<()> {
    info!(
        "Handling container rm command ({:?}, force: {}, volumes: {})",
        args.containers, args.force, args.volumes
    );
    let cfg = config::load_config().context("Failed to load dockrs configuration")?;
    let (force, volumes) = (args.force, args.volumes);
    run_for_each(&args.containers, "remove", |name| {
        let engine = cfg.engine.clone();
        async move { docker::remove_container(&engine, &name, force, volumes).await }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rm_args_parsing() {
        let args = RmArgs::try_parse_from(["rm", "c1", "c2", "-f", "--volumes"]).unwrap();
        assert_eq!(args.containers, vec!["c1", "c2"]);
        assert!(args.force);
        assert!(args.volumes);
        assert!(RmArgs::try_parse_from(["rm"]).is_err());
    }
}
