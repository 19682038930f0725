//! # Container Command Group (`dockrs container`)
//!
//! File: cli/src/commands/container/mod.rs
//!
//! ## Overview
//!
//! Manages containers that already exist on the engine:
//! - `ls`: list containers (running only, or all with `--all`).
//! - `start`, `stop`, `restart`, `kill`: change run state.
//! - `rename`: give a container a new name.
//! - `wait`: block until a container stops and print its exit code.
//! - `rm`: remove containers.
//!
//! Commands that take several containers run one task per container and
//! report every failure before returning the first.
//!
use anyhow::Context;
use clap::{Parser, Subcommand};
use dockrs::core::error::Result;
use futures_util::future::join_all;
use std::future::Future;
use tracing::error;

mod kill;
mod list;
mod rename;
mod restart;
mod rm;
mod start;
mod stop;
mod wait;

/// Arguments for `dockrs container`.
#[derive(Parser, Debug)]
pub struct ContainerArgs {
    #[command(subcommand)]
    command: ContainerCommand,
}

#[derive(Subcommand, Debug)]
enum ContainerCommand {
    /// List containers.
    #[command(name = "ls", alias = "ps")]
    List(list::ListArgs),
    /// Start one or more stopped containers.
    Start(start::StartArgs),
    /// Stop one or more running containers.
    Stop(stop::StopArgs),
    /// Restart one or more containers.
    Restart(restart::RestartArgs),
    /// Send a signal to one or more running containers.
    Kill(kill::KillArgs),
    /// Rename a container.
    Rename(rename::RenameArgs),
    /// Wait for a container to stop and print its exit code.
    Wait(wait::WaitArgs),
    /// Remove one or more containers.
    #[command(name = "rm", alias = "remove")]
    Rm(rm::RmArgs),
}

/// Dispatches `dockrs container <subcommand>`.
pub async fn handle_container(args: ContainerArgs) -> Result<()> {
    match args.command {
        ContainerCommand::List(args) => list::handle_list(args).await,
        ContainerCommand::Start(args) => start::handle_start(args).await,
        ContainerCommand::Stop(args) => stop::handle_stop(args).await,
        ContainerCommand::Restart(args) => restart::handle_restart(args).await,
        ContainerCommand::Kill(args) => kill::handle_kill(args).await,
        ContainerCommand::Rename(args) => rename::handle_rename(args).await,
        ContainerCommand::Wait(args) => wait::handle_wait(args).await,
        ContainerCommand::Rm(args) => rm::handle_rm(args).await,
    }
}

/// Runs `op` once per container name, concurrently, and prints each name that
/// succeeded.
///
/// # Arguments
///
/// * `names` - Container names or IDs, as given on the command line.
/// * `action` - Verb used in the failure summary (e.g. "stop").
/// * `op` - Builds the engine call for one name.
///
/// # Returns
///
/// * `Result<()>` - `Ok` if every call succeeded.
///
/// # Errors
///
/// The first failure, with context naming how many containers failed. All
/// failures are listed on stderr first.
pub(crate) async fn run_for_each<F, Fut>(names: &[String], action: &str, op: F) -> Result<()>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let tasks = names.iter().map(|name| {
        let name = name.clone();
        let call = op(name.clone());
        tokio::spawn(async move {
            match call.await {
                Ok(()) => Ok(name),
                Err(e) => Err((name, e)),
            }
        })
    });

    let mut failures = Vec::new();
    for result in join_all(tasks).await {
        match result {
            Ok(Ok(name)) => println!("{}", name),
            Ok(Err((name, e))) => {
                error!("Failed to {} container '{}': {:?}", action, name, e);
                failures.push((name, e));
            }
            Err(e) => error!("Container {} task failed unexpectedly: {}", action, e),
        }
    }

    if failures.is_empty() {
        return Ok(());
    }
    eprintln!("\nErrors occurred during container {}:", action);
    for (name, err) in &failures {
        eprintln!("- {}: {:#}", name, err);
    }
    let count = failures.len();
    let (_, first_error) = failures.remove(0);
    Err(first_error).context(format!("Failed to {} {} container(s)", action, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_run_for_each_reports_failures() {
        // Setup: "bad" fails, the others succeed.
        let names = vec!["one".to_string(), "bad".to_string(), "two".to_string()];

        // Action
        let result = run_for_each(&names, "stop", |name| async move {
            if name == "bad" {
                Err(anyhow!("no such container"))
            } else {
                Ok(())
            }
        })
        .await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Failed to stop 1 container(s)");
        assert_eq!(err.root_cause().to_string(), "no such container");
    }

    #[tokio::test]
    async fn test_run_for_each_all_succeed() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert!(run_for_each(&names, "start", |_| async { Ok::<(), anyhow::Error>(()) }).await.is_ok());
    }
}
