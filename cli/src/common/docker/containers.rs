//! # Container Lifecycle (`common::docker::containers`)
//!
//! File: cli/src/common/docker/containers.rs
//!
//! ## Overview
//!
//! Listing and lifecycle calls for existing containers: start, stop, restart,
//! kill, rename, wait and remove. Containers are addressed by name or ID.
//!
//! Engine replies are mapped as follows:
//! - `404` becomes `DockrsError::ContainerNotFound`;
//! - `409` becomes `DockrsError::DockerOperation` with the engine's message;
//! - `304` from start/stop (already in the requested state) is success;
//! - anything else is `DockrsError::DockerApi` with context.
//!
use super::connect::connect_docker;
use crate::core::config::EngineConfig;
use crate::core::error::{DockrsError, Result};
use anyhow::anyhow;
use bollard::container::{
    KillContainerOptions, ListContainersOptions, RemoveContainerOptions,
    RenameContainerOptions, RestartContainerOptions, StartContainerOptions,
    StopContainerOptions, WaitContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::models::ContainerSummary;
use clap::ValueEnum;
use futures_util::stream::StreamExt;
use tracing::{debug, info, instrument, warn};

/// State a `wait` call blocks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WaitCondition {
    /// Returns as soon as the container is not running.
    #[default]
    NotRunning,
    /// Waits for the next exit, even if the container is stopped now.
    NextExit,
    /// Waits until the container has been removed.
    Removed,
}

impl WaitCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            WaitCondition::NotRunning => "not-running",
            WaitCondition::NextExit => "next-exit",
            WaitCondition::Removed => "removed",
        }
    }
}

/// Maps a failed container call to the application error for `name`.
fn container_error(name: &str, action: &str, err: BollardError) -> anyhow::Error {
    match err {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => anyhow!(DockrsError::ContainerNotFound {
            name: name.to_string()
        }),
        BollardError::DockerResponseServerError {
            status_code: 409,
            message,
        } => anyhow!(DockrsError::DockerOperation(format!(
            "Cannot {} container '{}': {}",
            action, name, message
        ))),
        e => anyhow!(DockrsError::DockerApi { source: e })
            .context(format!("Failed to {} container '{}'", action, name)),
    }
}

fn is_not_modified(err: &BollardError) -> bool {
    matches!(
        err,
        BollardError::DockerResponseServerError {
            status_code: 304,
            ..
        }
    )
}

/// Lists containers. Only running ones unless `all` is set.
#[instrument(skip(engine))]
pub async fn list_containers(engine: &EngineConfig, all: bool) -> Result<Vec<ContainerSummary>> {
    let docker = connect_docker(engine).await?;
    let options = Some(ListContainersOptions::<String> {
        all,
        ..Default::default()
    });
    docker
        .list_containers(options)
        .await
        .map_err(|e| anyhow!(DockrsError::DockerApi { source: e }).context("Failed to list containers"))
}

/// Starts a container. Starting a running container is not an error.
#[instrument(skip(engine))]
pub async fn start_container(engine: &EngineConfig, name: &str) -> Result<()> {
    let docker = connect_docker(engine).await?;
    match docker
        .start_container(name, None::<StartContainerOptions<String>>)
        .await
    {
        Ok(()) => {
            info!("Container '{}' started.", name);
            Ok(())
        }
        Err(e) if is_not_modified(&e) => {
            warn!("Container '{}' was already running.", name);
            Ok(())
        }
        Err(e) => Err(container_error(name, "start", e)),
    }
}

/// Stops a container, killing it after `timeout` seconds.
///
/// # Arguments
///
/// * `engine` - Engine connection settings.
/// * `name` - Container name or ID.
/// * `timeout` - Grace period before SIGKILL. `None` leaves the engine default.
///
/// # Returns
///
/// * `Result<()>` - `Ok` also when the container was already stopped.
///
/// # Errors
///
/// * `DockrsError::ContainerNotFound` if no such container exists.
/// * `DockrsError::DockerApi` for other engine failures.
#[instrument(skip(engine))]
pub async fn stop_container(engine: &EngineConfig, name: &str, timeout: Option<u32>) -> Result<()> {
    let docker = connect_docker(engine).await?;
    let options = timeout.map(|t| StopContainerOptions { t: i64::from(t) });
    match docker.stop_container(name, options).await {
        Ok(()) => {
            info!("Container '{}' stopped.", name);
            Ok(())
        }
        Err(e) if is_not_modified(&e) => {
            warn!("Container '{}' was already stopped.", name);
            Ok(())
        }
        Err(e) => Err(container_error(name, "stop", e)),
    }
}

/// Restarts a container, with the same grace period semantics as `stop_container`.
#[instrument(skip(engine))]
pub async fn restart_container(
    engine: &EngineConfig,
    name: &str,
    timeout: Option<u32>,
) -> Result<()> {
    let docker = connect_docker(engine).await?;
    let options = timeout.map(|t| RestartContainerOptions { t: t as isize });
    docker
        .restart_container(name, options)
        .await
        .map_err(|e| container_error(name, "restart", e))?;
    info!("Container '{}' restarted.", name);
    Ok(())
}

/// Sends `signal` (e.g. `SIGKILL`, `SIGHUP`, `15`) to a running container.
#[instrument(skip(engine))]
pub async fn kill_container(engine: &EngineConfig, name: &str, signal: &str) -> Result<()> {
    let docker = connect_docker(engine).await?;
    docker
        .kill_container(name, Some(KillContainerOptions { signal }))
        .await
        .map_err(|e| container_error(name, "kill", e))?;
    info!("Sent {} to container '{}'.", signal, name);
    Ok(())
}

#[instrument(skip(engine))]
pub async fn rename_container(engine: &EngineConfig, name: &str, new_name: &str) -> Result<()> {
    let docker = connect_docker(engine).await?;
    docker
        .rename_container(name, RenameContainerOptions { name: new_name })
        .await
        .map_err(|e| container_error(name, "rename", e))?;
    info!("Container '{}' renamed to '{}'.", name, new_name);
    Ok(())
}

/// Blocks until the container reaches `condition` and returns its exit code.
///
/// The engine reports a non-zero exit as a wait error carrying the code; that
/// is translated back into `Ok(code)`.
#[instrument(skip(engine))]
pub async fn wait_container(
    engine: &EngineConfig,
    name: &str,
    condition: WaitCondition,
) -> Result<i64> {
    let docker = connect_docker(engine).await?;
    let mut stream = docker.wait_container(
        name,
        Some(WaitContainerOptions {
            condition: condition.as_str(),
        }),
    );

    let mut exit_code = 0;
    while let Some(item) = stream.next().await {
        match item {
            Ok(response) => exit_code = response.status_code,
            Err(BollardError::DockerContainerWaitError { code, error }) => {
                debug!(code, %error, "Container exited with a non-zero code");
                exit_code = code;
            }
            Err(e) => return Err(container_error(name, "wait for", e)),
        }
    }
    Ok(exit_code)
}

/// Removes a container. `force` kills it first if running; `volumes` also
/// removes its anonymous volumes.
#[instrument(skip(engine))]
pub async fn remove_container(
    engine: &EngineConfig,
    name: &str,
    force: bool,
    volumes: bool,
) -> Result<()> {
    let docker = connect_docker(engine).await?;
    let options = Some(RemoveContainerOptions {
        force,
        v: volumes,
        link: false,
    });
    docker
        .remove_container(name, options)
        .await
        .map_err(|e| container_error(name, "remove", e))?;
    info!("Container '{}' removed.", name);
    Ok(())
}

/// Container names without the engine's leading `/`, comma-separated.
pub fn display_names(container: &ContainerSummary) -> String {
    container
        .names
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|n| n.trim_start_matches('/'))
        .collect::<Vec<_>>()
        .join(",")
}
