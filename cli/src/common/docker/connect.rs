//! # Engine Connection (`common::docker::connect`)
//!
//! File: cli/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! Opens a `bollard::Docker` client for the configured engine. Without a
//! configured host the client honours `DOCKER_HOST` and falls back to the
//! platform's local socket.
//!
//! ```rust,ignore
//! let docker = connect_docker(&cfg.engine).await?;
//! docker.ping().await?;
//! ```
//!
use crate::core::config::EngineConfig;
use crate::core::error::{DockrsError, Result};
use anyhow::{anyhow, Context};
use bollard::{Docker, API_DEFAULT_VERSION};
use tracing::{debug, instrument};

/// How an engine host string is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `DOCKER_HOST` or the local socket.
    Defaults,
    /// Unix socket or named pipe path.
    Socket(String),
    /// `tcp://` or `http://` address.
    Http(String),
}

impl Endpoint {
    pub fn parse(host: Option<&str>) -> Self {
        match host {
            None => Endpoint::Defaults,
            Some(host) => match host.strip_prefix("unix://") {
                Some(path) => Endpoint::Socket(path.to_string()),
                None => Endpoint::Http(host.to_string()),
            },
        }
    }
}

/// Establishes a client for the engine described by `engine`.
///
/// # Errors
///
/// Returns an `Err` wrapping `DockrsError::DockerApi` if the client cannot be created.
#[instrument(skip_all, fields(host = engine.host.as_deref().unwrap_or("<default>")))]
pub async fn connect_docker(engine: &EngineConfig) -> Result<Docker> {
    let endpoint = Endpoint::parse(engine.host.as_deref());
    debug!(?endpoint, timeout = engine.timeout_secs, "Connecting to engine");
    let docker = match &endpoint {
        Endpoint::Defaults => Docker::connect_with_defaults(),
        Endpoint::Socket(path) => {
            Docker::connect_with_socket(path, engine.timeout_secs, API_DEFAULT_VERSION)
        }
        Endpoint::Http(addr) => {
            Docker::connect_with_http(addr, engine.timeout_secs, API_DEFAULT_VERSION)
        }
    };
    docker
        .map_err(|e| anyhow!(DockrsError::DockerApi { source: e }))
        .context("Failed to connect to the container engine. Is it running and accessible?")
}
