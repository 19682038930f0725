//! # Engine System Queries (`common::docker::system`)
//!
//! File: cli/src/common/docker/system.rs
//!
//! Version and liveness checks against the engine.
//!
use super::connect::connect_docker;
use crate::core::config::EngineConfig;
use crate::core::error::{DockrsError, Result};
use anyhow::anyhow;
use bollard::system::Version;
use std::fmt;
use tracing::{debug, instrument};

/// The subset of the engine's version report that dockrs shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineVersion {
    pub version: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
    pub kernel_version: String,
}

impl From<Version> for EngineVersion {
    fn from(v: Version) -> Self {
        EngineVersion {
            version: v.version.unwrap_or_default(),
            api_version: v.api_version.unwrap_or_default(),
            os: v.os.unwrap_or_default(),
            arch: v.arch.unwrap_or_default(),
            kernel_version: v.kernel_version.unwrap_or_default(),
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Version:     {}", self.version)?;
        writeln!(f, "API version: {}", self.api_version)?;
        writeln!(f, "OS/Arch:     {}/{}", self.os, self.arch)?;
        write!(f, "Kernel:      {}", self.kernel_version)
    }
}

/// Queries the engine's version information.
#[instrument(skip_all)]
pub async fn engine_version(engine: &EngineConfig) -> Result<EngineVersion> {
    let docker = connect_docker(engine).await?;
    let version = docker.version().await.map_err(|e| {
        anyhow!(DockrsError::DockerApi { source: e }).context("Failed to query engine version")
    })?;
    debug!(?version, "Engine version received");
    Ok(version.into())
}

/// Checks that the engine answers. Returns its reply (normally `OK`).
#[instrument(skip_all)]
pub async fn ping(engine: &EngineConfig) -> Result<String> {
    let docker = connect_docker(engine).await?;
    docker
        .ping()
        .await
        .map_err(|e| anyhow!(DockrsError::DockerApi { source: e }).context("Engine did not answer ping"))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version_from_partial_report() {
        // Setup: a report missing the kernel version.
        let report = Version {
            version: Some("27.1.1".into()),
            api_version: Some("1.46".into()),
            os: Some("linux".into()),
            arch: Some("amd64".into()),
            ..Default::default()
        };

        // Action
        let version = EngineVersion::from(report);

        // Assert
        assert_eq!(version.version, "27.1.1");
        assert_eq!(version.kernel_version, "");
        assert!(version.to_string().contains("OS/Arch:     linux/amd64"));
    }

    #[tokio::test]
    #[ignore] // Requires a running engine.
    async fn test_ping() {
        let reply = ping(&EngineConfig::default()).await.unwrap();
        assert_eq!(reply, "OK");
    }
}
