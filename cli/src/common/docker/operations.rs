//! # Image Builds (`common::docker::operations`)
//!
//! File: cli/src/common/docker/operations.rs
//!
//! ## Overview
//!
//! `build_image` packs a context directory with a `ContextBuilder`, posts the
//! archive to the engine's build endpoint and streams the build output to
//! stdout as it arrives.
//!
//! Archiving is blocking filesystem work, so it runs on tokio's blocking pool
//! before the request is opened. The archive is sent unmodified as the
//! `application/x-tar` request body.
//!
//! ```rust,ignore
//! let builder = ContextBuilder::from_config(&cfg.context);
//! build_image(&cfg.engine, &builder, "app:latest", "Dockerfile", Path::new("."), false).await?;
//! ```
//!
use super::connect::connect_docker;
use crate::common::archive::ContextBuilder;
use crate::core::config::EngineConfig;
use crate::core::error::{DockrsError, Result};
use anyhow::{anyhow, Context};
use bollard::image::BuildImageOptions;
use bollard::models::BuildInfo;
use futures_util::stream::StreamExt;
use std::io::{stdout, Write as IoWrite};
use std::path::Path;
use tracing::{debug, error, info, instrument};

/// Builds an image tagged `tag` from `context_dir`.
///
/// `dockerfile` is relative to the root of the context.
///
/// # Errors
///
/// Returns an `Err` if:
/// - Archiving the context fails (`DockrsError::Context`).
/// - Connecting to the engine or reading the build stream fails (`DockrsError::DockerApi`).
/// - The engine reports a build error in the stream (`DockrsError::Docker`).
#[instrument(skip(engine, builder), fields(context = %context_dir.display()))]
pub async fn build_image(
    engine: &EngineConfig,
    builder: &ContextBuilder,
    tag: &str,
    dockerfile: &str,
    context_dir: &Path,
    no_cache: bool,
) -> Result<()> {
    info!(
        strategy = %builder.selected_strategy(),
        "Creating build context for '{}'...",
        context_dir.display()
    );
    let tar_gz = pack_context(builder, context_dir).await?;
    info!(bytes = tar_gz.len(), "Build context created.");

    let docker = connect_docker(engine).await?;
    let build_options = BuildImageOptions {
        dockerfile: dockerfile.to_string(),
        t: tag.to_string(),
        rm: true,
        nocache: no_cache,
        ..Default::default()
    };

    info!("Starting image build for tag: {}", tag);
    let mut build_stream = docker.build_image(build_options, None, Some(tar_gz.into()));

    while let Some(build_result) = build_stream.next().await {
        match build_result {
            Ok(info) => handle_build_info(info)?,
            Err(e) => {
                return Err(anyhow!(DockrsError::DockerApi { source: e }))
                    .context("Failed to process build stream event");
            }
        }
        let _ = stdout().flush();
    }

    info!("Image build stream finished successfully for tag: {}", tag);
    Ok(())
}

/// Runs the archiver on the blocking pool.
async fn pack_context(builder: &ContextBuilder, context_dir: &Path) -> Result<Vec<u8>> {
    let builder = builder.clone();
    let root = context_dir.to_path_buf();
    let packed = tokio::task::spawn_blocking(move || builder.build(&root))
        .await
        .context("Build context task panicked or was cancelled")?;
    packed
        .map_err(DockrsError::from)
        .context("Failed to create build context archive")
}

fn handle_build_info(info: BuildInfo) -> Result<()> {
    match info {
        BuildInfo {
            stream: Some(s), ..
        } => print!("{}", s),
        BuildInfo {
            error: Some(err),
            error_detail,
            ..
        } => {
            let detail_msg = error_detail.and_then(|d| d.message).unwrap_or_default();
            error!("Build Error: {} - {}", err, detail_msg);
            return Err(anyhow!(DockrsError::Docker(format!(
                "Build failed: {}. {}",
                err, detail_msg
            ))));
        }
        BuildInfo {
            status: Some(s),
            progress: Some(p),
            ..
        } => debug!("Build Status: {}, Progress: {}", s, p),
        BuildInfo {
            status: Some(s), ..
        } => debug!("Build Status: {}", s),
        other => debug!("Received unhandled build info: {:?}", other),
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::ContextStrategy;
    use crate::core::error::ContextError;
    use bollard::models::ErrorDetail;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_handle_build_info_error_maps_to_docker_error() {
        let info = BuildInfo {
            error: Some("COPY failed".into()),
            error_detail: Some(ErrorDetail {
                code: None,
                message: Some("file not found".into()),
            }),
            ..Default::default()
        };
        let err = handle_build_info(info).unwrap_err();
        match err.downcast_ref::<DockrsError>() {
            Some(DockrsError::Docker(msg)) => {
                assert!(msg.contains("COPY failed"));
                assert!(msg.contains("file not found"));
            }
            other => panic!("Expected DockrsError::Docker, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_build_info_status_is_ok() {
        let info = BuildInfo {
            status: Some("Downloading".into()),
            ..Default::default()
        };
        assert!(handle_build_info(info).is_ok());
    }

    #[tokio::test]
    async fn test_pack_context_runs_builder() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM scratch").unwrap();
        let builder = ContextBuilder::new(ContextStrategy::TempFile);
        let bytes = pack_context(&builder, dir.path()).await.unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    }

    #[tokio::test]
    async fn test_pack_context_missing_dir_is_context_error() {
        let dir = tempdir().unwrap();
        let builder = ContextBuilder::new(ContextStrategy::Memory);
        let err = pack_context(&builder, &dir.path().join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DockrsError>(),
            Some(DockrsError::Context(ContextError::Path { .. }))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires a running engine.
    async fn test_build_image_scratch() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM scratch\nCOPY hello /\n").unwrap();
        fs::write(dir.path().join("hello"), "hi").unwrap();
        let builder = ContextBuilder::new(ContextStrategy::Memory);
        build_image(
            &EngineConfig::default(),
            &builder,
            "dockrs-test:latest",
            "Dockerfile",
            dir.path(),
            true,
        )
        .await
        .unwrap();
    }
}
