//! # Engine Image Queries (`common::docker::images`)
//!
//! File: cli/src/common/docker/images.rs
//!
//! Listing, tagging and removing the images known to the engine.
//!
use super::connect::connect_docker;
use crate::core::config::EngineConfig;
use crate::core::error::{DockrsError, Result};
use anyhow::anyhow;
use bollard::errors::Error as BollardError;
use bollard::image::{ListImagesOptions, RemoveImageOptions, TagImageOptions};
use bollard::models::{ImageDeleteResponseItem, ImageSummary};
use tracing::{info, instrument, warn};

/// Lists images on the engine. `all` includes intermediate layers.
#[instrument(skip(engine))]
pub async fn list_images(engine: &EngineConfig, all: bool) -> Result<Vec<ImageSummary>> {
    let docker = connect_docker(engine).await?;
    let options = Some(ListImagesOptions::<String> {
        all,
        ..Default::default()
    });
    info!("Listing images (All: {})...", all);
    docker
        .list_images(options)
        .await
        .map_err(|e| anyhow!(DockrsError::DockerApi { source: e }).context("Failed to list images"))
}

/// Maps a failed image call to the application error for `name`.
fn image_error(name: &str, action: &str, err: BollardError) -> anyhow::Error {
    match err {
        BollardError::DockerResponseServerError {
            status_code: 404, ..
        } => anyhow!(DockrsError::ImageNotFound {
            name: name.to_string()
        }),
        BollardError::DockerResponseServerError {
            status_code: 409,
            message,
        } => {
            warn!("Engine refused to {} image '{}': {}", action, name, message);
            anyhow!(DockrsError::ImageInUse {
                name: name.to_string()
            })
        }
        e => anyhow!(DockrsError::DockerApi { source: e })
            .context(format!("Failed to {} image '{}'", action, name)),
    }
}

/// Splits `repo[:tag]` into repository and tag, defaulting the tag to
/// `latest`. A colon before the last `/` belongs to a registry port.
pub fn split_reference(reference: &str) -> (&str, &str) {
    let name_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[name_start..].rfind(':') {
        Some(i) => {
            let split = name_start + i;
            (&reference[..split], &reference[split + 1..])
        }
        None => (reference, "latest"),
    }
}

/// Adds the reference `target` (`repo[:tag]`) to the image `source`.
#[instrument(skip(engine))]
pub async fn tag_image(engine: &EngineConfig, source: &str, target: &str) -> Result<()> {
    let docker = connect_docker(engine).await?;
    let (repo, tag) = split_reference(target);
    docker
        .tag_image(source, Some(TagImageOptions { repo, tag }))
        .await
        .map_err(|e| image_error(source, "tag", e))?;
    info!("Tagged '{}' as '{}:{}'.", source, repo, tag);
    Ok(())
}

/// Removes an image by name or ID.
///
/// # Arguments
///
/// * `engine` - Engine connection settings.
/// * `name` - Image reference or ID.
/// * `force` - Remove even if tagged in several repositories or used by stopped containers.
/// * `noprune` - Keep untagged parent layers.
///
/// # Returns
///
/// * `Result<Vec<ImageDeleteResponseItem>>` - The untag and delete records the engine reports.
///
/// # Errors
///
/// * `DockrsError::ImageNotFound` if the engine does not know `name`.
/// * `DockrsError::ImageInUse` if a container still uses it.
/// * `DockrsError::DockerApi` for other engine failures.
#[instrument(skip(engine))]
pub async fn remove_image(
    engine: &EngineConfig,
    name: &str,
    force: bool,
    noprune: bool,
) -> Result<Vec<ImageDeleteResponseItem>> {
    let docker = connect_docker(engine).await?;
    let options = Some(RemoveImageOptions { force, noprune });
    let removed = docker
        .remove_image(name, options, None)
        .await
        .map_err(|e| image_error(name, "remove", e))?;
    info!("Image '{}' removed ({} records).", name, removed.len());
    Ok(removed)
}

/// `repo:tag` names of an image, or `<none>:<none>` for an untagged one.
pub fn display_tags(image: &ImageSummary) -> Vec<String> {
    if image.repo_tags.is_empty() {
        vec!["<none>:<none>".to_string()]
    } else {
        image.repo_tags.clone()
    }
}

/// Image ID without its `sha256:` prefix, shortened to 12 characters.
pub fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    &id[..id.len().min(12)]
}
