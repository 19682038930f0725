//! # Image Build Command (`dockrs image build`)
//!
//! File: cli/src/commands/image/build.rs
//!
//! ## Overview
//!
//! Resolves the tag, checks the Dockerfile exists inside the context, then
//! hands off to `common::docker::build_image`, which archives the context and
//! streams the engine's output.
//!
//! Without `--tag` the image is named `<context dir name>:latest`, lowercased.
//!
use anyhow::Context;
use clap::Parser;
use dockrs::common::archive::{ContextBuilder, ContextStrategy};
use dockrs::common::docker;
use dockrs::core::config;
use dockrs::core::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments for `dockrs image build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Build context directory.
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Image name and tag (e.g. `app:latest`).
    #[arg(short, long)]
    tag: Option<String>,

    /// Dockerfile path, relative to the context directory.
    #[arg(short, long, default_value = "Dockerfile")]
    file: String,

    /// Build without the engine's layer cache.
    #[arg(long)]
    no_cache: bool,

    /// Context staging strategy; overrides `context.strategy`.
    #[arg(short, long, value_enum)]
    strategy: Option<ContextStrategy>,
}

pub async fn handle_build(args: BuildArgs) -> Result<()> {
    info!("Handling image build command...");
    debug!("Build args: {:?}", args);

    let cfg = config::load_config().context("Failed to load dockrs configuration")?;

    let context_dir = args
        .dir
        .canonicalize()
        .with_context(|| format!("Build context not found: {}", args.dir.display()))?;
    let dockerfile_path = context_dir.join(&args.file);
    if !dockerfile_path.is_file() {
        anyhow::bail!(
            "Dockerfile not found at expected path: {}",
            dockerfile_path.display()
        );
    }

    let image_tag = match &args.tag {
        Some(tag) => tag.clone(),
        None => {
            let tag = default_tag(&context_dir);
            info!("No tag specified, using default: {}", tag);
            tag
        }
    };

    let mut builder = ContextBuilder::from_config(&cfg.context);
    if let Some(strategy) = args.strategy {
        builder = builder.strategy(strategy);
    }

    docker::build_image(
        &cfg.engine,
        &builder,
        &image_tag,
        &args.file,
        &context_dir,
        args.no_cache,
    )
    .await
    .with_context(|| format!("Failed to build image '{}'", image_tag))?;

    info!("Successfully built image '{}'", image_tag);
    println!("Successfully built image: {}", image_tag);
    Ok(())
}

fn default_tag(context_dir: &Path) -> String {
    let name = context_dir
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "context".to_string());
    format!("{}:latest", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tag_uses_lowercased_dir_name() {
        assert_eq!(default_tag(Path::new("/work/MyApp")), "myapp:latest");
        assert_eq!(default_tag(Path::new("/")), "context:latest");
    }
}
