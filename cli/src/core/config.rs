//! # dockrs Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, expands and validates the dockrs configuration.
//! Two sections exist: `[context]` controls how build contexts are archived,
//! `[engine]` controls how the container engine is reached.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.dockrs.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/dockrs/config.toml`)
//! 3. Default values defined in the code
//!
//! A project value wins over the user value only when it differs from the default.
//! Paths are `~`-expanded, then the merged configuration is validated.
//!
//! ## Examples
//!
//! ```toml
//! [context]
//! strategy = "tempfile"
//! compression_level = 9
//! temp_dir = "~/scratch"
//!
//! [engine]
//! host = "tcp://127.0.0.1:2375"
//! ```
//!
//! ```rust,ignore
//! let cfg = config::load_config()?;
//! let builder = ContextBuilder::from_config(&cfg.context);
//! ```
//!
use crate::common::archive::ContextStrategy;
use crate::core::error::{DockrsError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Largest accepted `max_retries`; each retry doubles the in-memory capacity.
pub const MAX_CONTEXT_RETRIES: u32 = 4;

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Build-context archiving settings (`[context]`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Staging strategy: `memory` or `tempfile`.
    #[serde(default)]
    pub strategy: ContextStrategy,
    /// gzip level, 0 (store) to 9 (best).
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    /// Directory for staging files (can use ~). System temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<String>,
    /// How many times an exhausted in-memory build restarts with twice the capacity.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Engine connection settings (`[engine]`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// `unix://`, `tcp://` or `http://` address. `DOCKER_HOST` or the local socket when unset.
    #[serde(default)]
    pub host: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_compression_level() -> u32 {
    6
}
fn default_max_retries() -> u32 {
    1
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            strategy: ContextStrategy::default(),
            compression_level: default_compression_level(),
            temp_dir: None,
            max_retries: default_max_retries(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            host: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".dockrs.toml";

/// Loads the merged, expanded and validated configuration.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Dockrs", "dockrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.dockrs.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

pub(crate) fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();
    Config {
        context: ContextConfig {
            strategy: if project.context.strategy != defaults.context.strategy {
                project.context.strategy
            } else {
                user.context.strategy
            },
            compression_level: if project.context.compression_level
                != defaults.context.compression_level
            {
                project.context.compression_level
            } else {
                user.context.compression_level
            },
            temp_dir: project.context.temp_dir.or(user.context.temp_dir),
            max_retries: if project.context.max_retries != defaults.context.max_retries {
                project.context.max_retries
            } else {
                user.context.max_retries
            },
        },
        engine: EngineConfig {
            host: project.engine.host.or(user.engine.host),
            timeout_secs: if project.engine.timeout_secs != defaults.engine.timeout_secs {
                project.engine.timeout_secs
            } else {
                user.engine.timeout_secs
            },
        },
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.context.temp_dir.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
        debug!("Expanded context temp directory: {}", dir);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.context.compression_level > 9 {
        return Err(anyhow!(DockrsError::Config(format!(
            "Invalid compression_level {}. Expected a value between 0 and 9.",
            config.context.compression_level
        ))));
    }
    if config.context.max_retries > MAX_CONTEXT_RETRIES {
        return Err(anyhow!(DockrsError::Config(format!(
            "Invalid max_retries {}. At most {} retries are allowed.",
            config.context.max_retries, MAX_CONTEXT_RETRIES
        ))));
    }
    if let Some(dir) = &config.context.temp_dir {
        let dir = PathBuf::from(dir);
        if !dir.is_dir() {
            return Err(anyhow!(DockrsError::Config(format!(
                "Configured temp_dir '{}' is not an existing directory.",
                dir.display()
            ))));
        }
    }
    if let Some(host) = &config.engine.host {
        let known = ["unix://", "tcp://", "http://"];
        if !known.iter().any(|scheme| host.starts_with(scheme)) {
            return Err(anyhow!(DockrsError::Config(format!(
                "Unsupported engine host '{}'. Expected unix://, tcp:// or http://.",
                host
            ))));
        }
    }
    if config.engine.timeout_secs == 0 {
        return Err(anyhow!(DockrsError::Config(
            "Engine timeout_secs must be greater than zero.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}
