//! # dockrs Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` used when writing archives to disk:
//! - **`ensure_dir_exists`**: creates a directory (and parents) if missing, and
//!   fails if the path exists but is not a directory.
//! - **`write_bytes_to_file`**: writes a byte buffer to a file after making sure
//!   its parent directory exists. Existing files are overwritten.
//!
//! ```rust,no_run
//! use dockrs::common::fs::io;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! io::write_bytes_to_file(Path::new("./out/context.tar.gz"), b"...")?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{DockrsError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(DockrsError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Writes `content` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns an `Err` if the parent directory cannot be created or the write fails.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote {} bytes to file: {:?}", content.len(), path);
    Ok(())
}
