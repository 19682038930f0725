//! # dockrs Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout dockrs.
//!
//! ## Architecture
//!
//! The error system has three parts:
//! - `ContextError`: the typed failure taxonomy of the build-context archiver.
//!   Archiver functions return `std::result::Result<T, ContextError>` so callers
//!   can match on the exact failure (e.g. retry on `BufferExhausted`).
//! - `DockrsError`: application-level errors (configuration, engine API, ...),
//!   derived with `thiserror`.
//! - `Result<T>`: a type alias for `anyhow::Result<T>` used by application and
//!   command code, where adding context matters more than the exact type.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Matching an archiver failure
//! match builder.build(path) {
//!     Ok(bytes) => println!("{} bytes", bytes.len()),
//!     Err(ContextError::Path { path, .. }) => eprintln!("not a directory: {}", path.display()),
//!     Err(e) => return Err(e.into()),
//! }
//!
//! // Adding context in application code
//! let archive = builder.build(path).context("Failed to create build context")?;
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the build-context archiver.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The context root is not an existing directory, or a walked entry does
    /// not lie under it.
    #[error("Invalid build context path '{}': {reason}", .path.display())]
    Path { path: PathBuf, reason: String },

    /// A source file or directory could not be read, or the staging file could
    /// not be created, read back, or removed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive layer rejected a header, data, or trailer write.
    #[error("Failed to write archive entry '{path}': {source}")]
    ArchiveWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The in-memory sink ran out of its pre-allocated capacity.
    #[error("Build context exceeded the in-memory buffer capacity of {capacity} bytes")]
    BufferExhausted { capacity: usize },
}

impl ContextError {
    pub(crate) fn path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ContextError::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ContextError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this failure came from the archive layer rather than the source tree.
    ///
    /// `BufferExhausted` is a refinement of an archive write failure and counts as one.
    pub fn is_archive_write(&self) -> bool {
        matches!(
            self,
            ContextError::ArchiveWrite { .. } | ContextError::BufferExhausted { .. }
        )
    }
}

/// Application-level error type for dockrs.
#[derive(Error, Debug)]
pub enum DockrsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Engine error: {0}")]
    Docker(String),

    #[error("Engine API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Build context error: {0}")]
    Context(#[from] ContextError),

    #[error("Container not found: {name}")]
    ContainerNotFound { name: String },

    #[error("Image not found: {name}")]
    ImageNotFound { name: String },

    #[error("Image '{name}' is in use by a container")]
    ImageInUse { name: String },

    #[error("Engine operation failed: {0}")]
    DockerOperation(String),
}

/// Type alias for Result using anyhow::Error for application code.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = DockrsError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let exhausted = ContextError::BufferExhausted { capacity: 4096 };
        assert_eq!(
            exhausted.to_string(),
            "Build context exceeded the in-memory buffer capacity of 4096 bytes"
        );

        let missing = DockrsError::ContainerNotFound {
            name: "web".to_string(),
        };
        assert_eq!(missing.to_string(), "Container not found: web");

        let in_use = DockrsError::ImageInUse {
            name: "app:latest".to_string(),
        };
        assert_eq!(in_use.to_string(), "Image 'app:latest' is in use by a container");

        let path_err = ContextError::path("/nope", "does not exist");
        assert_eq!(
            path_err.to_string(),
            "Invalid build context path '/nope': does not exist"
        );
    }

    #[test]
    fn test_buffer_exhausted_is_archive_write() {
        assert!(ContextError::BufferExhausted { capacity: 1 }.is_archive_write());
        assert!(ContextError::ArchiveWrite {
            path: "Dockerfile".into(),
            source: io::Error::new(io::ErrorKind::Other, "rejected"),
        }
        .is_archive_write());
        assert!(!ContextError::path("/x", "missing").is_archive_write());
    }

    #[test]
    fn test_context_error_converts_into_app_error() {
        let app: DockrsError = ContextError::BufferExhausted { capacity: 8 }.into();
        assert!(matches!(
            app,
            DockrsError::Context(ContextError::BufferExhausted { capacity: 8 })
        ));
    }
}
