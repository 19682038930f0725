//! # dockrs Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers:
//!
//! - **`archive`**: the build-context archiver (directory to gzipped ustar).
//! - **`docker`**: engine calls over `bollard` (connect, version, ping, images, build).
//! - **`fs`**: small filesystem write helpers.
//!
//! Command-specific logic lives in `commands::`; configuration and error types
//! live in `core::`.
//!

/// Build-context archiving (gzipped ustar of a directory tree).
pub mod archive;
/// Engine access through `bollard`.
pub mod docker;
/// Filesystem helpers.
pub mod fs;
