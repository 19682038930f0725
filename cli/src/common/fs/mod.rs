//! # dockrs Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! Filesystem helpers shared by the command handlers.
//!

/// Basic file I/O operations (`ensure_dir_exists`, `write_bytes_to_file`).
pub mod io;
