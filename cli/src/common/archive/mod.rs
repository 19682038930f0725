//! # dockrs Build-Context Archiver (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module turns a directory on disk into a gzip-compressed ustar archive
//! that is uploaded, unmodified, as the `application/x-tar` body of an image
//! build request.
//!
//! ## Architecture
//!
//! Data flows one way, from the builder down to the sink:
//!
//! ```text
//! ContextBuilder -> walk_tree -> append_file -> ArchiveSession -> ArchiveSink
//!       |
//!       +-- measure_directory (in-memory strategy only)
//! ```
//!
//! - **`context`**: `ContextBuilder` and `ContextStrategy`; picks the sink,
//!   drives the walk, retries an exhausted in-memory build.
//! - **`walker`**: `walkdir` traversal producing archive-relative paths.
//! - **`entry`**: writes one file as one ustar entry.
//! - **`session`**: the `tar::Builder` + `flate2` gzip pipeline over a sink.
//! - **`sink`**: `ArchiveSink` with the fixed-capacity `MemorySink` and the
//!   self-deleting `TempFileSink`.
//! - **`estimate`**: size pre-pass over the same walk.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dockrs::common::archive::{self, ContextStrategy};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let bytes = archive::create_context_tar(Path::new("./my_context"), ContextStrategy::Memory)?;
//! // The bytes are handed to the engine's build endpoint as-is.
//! # Ok(())
//! # }
//! ```
//!
pub mod context;
pub mod entry;
pub mod estimate;
pub mod session;
pub mod sink;
pub mod walker;

pub use context::{create_context_tar, ContextBuilder, ContextStrategy};
pub use entry::append_file;
pub use estimate::{directory_size, measure_directory, ContextSize};
pub use session::ArchiveSession;
pub use sink::{ArchiveSink, MemorySink, TempFileSink};
pub use walker::{for_each_file, walk_tree, FileRecord, WalkStats};
