//! # Size Estimator (`common::archive::estimate`)
//!
//! File: cli/src/common/archive/estimate.rs
//!
//! ## Overview
//!
//! A pre-pass over the context tree that adds up regular file sizes. The
//! in-memory strategy uses it to size its buffer before archiving.
//!
//! The pass is `walker::for_each_file` with a visitor that does nothing, so
//! symlinks and special files are skipped here exactly as they are skipped when
//! archiving, and an unreadable directory fails the estimate just as it would
//! fail the build.
//!
use super::walker::for_each_file;
use crate::core::error::ContextError;
use std::path::Path;
use tracing::{debug, instrument};

/// ustar block size.
const BLOCK: u64 = 512;
/// Header block, worst-case padding, and one GNU long-name record per file.
const PER_FILE_OVERHEAD: u64 = 4 * BLOCK;
/// Two zero blocks close a tar stream.
const TRAILER_BYTES: u64 = 2 * BLOCK;
/// gzip header (10 bytes) plus CRC32 and size footer (8 bytes).
const GZIP_FRAMING: u64 = 18;

/// What the estimator found below a context root.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ContextSize {
    /// Sum of regular file sizes.
    pub bytes: u64,
    /// Number of regular files.
    pub files: u64,
    /// Number of directories, the root included.
    pub directories: u64,
}

impl ContextSize {
    /// Upper bound on the uncompressed tar stream.
    pub fn tar_bound(&self) -> u64 {
        self.bytes
            .saturating_add(self.files.saturating_mul(PER_FILE_OVERHEAD))
            .saturating_add(TRAILER_BYTES)
    }

    /// Buffer capacity for the compressed archive of an unchanged tree.
    ///
    /// Deflate can expand incompressible input slightly, so zlib's
    /// `deflateBound` expansion is added on top of the tar bound. Paths long
    /// enough to need more than one long-name block, or files that grow before
    /// they are archived, can still overrun it.
    pub fn archive_capacity(&self) -> u64 {
        let n = self.tar_bound();
        n.saturating_add((n >> 12) + (n >> 14) + (n >> 25) + 13)
            .saturating_add(GZIP_FRAMING)
    }
}

/// Sums the sizes of all regular files below `root`.
///
/// # Arguments
///
/// * `root` - The context root directory.
///
/// # Returns
///
/// * `Result<u64, ContextError>` - Total bytes of regular file content.
///
/// # Errors
///
/// * `ContextError::Path` - `root` does not exist or is not a directory.
/// * `ContextError::Io` - a directory or metadata record could not be read.
pub fn directory_size(root: &Path) -> Result<u64, ContextError> {
    measure_directory(root).map(|size| size.bytes)
}

/// Like `directory_size`, but also counts files and directories.
///
/// # Arguments
///
/// * `root` - The context root directory.
///
/// # Returns
///
/// * `Result<ContextSize, ContextError>` - Byte total, file count and
///   directory count (root included).
///
/// # Errors
///
/// Same as `directory_size`.
#[instrument(fields(root = %root.display()))]
pub fn measure_directory(root: &Path) -> Result<ContextSize, ContextError> {
    let stats = for_each_file(root, |_| Ok(()))?;
    let size = ContextSize {
        bytes: stats.bytes,
        files: stats.files,
        directories: stats.directories,
    };

    debug!(
        bytes = size.bytes,
        files = size.files,
        directories = size.directories,
        "Measured build context"
    );
    Ok(size)
}
