//! # Build Context Archives (`common::archive::context`)
//!
//! File: cli/src/common/archive/context.rs
//!
//! ## Overview
//!
//! Turns a directory into the gzip-compressed ustar archive the engine expects
//! as the body of an image build request.
//!
//! ## Architecture
//!
//! `ContextBuilder` opens an `ArchiveSession` over a sink, walks the tree into
//! it, closes it and returns the sink's bytes. Two sink strategies exist:
//!
//! - **`ContextStrategy::Memory`**: the tree is measured first and a buffer of
//!   `ContextSize::archive_capacity()` bytes is allocated once. If the buffer
//!   still runs out (the tree changed, or paths needed extra long-name records),
//!   the whole build starts over with twice the capacity, up to `max_retries`
//!   times, after which `ContextError::BufferExhausted` is returned.
//! - **`ContextStrategy::TempFile`**: the archive is staged in a uniquely named
//!   temporary file which is read back and removed. No size estimate is needed.
//!   The file is removed on every exit path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dockrs::common::archive::{ContextBuilder, ContextStrategy};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), dockrs::core::error::ContextError> {
//! let archive = ContextBuilder::new(ContextStrategy::TempFile)
//!     .compression_level(9)
//!     .build(Path::new("./app"))?;
//! println!("Generated tar.gz archive with size: {} bytes", archive.len());
//! # Ok(())
//! # }
//! ```
//!
use super::estimate::measure_directory;
use super::session::ArchiveSession;
use super::sink::{ArchiveSink, MemorySink, TempFileSink};
use super::walker::{ensure_context_root, walk_tree};
use crate::core::config::ContextConfig;
use crate::core::error::ContextError;
use flate2::Compression;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Smallest buffer a retry grows to, whatever the failed capacity was.
const MIN_RETRY_CAPACITY: usize = 64 * 1024;

/// Where the archive is staged while it is being written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContextStrategy {
    /// Pre-sized in-memory buffer.
    #[default]
    Memory,
    /// Self-deleting temporary file.
    #[value(name = "tempfile")]
    TempFile,
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextStrategy::Memory => write!(f, "memory"),
            ContextStrategy::TempFile => write!(f, "tempfile"),
        }
    }
}

/// Builds gzip-compressed ustar archives of directories.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    strategy: ContextStrategy,
    compression: Compression,
    temp_dir: Option<PathBuf>,
    initial_capacity: Option<usize>,
    max_retries: u32,
}

impl ContextBuilder {
    pub fn new(strategy: ContextStrategy) -> Self {
        ContextBuilder {
            strategy,
            compression: Compression::default(),
            temp_dir: None,
            initial_capacity: None,
            max_retries: 1,
        }
    }

    /// Builder configured from the `[context]` section.
    pub fn from_config(config: &ContextConfig) -> Self {
        let mut builder = ContextBuilder::new(config.strategy)
            .compression_level(config.compression_level)
            .max_retries(config.max_retries);
        if let Some(dir) = &config.temp_dir {
            builder = builder.temp_dir(dir);
        }
        builder
    }

    pub fn strategy(mut self, strategy: ContextStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// gzip level, clamped to 0..=9.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }

    /// Directory for the temp-file strategy's staging file.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Skips the size estimate and starts the in-memory strategy at `bytes`.
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = Some(bytes);
        self
    }

    /// Restarts allowed after the in-memory buffer runs out.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn selected_strategy(&self) -> ContextStrategy {
        self.strategy
    }

    /// Archives `root` with the selected strategy.
    ///
    /// # Arguments
    ///
    /// * `root` - The build context directory.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<u8>, ContextError>` - The complete gzip-compressed ustar
    ///   archive. Nothing of the staging sink outlives the call.
    ///
    /// # Errors
    ///
    /// * `ContextError::Path` - `root` is not an existing directory.
    /// * `ContextError::Io` - a source file, directory, or staging file failed.
    /// * `ContextError::ArchiveWrite` - the archive layer rejected a write.
    /// * `ContextError::BufferExhausted` - the in-memory buffer stayed too small
    ///   after all retries.
    #[instrument(skip_all, fields(strategy = %self.strategy, root = %root.display()))]
    pub fn build(&self, root: &Path) -> Result<Vec<u8>, ContextError> {
        ensure_context_root(root)?;
        let archive = match self.strategy {
            ContextStrategy::Memory => self.build_in_memory(root)?,
            ContextStrategy::TempFile => self.build_with_temp_file(root)?,
        };
        info!(bytes = archive.len(), "Build context archive created");
        Ok(archive)
    }

    /// Archives `root` into a caller-supplied sink and finalizes it.
    pub fn build_into<S: ArchiveSink>(&self, root: &Path, sink: S) -> Result<Vec<u8>, ContextError> {
        ensure_context_root(root)?;
        self.archive(root, sink)
    }

    fn build_in_memory(&self, root: &Path) -> Result<Vec<u8>, ContextError> {
        let mut capacity = match self.initial_capacity {
            Some(bytes) => bytes,
            None => {
                let size = measure_directory(root)?;
                usize::try_from(size.archive_capacity()).unwrap_or(usize::MAX)
            }
        };

        let mut attempt = 0;
        loop {
            let sink = MemorySink::with_capacity(capacity).map_err(|e| ContextError::io(root, e))?;
            match self.archive(root, sink) {
                Err(ContextError::BufferExhausted { .. }) if attempt < self.max_retries => {
                    let grown = capacity.saturating_mul(2).max(MIN_RETRY_CAPACITY);
                    warn!(
                        capacity,
                        grown, "Build context outgrew its in-memory buffer, restarting"
                    );
                    capacity = grown;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn build_with_temp_file(&self, root: &Path) -> Result<Vec<u8>, ContextError> {
        let sink = TempFileSink::create(self.temp_dir.as_deref())?;
        self.archive(root, sink)
    }

    fn archive<S: ArchiveSink>(&self, root: &Path, sink: S) -> Result<Vec<u8>, ContextError> {
        let mut session = ArchiveSession::open(sink, self.compression);
        let stats = match walk_tree(&mut session, root) {
            Ok(stats) => stats,
            Err(e) => {
                session.abort();
                return Err(e);
            }
        };
        let sink = session.close()?;
        debug!(
            files = stats.files,
            bytes = stats.bytes,
            compressed = sink.bytes_written(),
            "Build context archived"
        );
        sink.finalize()
    }
}

/// Creates a gzipped ustar build context of `context_path`.
///
/// Convenience for `ContextBuilder::new(strategy).build(context_path)`.
pub fn create_context_tar(
    context_path: &Path,
    strategy: ContextStrategy,
) -> Result<Vec<u8>, ContextError> {
    ContextBuilder::new(strategy).build(context_path)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::{self, Read, Write};
    use tar::Archive;
    use tempfile::tempdir;

    fn extract(archive: &[u8]) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        let mut tar = Archive::new(GzDecoder::new(archive));
        for entry in tar.entries().unwrap() {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().into_owned();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            files.insert(path, content);
        }
        files
    }

    fn noise(len: usize) -> Vec<u8> {
        let mut state = 0x9e37_79b9_u32;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 7) as u8
            })
            .collect()
    }

    #[test]
    fn test_create_context_tar_basic() {
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path();
        fs::write(dir_path.join("file1.txt"), "hello").unwrap();
        fs::create_dir(dir_path.join("subdir")).unwrap();
        fs::write(dir_path.join("subdir/file2.txt"), "world").unwrap();

        for strategy in [ContextStrategy::Memory, ContextStrategy::TempFile] {
            let tar_data = create_context_tar(dir_path, strategy).unwrap();
            let files = extract(&tar_data);
            assert_eq!(files.len(), 2, "strategy {}", strategy);
            assert_eq!(files["file1.txt"], b"hello");
            assert_eq!(files["subdir/file2.txt"], b"world");
        }
    }

    #[test]
    fn test_exhausted_buffer_without_retry_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("noise.bin"), noise(128 * 1024)).unwrap();

        let err = ContextBuilder::new(ContextStrategy::Memory)
            .initial_capacity(2048)
            .max_retries(0)
            .build(dir.path())
            .unwrap_err();

        assert!(matches!(err, ContextError::BufferExhausted { capacity: 2048 }));
    }

    #[test]
    fn test_exhausted_buffer_retries_with_larger_capacity() {
        // Setup
        let dir = tempdir().unwrap();
        let content = noise(40 * 1024);
        fs::write(dir.path().join("noise.bin"), &content).unwrap();

        // Action: 2 KiB fails, the retry grows to at least 64 KiB and fits.
        let archive = ContextBuilder::new(ContextStrategy::Memory)
            .initial_capacity(2048)
            .max_retries(1)
            .build(dir.path())
            .unwrap();

        // Assert
        assert_eq!(extract(&archive)["noise.bin"], content);
    }

    #[test]
    fn test_retries_are_bounded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("noise.bin"), noise(1024 * 1024)).unwrap();

        // 2 KiB -> 64 KiB -> 128 KiB, all too small for 1 MiB of noise.
        let err = ContextBuilder::new(ContextStrategy::Memory)
            .initial_capacity(2048)
            .max_retries(2)
            .build(dir.path())
            .unwrap_err();

        assert!(matches!(err, ContextError::BufferExhausted { capacity } if capacity == 128 * 1024));
    }

    #[test]
    fn test_estimated_capacity_fits_incompressible_content() {
        let dir = tempdir().unwrap();
        let content = noise(300 * 1024);
        fs::write(dir.path().join("noise.bin"), &content).unwrap();
        fs::write(dir.path().join("tiny"), "t").unwrap();

        let archive = ContextBuilder::new(ContextStrategy::Memory)
            .max_retries(0)
            .compression_level(0)
            .build(dir.path())
            .unwrap();

        let files = extract(&archive);
        assert_eq!(files["noise.bin"], content);
        assert_eq!(files["tiny"], b"t");
    }

    #[test]
    fn test_temp_file_strategy_leaves_no_files_behind() {
        // Setup: a private staging directory so leftovers are visible.
        let staging = tempdir().unwrap();
        let context = tempdir().unwrap();
        fs::write(context.path().join("Dockerfile"), "FROM scratch").unwrap();
        let builder = ContextBuilder::new(ContextStrategy::TempFile).temp_dir(staging.path());

        // Action & Assert: success path.
        builder.build(context.path()).unwrap();
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);

        // Action & Assert: failure path.
        let err = builder.build(&context.path().join("missing")).unwrap_err();
        assert!(matches!(err, ContextError::Path { .. }));
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    /// Sink that refuses everything after `limit` bytes, without a capacity.
    struct FailingSink {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.written.len() + data.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "upload closed"));
            }
            self.written.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl ArchiveSink for FailingSink {
        fn kind(&self) -> &'static str {
            "failing"
        }

        fn bytes_written(&self) -> u64 {
            self.written.len() as u64
        }

        fn finalize(self) -> Result<Vec<u8>, ContextError> {
            Ok(self.written)
        }
    }

    #[test]
    fn test_build_into_fake_sink() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        let builder = ContextBuilder::new(ContextStrategy::Memory);

        let archive = builder
            .build_into(
                dir.path(),
                FailingSink {
                    written: Vec::new(),
                    limit: usize::MAX,
                },
            )
            .unwrap();
        assert_eq!(extract(&archive)["a.txt"], b"alpha");

        let err = builder
            .build_into(
                dir.path(),
                FailingSink {
                    written: Vec::new(),
                    limit: 4,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ContextError::ArchiveWrite { .. }));
    }

    #[test]
    fn test_from_config() {
        let staging = tempdir().unwrap();
        let config = ContextConfig {
            strategy: ContextStrategy::TempFile,
            compression_level: 3,
            temp_dir: Some(staging.path().to_string_lossy().into_owned()),
            max_retries: 2,
        };
        let builder = ContextBuilder::from_config(&config);
        assert_eq!(builder.selected_strategy(), ContextStrategy::TempFile);
        assert_eq!(builder.compression.level(), 3);
        assert_eq!(builder.temp_dir.as_deref(), Some(staging.path()));
        assert_eq!(builder.max_retries, 2);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(ContextStrategy::Memory.to_string(), "memory");
        assert_eq!(ContextStrategy::TempFile.to_string(), "tempfile");
    }
}
