//! # Archive Sinks (`common::archive::sink`)
//!
//! File: cli/src/common/archive/sink.rs
//!
//! ## Overview
//!
//! An `ArchiveSink` is where the compressed archive bytes end up. Two sinks exist:
//!
//! - **`MemorySink`**: a buffer allocated once with a fixed capacity. It never
//!   reallocates; a write that does not fit is refused and the sink remembers
//!   that it ran out of space, so the session can report `BufferExhausted`.
//! - **`TempFileSink`**: a uniquely named staging file (`tempfile::NamedTempFile`).
//!   `finalize` reads it back into memory and removes it; dropping the sink on
//!   any error path removes it as well.
//!
//! The context builder is generic over the trait, so tests can hand it fakes.
//!
use crate::core::error::ContextError;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// File name prefix of staging files.
pub const TEMP_FILE_PREFIX: &str = "dockrs-context-";
/// File name suffix of staging files.
pub const TEMP_FILE_SUFFIX: &str = ".tar.gz";

/// Destination of the compressed archive stream.
pub trait ArchiveSink: Write {
    /// Short label used in log records.
    fn kind(&self) -> &'static str;

    /// Bytes accepted so far.
    fn bytes_written(&self) -> u64;

    /// Fixed capacity, for sinks that have one.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// True once a write has been refused for lack of capacity.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Consumes the sink and hands back the complete archive.
    fn finalize(self) -> Result<Vec<u8>, ContextError>
    where
        Self: Sized;
}

/// Fixed-capacity in-memory sink.
#[derive(Debug)]
pub struct MemorySink {
    buf: Vec<u8>,
    capacity: usize,
    exhausted: bool,
}

impl MemorySink {
    /// Allocates the whole buffer up front.
    ///
    /// Fails with `OutOfMemory` instead of aborting when the allocation cannot be made.
    pub fn with_capacity(capacity: usize) -> io::Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity).map_err(|e| {
            io::Error::new(
                io::ErrorKind::OutOfMemory,
                format!("cannot allocate {} byte context buffer: {}", capacity, e),
            )
        })?;
        trace!(capacity, "Allocated in-memory context buffer");
        Ok(MemorySink {
            buf,
            capacity,
            exhausted: false,
        })
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if data.len() > self.remaining() {
            self.exhausted = true;
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!(
                    "in-memory context buffer full ({} of {} bytes used, {} more requested)",
                    self.buf.len(),
                    self.capacity,
                    data.len()
                ),
            ));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ArchiveSink for MemorySink {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn bytes_written(&self) -> u64 {
        self.buf.len() as u64
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn finalize(self) -> Result<Vec<u8>, ContextError> {
        debug!(
            used = self.buf.len(),
            capacity = self.capacity,
            "In-memory context buffer finalized"
        );
        Ok(self.buf)
    }
}

/// Staging-file sink. The file is deleted when the sink is finalized or dropped.
#[derive(Debug)]
pub struct TempFileSink {
    writer: BufWriter<NamedTempFile>,
    path: PathBuf,
    written: u64,
}

impl TempFileSink {
    /// Creates a uniquely named staging file in `dir`, or in the system temp dir.
    pub fn create(dir: Option<&Path>) -> Result<Self, ContextError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(TEMP_FILE_SUFFIX);
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| {
            let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
            ContextError::io(dir, e)
        })?;
        let path = file.path().to_path_buf();
        debug!(path = %path.display(), "Created context staging file");
        Ok(TempFileSink {
            writer: BufWriter::new(file),
            path,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for TempFileSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(data)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl ArchiveSink for TempFileSink {
    fn kind(&self) -> &'static str {
        "tempfile"
    }

    fn bytes_written(&self) -> u64 {
        self.written
    }

    fn finalize(self) -> Result<Vec<u8>, ContextError> {
        let TempFileSink {
            writer,
            path,
            written,
        } = self;
        let mut file = writer
            .into_inner()
            .map_err(|e| ContextError::io(&path, e.into_error()))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| ContextError::io(&path, e))?;

        let mut archive = Vec::with_capacity(usize::try_from(written).unwrap_or(0));
        file.read_to_end(&mut archive)
            .map_err(|e| ContextError::io(&path, e))?;
        if archive.len() as u64 != written {
            return Err(ContextError::io(
                &path,
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "staging file holds {} bytes, {} were written",
                        archive.len(),
                        written
                    ),
                ),
            ));
        }

        file.close().map_err(|e| ContextError::io(&path, e))?;
        debug!(path = %path.display(), bytes = archive.len(), "Context staging file read back and removed");
        Ok(archive)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_sink_accepts_up_to_capacity() {
        let mut sink = MemorySink::with_capacity(8).unwrap();
        sink.write_all(b"12345678").unwrap();
        assert_eq!(sink.remaining(), 0);
        assert!(!sink.is_exhausted());
        assert_eq!(sink.finalize().unwrap(), b"12345678");
    }

    #[test]
    fn test_memory_sink_refuses_overflow() {
        let mut sink = MemorySink::with_capacity(4).unwrap();
        sink.write_all(b"abc").unwrap();
        let err = sink.write_all(b"de").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert!(sink.is_exhausted());
        assert_eq!(sink.bytes_written(), 3); // nothing past capacity was stored
        assert_eq!(sink.capacity(), Some(4));
    }

    #[test]
    fn test_temp_file_sink_reads_back_and_removes_file() {
        let dir = tempdir().unwrap();
        let mut sink = TempFileSink::create(Some(dir.path())).unwrap();
        let path = sink.path().to_path_buf();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(TEMP_FILE_PREFIX));
        assert!(name.ends_with(TEMP_FILE_SUFFIX));

        sink.write_all(b"archive bytes").unwrap();
        assert_eq!(sink.bytes_written(), 13);
        let bytes = sink.finalize().unwrap();

        assert_eq!(bytes, b"archive bytes");
        assert!(!path.exists());
    }

    #[test]
    fn test_dropped_temp_file_sink_removes_file() {
        let dir = tempdir().unwrap();
        let path = {
            let mut sink = TempFileSink::create(Some(dir.path())).unwrap();
            sink.write_all(b"partial").unwrap();
            sink.path().to_path_buf()
        };
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_temp_file_sink_names_are_unique() {
        let dir = tempdir().unwrap();
        let a = TempFileSink::create(Some(dir.path())).unwrap();
        let b = TempFileSink::create(Some(dir.path())).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_temp_file_sink_missing_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = TempFileSink::create(Some(&missing)).unwrap_err();
        assert!(matches!(err, ContextError::Io { path, .. } if path == missing));
    }
}
