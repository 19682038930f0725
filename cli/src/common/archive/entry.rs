//! # Entry Writer (`common::archive::entry`)
//!
//! File: cli/src/common/archive/entry.rs
//!
//! ## Overview
//!
//! Appends a single regular file to an open `ArchiveSession`: one ustar header
//! built from the opened file's metadata, followed by exactly `size` bytes of
//! content.
//!
//! The size in the header is fixed before any content is copied, so the copy is
//! bounded by it. A file that grows while being archived contributes only its
//! first `size` bytes; a file that shrinks fails the entry with an I/O error
//! rather than producing a short, corrupt entry.
//!
use super::session::ArchiveSession;
use super::sink::ArchiveSink;
use crate::core::error::ContextError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tar::{EntryType, Header, HeaderMode};
use tracing::trace;

/// Appends `fs_path` to the session as `archive_path`.
///
/// The header comes from the metadata of the opened handle, so size and mode
/// describe the same file whose bytes are copied.
///
/// # Arguments
///
/// * `session` - The open archive session.
/// * `fs_path` - The regular file on disk.
/// * `archive_path` - Relative path the entry gets inside the archive.
///
/// # Returns
///
/// * `Result<u64, ContextError>` - The entry's content size in bytes.
///
/// # Errors
///
/// * `ContextError::Io` - the file cannot be opened, stat'ed, or read in full.
/// * `ContextError::ArchiveWrite` / `ContextError::BufferExhausted` - the archive
///   layer rejected the header or data.
///
/// On failure the session is left mid-entry; the caller must abort it.
pub fn append_file<S: ArchiveSink>(
    session: &mut ArchiveSession<S>,
    fs_path: &Path,
    archive_path: &Path,
) -> Result<u64, ContextError> {
    let file = File::open(fs_path).map_err(|e| ContextError::io(fs_path, e))?;
    let metadata = file.metadata().map_err(|e| ContextError::io(fs_path, e))?;
    let size = metadata.len();

    let mut header = Header::new_ustar();
    header.set_metadata_in_mode(&metadata, HeaderMode::Complete);
    header.set_entry_type(EntryType::Regular);
    header.set_size(size);

    let mut source = BoundedSource::new(file, size);
    match session.append(&mut header, archive_path, &mut source) {
        Ok(()) => {
            trace!(archive_path = %archive_path.display(), size, "Archived file");
            Ok(size)
        }
        Err(e) if source.failed => Err(ContextError::io(fs_path, e)),
        Err(e) => Err(session.write_error(archive_path, e)),
    }
}

/// Reader yielding exactly `remaining` bytes of `inner`, remembering whether
/// the source side failed.
struct BoundedSource<R> {
    inner: R,
    remaining: u64,
    failed: bool,
}

impl<R: Read> BoundedSource<R> {
    fn new(inner: R, size: u64) -> Self {
        BoundedSource {
            inner,
            remaining: size,
            failed: false,
        }
    }
}

impl<R: Read> Read for BoundedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        match self.inner.read(&mut buf[..max]) {
            Ok(0) => {
                self.failed = true;
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "file shrank while being archived ({} bytes missing)",
                        self.remaining
                    ),
                ))
            }
            Ok(n) => {
                self.remaining -= n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }
}
