//! # Archive Session (`common::archive::session`)
//!
//! File: cli/src/common/archive/session.rs
//!
//! ## Overview
//!
//! An `ArchiveSession` is an open ustar writer whose output runs through a gzip
//! encoder into an `ArchiveSink`:
//!
//! ```text
//! tar::Builder  ->  flate2::write::GzEncoder  ->  ArchiveSink
//! ```
//!
//! `close` consumes the session, so nothing can be appended after the trailer is
//! written. A session that is dropped (or `abort`ed) without `close` simply
//! releases its encoder and sink.
//!
//! Write failures are classified here: if the sink reports that it ran out of
//! capacity the failure becomes `ContextError::BufferExhausted`, otherwise
//! `ContextError::ArchiveWrite`.
//!
use super::sink::ArchiveSink;
use crate::core::error::ContextError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read};
use std::path::Path;
use tar::{Builder, Header, HeaderMode};
use tracing::{debug, trace};

/// Label used when the tar trailer or gzip footer cannot be written.
const TRAILER: &str = "<archive trailer>";

/// Open ustar + gzip writer over a sink.
pub struct ArchiveSession<S: ArchiveSink> {
    builder: Builder<GzEncoder<S>>,
    entries: usize,
}

impl<S: ArchiveSink> ArchiveSession<S> {
    /// Opens a session. Nothing is written to the sink until the first entry.
    pub fn open(sink: S, compression: Compression) -> Self {
        debug!(
            sink = sink.kind(),
            level = compression.level(),
            "Opening archive session (ustar, gzip)"
        );
        let mut builder = Builder::new(GzEncoder::new(sink, compression));
        builder.mode(HeaderMode::Complete);
        builder.follow_symlinks(false);
        ArchiveSession {
            builder,
            entries: 0,
        }
    }

    /// Number of entries appended so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn sink(&self) -> &S {
        self.builder.get_ref().get_ref()
    }

    /// Writes one entry: `header` (path and checksum filled in here) followed by `data`.
    ///
    /// Returns the raw I/O error so the caller can tell source-read failures
    /// apart from archive-write failures.
    pub(crate) fn append<R: Read>(
        &mut self,
        header: &mut Header,
        archive_path: &Path,
        data: R,
    ) -> io::Result<()> {
        self.builder.append_data(header, archive_path, data)?;
        self.entries += 1;
        trace!(archive_path = %archive_path.display(), entries = self.entries, "Appended archive entry");
        Ok(())
    }

    /// Maps a failed write on this session to the archiver's error taxonomy.
    pub(crate) fn write_error(&self, archive_path: &Path, source: io::Error) -> ContextError {
        classify_write_error(self.sink(), &archive_path.display().to_string(), source)
    }

    /// Writes the tar trailer and gzip footer, then returns the sink.
    pub fn close(self) -> Result<S, ContextError> {
        let ArchiveSession {
            mut builder,
            entries,
        } = self;
        builder
            .finish()
            .map_err(|e| classify_write_error(builder.get_ref().get_ref(), TRAILER, e))?;
        let mut encoder = builder.into_inner().map_err(|e| ContextError::ArchiveWrite {
            path: TRAILER.to_string(),
            source: e,
        })?;
        encoder
            .try_finish()
            .map_err(|e| classify_write_error(encoder.get_ref(), TRAILER, e))?;
        let sink = encoder.finish().map_err(|e| ContextError::ArchiveWrite {
            path: TRAILER.to_string(),
            source: e,
        })?;
        debug!(
            entries,
            bytes = sink.bytes_written(),
            sink = sink.kind(),
            "Archive session closed"
        );
        Ok(sink)
    }

    /// Abandons the session after a failure, releasing encoder and sink.
    pub fn abort(self) {
        debug!(
            entries = self.entries,
            sink = self.sink().kind(),
            "Aborting archive session"
        );
        drop(self);
    }
}

fn classify_write_error<S: ArchiveSink>(
    sink: &S,
    archive_path: &str,
    source: io::Error,
) -> ContextError {
    match sink.capacity() {
        Some(capacity) if sink.is_exhausted() => ContextError::BufferExhausted { capacity },
        _ => ContextError::ArchiveWrite {
            path: archive_path.to_string(),
            source,
        },
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::sink::MemorySink;
    use flate2::read::GzDecoder;
    use tar::Archive;

    fn header_for(data: &[u8]) -> Header {
        let mut header = Header::new_ustar();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header
    }

    #[test]
    fn test_empty_session_is_valid_archive() {
        let session = ArchiveSession::open(MemorySink::with_capacity(4096).unwrap(), Compression::default());
        let bytes = session.close().unwrap().finalize().unwrap();

        assert_eq!(&bytes[..2], &[0x1f, 0x8b]); // gzip magic
        let mut archive = Archive::new(GzDecoder::new(bytes.as_slice()));
        assert_eq!(archive.entries().unwrap().count(), 0);
    }

    #[test]
    fn test_session_counts_entries() {
        let mut session =
            ArchiveSession::open(MemorySink::with_capacity(8192).unwrap(), Compression::fast());
        let data = b"payload";
        session
            .append(&mut header_for(data), Path::new("a/b.txt"), &data[..])
            .unwrap();
        assert_eq!(session.entries(), 1);

        let bytes = session.close().unwrap().finalize().unwrap();
        let mut archive = Archive::new(GzDecoder::new(bytes.as_slice()));
        let paths: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, vec!["a/b.txt"]);
    }

    #[test]
    fn test_close_reports_buffer_exhausted() {
        // Too small even for the gzip header and the tar trailer.
        let session = ArchiveSession::open(MemorySink::with_capacity(4).unwrap(), Compression::default());
        let err = session.close().unwrap_err();
        assert!(matches!(err, ContextError::BufferExhausted { capacity: 4 }));
    }
}
