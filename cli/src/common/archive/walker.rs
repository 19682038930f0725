//! # Tree Walker (`common::archive::walker`)
//!
//! File: cli/src/common/archive/walker.rs
//!
//! ## Overview
//!
//! Visits every regular file below a context root and hands it to the entry
//! writer under its archive-relative path.
//!
//! ## Architecture
//!
//! Traversal is `walkdir`, configured by `context_walker`:
//!
//! - `min_depth(1)`: the root contributes no entry and no path segment;
//! - `follow_links(false)`: symbolic links are reported, never followed;
//! - `sort_by_file_name()`: each directory level is read whole and visited in
//!   name order, so the same tree always yields the same entry order.
//!
//! `walkdir` keeps its own stack of open directory levels, so deep trees do not
//! grow the call stack. Symbolic links, devices, FIFOs and sockets are skipped.
//! A directory or metadata record that cannot be read fails the walk.
//!
//! Archive paths are the file's path relative to the root, kept as a `PathBuf`
//! so names that are not valid UTF-8 are archived byte-for-byte.
//!
//! The size estimator drives the same walk, so both passes apply one entry
//! policy.
//!
use super::entry::append_file;
use super::session::ArchiveSession;
use super::sink::ArchiveSink;
use crate::core::error::ContextError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// One regular file found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path on disk.
    pub fs_path: PathBuf,
    /// Path inside the archive, relative to the context root. The tar writer
    /// stores it with `/` separators.
    pub archive_path: PathBuf,
    /// Size reported by the directory listing.
    pub size: u64,
}

/// Counters collected by a walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub files: u64,
    /// Directories visited, the root included.
    pub directories: u64,
    pub bytes: u64,
    pub skipped: u64,
}

/// Fails with `ContextError::Path` unless `root` is an existing directory.
pub fn ensure_context_root(root: &Path) -> Result<(), ContextError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ContextError::path(root, "not a directory")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ContextError::path(root, "does not exist"))
        }
        Err(e) => Err(ContextError::io(root, e)),
    }
}

fn context_walker(root: &Path) -> WalkDir {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
}

fn walk_error(root: &Path, err: walkdir::Error) -> ContextError {
    let path = err.path().unwrap_or(root).to_path_buf();
    ContextError::io(path, io::Error::from(err))
}

/// Calls `visit` once for every regular file reachable from `root`.
///
/// # Arguments
///
/// * `root` - The context root. Must be an existing directory.
/// * `visit` - Called with each file's record, in walk order. An `Err` stops
///   the walk and is returned unchanged.
///
/// # Returns
///
/// * `Result<WalkStats, ContextError>` - Counts of files, directories, bytes
///   and skipped entries.
///
/// # Errors
///
/// * `ContextError::Path` - `root` is not an existing directory.
/// * `ContextError::Io` - a directory or metadata record could not be read.
/// * Whatever `visit` returns.
pub fn for_each_file<F>(root: &Path, mut visit: F) -> Result<WalkStats, ContextError>
where
    F: FnMut(&FileRecord) -> Result<(), ContextError>,
{
    ensure_context_root(root)?;
    let mut stats = WalkStats {
        directories: 1,
        ..WalkStats::default()
    };

    for entry_result in context_walker(root) {
        let entry = entry_result.map_err(|e| walk_error(root, e))?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            stats.directories += 1;
            continue;
        }
        if !file_type.is_file() {
            debug!(path = %entry.path().display(), ?file_type, "Skipping non-regular entry");
            stats.skipped += 1;
            continue;
        }

        let metadata = entry.metadata().map_err(|e| walk_error(root, e))?;
        let archive_path = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| ContextError::path(entry.path(), "entry is outside the context root"))?
            .to_path_buf();
        let record = FileRecord {
            fs_path: entry.into_path(),
            archive_path,
            size: metadata.len(),
        };
        visit(&record)?;
        stats.files += 1;
        stats.bytes += record.size;
    }
    Ok(stats)
}

/// Appends every regular file below `root` to the session.
///
/// The root itself contributes no path segment and no entry; directories get
/// no entries of their own.
///
/// # Arguments
///
/// * `session` - The open archive session to append to.
/// * `root` - The context root directory.
///
/// # Returns
///
/// * `Result<WalkStats, ContextError>` - What was archived and skipped.
///
/// # Errors
///
/// Any error from `for_each_file` or `append_file`. The session is left
/// mid-stream on error; the caller must abort it.
#[instrument(skip(session), fields(root = %root.display()))]
pub fn walk_tree<S: ArchiveSink>(
    session: &mut ArchiveSession<S>,
    root: &Path,
) -> Result<WalkStats, ContextError> {
    let stats = for_each_file(root, |record| {
        append_file(session, &record.fs_path, &record.archive_path).map(|_| ())
    })?;
    debug!(
        files = stats.files,
        directories = stats.directories,
        skipped = stats.skipped,
        bytes = stats.bytes,
        "Context tree walked"
    );
    Ok(stats)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn collect(root: &Path) -> (Vec<PathBuf>, WalkStats) {
        let mut seen = Vec::new();
        let stats = for_each_file(root, |record| {
            seen.push(record.archive_path.clone());
            Ok(())
        })
        .unwrap();
        (seen, stats)
    }

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_archive_paths_are_relative() {
        // Setup: a small tree with a nested file and an empty directory.
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Dockerfile"), "FROM scratch").unwrap();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/main.txt"), "hello").unwrap();
        fs::write(root.join("src/nested/deep.txt"), "deep").unwrap();
        fs::create_dir(root.join("empty")).unwrap();

        // Action
        let (seen, stats) = collect(root);

        // Assert: only files, relative to the root, no directory entries.
        assert_eq!(
            seen,
            paths(&["Dockerfile", "src/main.txt", "src/nested/deep.txt"])
        );
        assert!(seen.iter().all(|p| p.is_relative()));
        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 4); // root, empty, src, src/nested
        assert_eq!(stats.bytes, 12 + 5 + 4);
    }

    #[test]
    fn test_entries_follow_name_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("b")).unwrap();
        fs::create_dir(root.join("a")).unwrap();
        fs::write(root.join("b/2"), "").unwrap();
        fs::write(root.join("z"), "").unwrap();
        fs::write(root.join("a/1"), "").unwrap();

        let (seen, _) = collect(root);

        assert_eq!(seen, paths(&["a/1", "b/2", "z"]));
    }

    #[test]
    fn test_deep_tree() {
        let dir = tempdir().unwrap();
        let mut deepest = dir.path().to_path_buf();
        for _ in 0..200 {
            deepest.push("d");
        }
        fs::create_dir_all(&deepest).unwrap();
        fs::write(deepest.join("leaf.txt"), "leaf").unwrap();

        let (seen, stats) = collect(dir.path());

        let mut expected = PathBuf::new();
        for _ in 0..200 {
            expected.push("d");
        }
        expected.push("leaf.txt");
        assert_eq!(seen, vec![expected]);
        assert_eq!(stats.directories, 201);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        // Setup
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("real.txt"), "real").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();
        // A link back to the root would loop forever if followed.
        std::os::unix::fs::symlink(root, root.join("sub/loop")).unwrap();

        // Action
        let (seen, stats) = collect(root);

        // Assert
        assert_eq!(seen, paths(&["real.txt"]));
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.directories, 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_kept_raw() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let name = OsStr::from_bytes(b"lat\xe9n.txt");
        fs::write(dir.path().join(name), "x").unwrap();

        let (seen, _) = collect(dir.path());

        assert_eq!(seen, vec![PathBuf::from(name)]);
    }

    #[test]
    fn test_visitor_error_stops_walk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();
        fs::write(dir.path().join("b"), "").unwrap();

        let mut calls = 0;
        let result = for_each_file(dir.path(), |record| {
            calls += 1;
            Err(ContextError::path(&record.fs_path, "rejected"))
        });

        assert!(matches!(result, Err(ContextError::Path { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_missing_root_is_path_error() {
        let dir = tempdir().unwrap();
        let result = for_each_file(&dir.path().join("missing"), |_| Ok(()));
        assert!(matches!(result, Err(ContextError::Path { .. })));
    }

    #[test]
    fn test_ensure_context_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(ensure_context_root(dir.path()).is_ok());
        assert!(matches!(
            ensure_context_root(&file),
            Err(ContextError::Path { ref reason, .. }) if reason == "not a directory"
        ));
        assert!(matches!(
            ensure_context_root(&dir.path().join("missing")),
            Err(ContextError::Path { ref reason, .. }) if reason == "does not exist"
        ));
    }
}
