use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor};
use std::path::Path;

use tracing::debug;

use crate::error::{ExtractError, FsOp, Result};
use crate::report::InstalledTree;
use crate::sanitize::sanitize_path;

/// Unpack a ZIP payload beneath `destination`.
///
/// The payload is decoded before any filesystem mutation, so a corrupt or
/// truncated archive leaves no trace on disk, not even the destination
/// root. Entries are placed in the archive's stored order; the first entry
/// that resolves outside `destination` aborts the whole extraction with
/// [`ExtractError::PathTraversal`], leaving already-placed entries behind
/// for the caller to decide about.
///
/// Stored Unix mode bits are applied when each file is created. Execute
/// bits lost in transit are the business of
/// [`ensure_executable`](crate::ensure_executable), which runs after
/// extraction, not per entry.
pub fn extract(payload: &[u8], destination: &Path) -> Result<InstalledTree> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(payload)).map_err(|_| ExtractError::CorruptArchive)?;

    fs::create_dir_all(destination).map_err(|source| ExtractError::Filesystem {
        op: FsOp::CreateDir,
        path: destination.to_path_buf(),
        source,
    })?;

    let mut tree = InstalledTree::new(destination);

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|_| ExtractError::CorruptArchive)?;

        let sanitized = sanitize_path(entry.name(), destination)?;
        let target = sanitized.resolved;

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|source| ExtractError::Filesystem {
                op: FsOp::CreateDir,
                path: target.clone(),
                source,
            })?;
            tree.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ExtractError::Filesystem {
                op: FsOp::CreateDir,
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut out = open_target(&target, entry.unix_mode())?;
        let written = io::copy(&mut entry, &mut out).map_err(|source| ExtractError::Filesystem {
            op: FsOp::Write,
            path: target.clone(),
            source,
        })?;

        tree.files += 1;
        tree.bytes += written;
        // Both the entry reader and the output handle drop here, before
        // the next entry is opened.
    }

    debug!(
        destination = %destination.display(),
        files = tree.files,
        directories = tree.directories,
        bytes = tree.bytes,
        "archive extracted",
    );

    Ok(tree)
}

/// Create or truncate `target`, applying the entry's stored mode bits at
/// creation time on Unix. A pre-existing file keeps its current bits.
fn open_target(target: &Path, mode: Option<u32>) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    if let Some(mode) = mode {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o777);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(target).map_err(|source| ExtractError::Filesystem {
        op: FsOp::CreateFile,
        path: target.to_path_buf(),
        source,
    })
}
