use std::path::{Component, Path, PathBuf};

use crate::error::{ExtractError, Result};

/// Result of resolving an archive entry path against a destination root.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an entry's stored path against the destination root.
///
/// The entry path is joined to `base` before `.` and `..` segments are
/// collapsed, so leading parent-dir segments walk out of the base prefix
/// and fail the containment check instead of being silently clamped.
/// Absolute entry paths are rejected outright.
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(entry_path: P, base: B) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();

    let normalized_entry = normalize_path(entry_path);
    if normalized_entry.is_absolute() {
        return Err(ExtractError::PathTraversal {
            entry: entry_path.to_path_buf(),
            resolved: normalized_entry,
        });
    }

    let base = normalize_path(base.as_ref());
    let resolved = normalize_path(&base.join(entry_path));

    // The base must be a strict ancestor: an entry resolving to the base
    // itself is as illegal as one resolving outside it.
    if resolved == base || !resolved.starts_with(&base) {
        return Err(ExtractError::PathTraversal {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved,
    })
}

/// Normalize path separators and resolve relative components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push("/"),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
