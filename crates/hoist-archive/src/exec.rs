use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ExtractError, FsOp, Result};

/// Which files in an installed tree must end up executable, and in what
/// order.
///
/// `entry_point` is the file, relative to the tree root, whose execute bit
/// concurrent installers treat as the "installation complete" signal.
/// `auxiliary` paths (directories or single files, also root-relative) are
/// the tools that must already be runnable by the time that signal
/// appears, so finalization touches them first and the entry point last.
#[derive(Clone, Debug)]
pub struct ExecLayout {
    pub entry_point: PathBuf,
    pub auxiliary: Vec<PathBuf>,
}

impl ExecLayout {
    pub fn new(entry_point: impl Into<PathBuf>) -> Self {
        Self {
            entry_point: entry_point.into(),
            auxiliary: Vec::new(),
        }
    }

    pub fn auxiliary(mut self, path: impl Into<PathBuf>) -> Self {
        self.auxiliary.push(path.into());
        self
    }
}

/// Ordered list of files produced by [`plan`] and applied by
/// [`ExecPlan::apply`]. Kept separate so the ordering is observable
/// without touching the filesystem.
#[derive(Clone, Debug, Default)]
pub struct ExecPlan {
    pub steps: Vec<PathBuf>,
}

impl ExecPlan {
    /// Set execute bits on every step, in order, preserving each file's
    /// read and write bits.
    pub fn apply(&self) -> Result<()> {
        for step in &self.steps {
            set_exec_bit(step)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Compute the ordered finalization steps for the tree at `root`.
///
/// Regular files under the layout's auxiliary paths come first, then every
/// remaining regular file in the tree, each listed once. The entry point
/// is always the final step. Missing auxiliary paths are skipped; on
/// platforms without Unix permission bits the plan is empty.
pub fn plan(root: &Path, layout: &ExecLayout) -> Result<ExecPlan> {
    if cfg!(not(unix)) {
        return Ok(ExecPlan::default());
    }

    let entry_point = root.join(&layout.entry_point);
    let mut steps = Vec::new();

    for auxiliary in &layout.auxiliary {
        collect_regular_files(&root.join(auxiliary), &mut steps)?;
    }
    collect_regular_files(root, &mut steps)?;

    let mut seen = HashSet::new();
    steps.retain(|path| path != &entry_point && seen.insert(path.clone()));

    if entry_point.is_file() {
        steps.push(entry_point);
    }

    Ok(ExecPlan { steps })
}

/// Restore execute bits across the tree at `root` if its entry point
/// lacks one.
///
/// Returns the plan that was applied, which is empty when the entry point
/// is already executable. Running this twice on the same tree leaves the
/// second run with nothing to do.
pub fn ensure_executable(root: &Path, layout: &ExecLayout) -> Result<ExecPlan> {
    let entry_point = root.join(&layout.entry_point);
    if entry_point_is_executable(&entry_point)? {
        debug!(entry_point = %entry_point.display(), "execute bits already set");
        return Ok(ExecPlan::default());
    }

    let plan = plan(root, layout)?;
    plan.apply()?;
    debug!(root = %root.display(), steps = plan.len(), "execute bits restored");
    Ok(plan)
}

fn collect_regular_files(path: &Path, steps: &mut Vec<PathBuf>) -> Result<()> {
    // An auxiliary path may simply not exist in a given archive.
    if !path.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|source| walk_error(path, source))?;
        if entry.file_type().is_file() {
            steps.push(entry.path().to_path_buf());
        }
    }

    Ok(())
}

fn walk_error(root: &Path, source: walkdir::Error) -> ExtractError {
    let path = source
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = source
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));

    ExtractError::Filesystem {
        op: FsOp::Walk,
        path,
        source,
    }
}

#[cfg(unix)]
fn entry_point_is_executable(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(|source| ExtractError::Filesystem {
        op: FsOp::Inspect,
        path: path.to_path_buf(),
        source,
    })?;

    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn entry_point_is_executable(_path: &Path) -> Result<bool> {
    Ok(true)
}

#[cfg(unix)]
fn set_exec_bit(path: &Path) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ExtractError::Filesystem {
        op: FsOp::Inspect,
        path: path.to_path_buf(),
        source,
    })?;

    let mode = metadata.permissions().mode() & 0o777 | 0o111;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        ExtractError::Filesystem {
            op: FsOp::SetPermissions,
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_exec_bit(_path: &Path) -> Result<()> {
    Ok(())
}
