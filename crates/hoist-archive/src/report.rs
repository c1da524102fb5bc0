use std::path::PathBuf;

/// Summary of an extraction beneath a destination root.
///
/// Counts cover what this extraction wrote, not what else may already
/// live under `root`.
#[derive(Clone, Debug)]
pub struct InstalledTree {
    pub root: PathBuf,
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

impl InstalledTree {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: 0,
            directories: 0,
            bytes: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files == 0 && self.directories == 0
    }
}
