use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("archive is corrupted")]
    CorruptArchive,

    #[error("path traversal detected: entry '{entry}' resolves to '{resolved}'")]
    PathTraversal { entry: PathBuf, resolved: PathBuf },

    #[error("failed to {op} '{path}': {source}")]
    Filesystem {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The filesystem operation that was being attempted when a
/// [`ExtractError::Filesystem`] occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FsOp {
    CreateDir,
    CreateFile,
    Write,
    Walk,
    Inspect,
    SetPermissions,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CreateDir => "create directory",
            Self::CreateFile => "create file",
            Self::Write => "write",
            Self::Walk => "walk",
            Self::Inspect => "inspect",
            Self::SetPermissions => "set permissions on",
        };
        f.write_str(label)
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
