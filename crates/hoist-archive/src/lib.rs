//! Contained extraction of ZIP payloads plus ordered execute-bit
//! finalization for the resulting tree.
//!
//! - [`extract`] decodes an in-memory archive into a destination
//!   directory, refusing any entry that would resolve outside it.
//! - [`sanitize_path`] is that containment check on its own.
//! - [`ensure_executable`] restores execute bits lost in transit, leaving
//!   the tree's entry point for last so a visible entry point always
//!   means a finished installation.
//! - [`InstalledTree`] summarizes what an extraction wrote.

mod error;
mod exec;
mod extract;
mod report;
mod sanitize;

pub use error::{ExtractError, FsOp, Result};
pub use exec::{ensure_executable, plan, ExecLayout, ExecPlan};
pub use extract::extract;
pub use report::InstalledTree;
pub use sanitize::{sanitize_path, SanitizedPath};
