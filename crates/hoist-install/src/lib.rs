//! Installation of toolchain trees from remote ZIP archives.
//!
//! [`Installer`] composes the `hoist-fetch` download path with the
//! `hoist-archive` extraction and finalization path: fetch the payload,
//! decode and place it under a destination with containment checks, then
//! restore execute bits entry point last. [`install_root`] resolves where
//! those trees live and [`is_installed`] probes for a finished one.

mod dir;
mod error;
mod pipeline;

pub use dir::install_root;
pub use error::{InstallError, Result};
pub use pipeline::{is_installed, Installer};

pub use hoist_archive::{ExecLayout, InstalledTree};
pub use hoist_fetch::{FetchOptions, Fetcher};
