//! End-to-end installation: one fetched archive becomes one finished
//! tree on disk.

use std::path::Path;

use hoist_archive::{ensure_executable, extract, ExecLayout, InstalledTree};
use hoist_fetch::{Fetcher, HttpClient};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::Result;

/// Drives a single archive from origin URL to installed tree.
pub struct Installer<C: HttpClient> {
    fetcher: Fetcher<C>,
    layout: ExecLayout,
}

impl<C: HttpClient> Installer<C> {
    pub fn new(fetcher: Fetcher<C>, layout: ExecLayout) -> Self {
        Self { fetcher, layout }
    }

    /// Download the archive at `url` and install it beneath `destination`.
    ///
    /// The payload stays in memory until it decodes cleanly, so a failed
    /// download or a corrupt archive leaves nothing on disk. Extraction
    /// refuses entries that resolve outside `destination`; afterwards
    /// execute bits are restored with the layout's entry point touched
    /// last.
    ///
    /// The returned error tells the caller whether a retry is worthwhile
    /// via [`InstallError::is_transient`](crate::InstallError::is_transient).
    pub async fn fetch_and_install(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<InstalledTree> {
        info!(url, destination = %destination.display(), "installing archive");

        let payload = self.fetcher.fetch(url, cancel).await?;
        let tree = extract(&payload, destination)?;
        ensure_executable(destination, &self.layout)?;

        info!(
            destination = %destination.display(),
            files = tree.files,
            bytes = tree.bytes,
            "archive installed",
        );
        Ok(tree)
    }
}

/// Whether an installation is already present at `destination`, judged by
/// the layout's entry point existing there as a regular file.
pub fn is_installed(destination: &Path, layout: &ExecLayout) -> bool {
    destination.join(&layout.entry_point).is_file()
}
