//! Whole-pipeline tests driving [`Installer`] against a mock HTTP
//! client, from response bytes to finished trees on disk.

use std::fs;
use std::io::{Cursor, Write};

use bytes::Bytes;
use futures_util::stream;
use http::StatusCode;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use hoist_archive::ExtractError;
use hoist_fetch::{FetchError, Fetcher, HttpClient, HttpResponse};
use hoist_install::{is_installed, ExecLayout, InstallError, Installer};

const URL: &str = "https://mirror.example.com/toolchain/v1.2.3.zip";

#[derive(Debug)]
struct StubError(&'static str);

impl std::fmt::Display for StubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StubError {}

/// Serves a fixed status and body, split into small chunks.
struct StubClient {
    status: StatusCode,
    body: Vec<u8>,
}

impl StubClient {
    fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body,
        }
    }
}

impl HttpClient for StubClient {
    type Error = StubError;

    async fn get(
        &self,
        _url: &str,
    ) -> std::result::Result<HttpResponse<StubError>, StubError> {
        let chunks: Vec<std::result::Result<Bytes, StubError>> = self
            .body
            .chunks(64)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();

        Ok(HttpResponse {
            status: self.status,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

fn layout() -> ExecLayout {
    ExecLayout::new("bin/tool")
        .auxiliary("pkg/helpers")
        .auxiliary("bin/fmt")
}

/// A toolchain archive whose execute bits were stripped in transit.
fn toolchain_archive() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("bin/tool", stored().unix_permissions(0o644))
        .unwrap();
    writer.write_all(b"#!/bin/sh\necho tool\n").unwrap();
    writer
        .start_file("bin/fmt", stored().unix_permissions(0o644))
        .unwrap();
    writer.write_all(b"#!/bin/sh\necho fmt\n").unwrap();
    writer
        .start_file("pkg/helpers/link", stored().unix_permissions(0o600))
        .unwrap();
    writer.write_all(b"helper").unwrap();
    writer.start_file("share/doc.txt", stored()).unwrap();
    writer.write_all(b"docs").unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn installs_and_finalizes_a_remote_archive() {
    let client = StubClient::new(200, toolchain_archive());
    let installer = Installer::new(Fetcher::new(client), layout());

    let tmp = tempdir().unwrap();
    let dest = tmp.path().join("toolchain");
    assert!(!is_installed(&dest, &layout()));

    let tree = installer
        .fetch_and_install(URL, &dest, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(tree.root, dest);
    assert_eq!(tree.files, 4);
    assert_eq!(fs::read(dest.join("share/doc.txt")).unwrap(), b"docs");
    assert!(is_installed(&dest, &layout()));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode_of = |rel: &str| {
            fs::metadata(dest.join(rel))
                .unwrap()
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode_of("bin/tool"), 0o755);
        assert_eq!(mode_of("bin/fmt"), 0o755);
        assert_eq!(mode_of("pkg/helpers/link"), 0o711);
    }
}

#[tokio::test]
async fn origin_timeout_is_a_transient_fetch_error() {
    let client = StubClient::new(404, b"fetch timed out".to_vec());
    let installer = Installer::new(Fetcher::new(client), layout());

    let tmp = tempdir().unwrap();
    let dest = tmp.path().join("toolchain");
    let err = installer
        .fetch_and_install(URL, &dest, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InstallError::Fetch(FetchError::OriginTimeout { .. })
    ));
    assert!(err.is_transient());
    assert!(!dest.exists());
}

#[tokio::test]
async fn corrupt_payload_leaves_no_tree() {
    let client = StubClient::new(200, b"not an archive at all".to_vec());
    let installer = Installer::new(Fetcher::new(client), layout());

    let tmp = tempdir().unwrap();
    let dest = tmp.path().join("toolchain");
    let err = installer
        .fetch_and_install(URL, &dest, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InstallError::Extract(ExtractError::CorruptArchive)
    ));
    assert!(!err.is_transient());
    assert!(!dest.exists());
}

#[tokio::test]
async fn hostile_archive_is_rejected() {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("bin/ok", stored()).unwrap();
    writer.write_all(b"fine").unwrap();
    writer.start_file("../evil.sh", stored()).unwrap();
    writer.write_all(b"#!/bin/sh\n").unwrap();
    let payload = writer.finish().unwrap().into_inner();

    let client = StubClient::new(200, payload);
    let installer = Installer::new(Fetcher::new(client), layout());

    let tmp = tempdir().unwrap();
    let dest = tmp.path().join("inner").join("toolchain");
    let err = installer
        .fetch_and_install(URL, &dest, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InstallError::Extract(ExtractError::PathTraversal { .. })
    ));
    assert!(!err.is_transient());
    assert!(!tmp.path().join("inner").join("evil.sh").exists());
}

#[tokio::test]
async fn pre_cancelled_install_touches_nothing() {
    let client = StubClient::new(200, toolchain_archive());
    let installer = Installer::new(Fetcher::new(client), layout());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let tmp = tempdir().unwrap();
    let dest = tmp.path().join("toolchain");
    let err = installer
        .fetch_and_install(URL, &dest, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::Fetch(FetchError::Cancelled)));
    assert!(!dest.exists());
}
