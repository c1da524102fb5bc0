use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use http::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::{FetchError, Result};
use crate::http::{HttpClient, HttpResponse};

/// Substring a mirror embeds in a 404/410 body when its own upstream fetch
/// timed out, as opposed to the archive genuinely not existing.
pub const ORIGIN_TIMEOUT_MARKER: &str = "fetch timed out";

/// Configuration for a [`Fetcher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchOptions {
    /// Classify a plain 404/410 as [`FetchError::FetchDisabled`] instead of
    /// [`FetchError::NotFound`]. Set when the caller knows the mirror has
    /// origin fetching turned off, so "missing" really means "not cached".
    pub origin_fetch_disabled: bool,
}

impl FetchOptions {
    pub fn origin_fetch_disabled(mut self, disabled: bool) -> Self {
        self.origin_fetch_disabled = disabled;
        self
    }
}

/// Downloads a remote archive with a single GET and classifies the answer.
///
/// No retries happen here; retry policy belongs to the caller, guided by
/// [`FetchError::is_transient`].
pub struct Fetcher<C: HttpClient> {
    client: C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(client: C, options: FetchOptions) -> Self {
        Self { client, options }
    }

    /// Perform a single GET for `url` and return the archive payload.
    ///
    /// The response is classified before the body is consumed: a 2xx status
    /// buffers the full body and returns it, a status of 500 or above maps
    /// to [`FetchError::Server`], a 404/410 is sub-classified from its body
    /// text, and anything else becomes [`FetchError::UnexpectedStatus`].
    /// The connection is released on every path, including errors:
    /// either the body stream is drained or it is dropped unread.
    ///
    /// Cancelling `cancel` aborts the request or an in-flight body read and
    /// returns [`FetchError::Cancelled`].
    pub async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<Bytes> {
        Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        debug!(url, "requesting archive");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = self.client.get(url) => result.map_err(|source| FetchError::Network {
                url: url.to_string(),
                source: Box::new(source),
            })?,
        };

        let status = response.status;
        if status.is_success() {
            let payload = collect_body(response, url, cancel).await?;
            debug!(url, bytes = payload.len(), "archive downloaded");
            return Ok(payload);
        }

        debug!(url, status = status.as_u16(), "origin returned error status");

        // 404 and 410 need the body text for sub-classification. Every
        // other failure status drops the body unread.
        let body_text = if matches!(status.as_u16(), 404 | 410) {
            let body = collect_body(response, url, cancel).await?;
            String::from_utf8_lossy(&body).into_owned()
        } else {
            String::new()
        };

        Err(classify_failure(status, &body_text, url, &self.options))
    }
}

/// Buffer a response body in full, honoring cancellation per chunk.
async fn collect_body<E>(
    response: HttpResponse<E>,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Bytes>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut body = response.body;
    let mut payload = BytesMut::new();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            chunk = body.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => payload.extend_from_slice(&bytes),
            Some(Err(source)) => {
                return Err(FetchError::Network {
                    url: url.to_string(),
                    source: Box::new(source),
                });
            }
            None => break,
        }
    }

    Ok(payload.freeze())
}

/// Map a non-2xx status, plus the body text for 404/410, onto the error
/// taxonomy. Order matters: a 500-or-above status wins over everything,
/// then the 404/410 sub-classification, then the catch-all.
fn classify_failure(
    status: StatusCode,
    body: &str,
    url: &str,
    options: &FetchOptions,
) -> FetchError {
    // Anything from 500 upward counts, including nonstandard codes past
    // 599 that some origins emit.
    if status.as_u16() >= 500 {
        return FetchError::Server {
            status: status.as_u16(),
        };
    }

    match status.as_u16() {
        404 | 410 => {
            if body.contains(ORIGIN_TIMEOUT_MARKER) {
                FetchError::OriginTimeout {
                    url: url.to_string(),
                }
            } else if options.origin_fetch_disabled {
                FetchError::FetchDisabled {
                    url: url.to_string(),
                }
            } else {
                FetchError::NotFound {
                    url: url.to_string(),
                }
            }
        }
        _ => FetchError::UnexpectedStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        },
    }
}
