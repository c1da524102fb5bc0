//! Remote archive retrieval with typed response classification.
//!
//! A [`Fetcher`] performs exactly one GET per call and maps the server's
//! answer onto [`FetchError`]: success yields the raw archive bytes, any
//! status of 500 or above becomes a transient server error, and 404/410
//! are sub-classified from the response body (origin timeout, fetch
//! disabled, or genuinely absent). Retry orchestration is left to the
//! caller.
//!
//! The HTTP transport sits behind the [`HttpClient`] trait; the default
//! `reqwest` feature provides the production implementation.

mod error;
mod fetcher;
mod http;

pub use error::{FetchError, Result};
pub use fetcher::{FetchOptions, Fetcher, ORIGIN_TIMEOUT_MARKER};
pub use http::{BoxStream, HttpClient, HttpResponse};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
