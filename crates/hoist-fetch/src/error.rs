//! Error types for hoist-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("network failure fetching '{url}': {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("origin reported a timeout for '{url}'")]
    OriginTimeout { url: String },

    #[error("archive not found at '{url}'")]
    NotFound { url: String },

    #[error("'{url}' is not cached and fetching from origin is disabled")]
    FetchDisabled { url: String },

    #[error("unexpected HTTP status {status} {reason}")]
    UnexpectedStatus { status: u16, reason: String },

    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether a later retry of the same request could reasonably succeed.
    ///
    /// Only server-side failures qualify. Everything else is either
    /// permanent for this URL or must not be retried blindly.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::OriginTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
