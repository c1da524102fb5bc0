use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use http::StatusCode;

/// Boxed byte stream used for response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// An HTTP response split into its status line and body stream.
///
/// The status is available before a single body byte has been read, so the
/// caller can decide whether the body is worth downloading at all. Dropping
/// the response with the body unread releases the underlying connection.
pub struct HttpResponse<E> {
    pub status: StatusCode,
    pub body: BoxStream<'static, std::result::Result<Bytes, E>>,
}

/// Transport seam for issuing GET requests.
///
/// A client hands back an [`HttpResponse`] once the status line is
/// available, with the body still unconsumed. The caller classifies the
/// status first and decides what the body is worth; dropping the response
/// unread releases the connection. Redirect policy, timeouts, and
/// transport-error mapping live inside the implementation.
///
/// The default `reqwest` feature provides [`ReqwestClient`]; tests fake
/// the seam with in-memory clients.
pub trait HttpClient: Send + Sync {
    /// Transport-level failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a single GET request for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was obtained at all (DNS
    /// failure, refused connection, TLS handshake failure). A response
    /// with a non-success status is returned as `Ok`; interpreting the
    /// status is the caller's concern.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// [`HttpClient`] backed by a [`reqwest::Client`].
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Client with reqwest's default pool and TLS configuration.
        pub fn new() -> Self {
            Self {
                client: reqwest::Client::new(),
            }
        }
    }

    impl Default for ReqwestClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
        ) -> std::result::Result<HttpResponse<Self::Error>, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            Ok(HttpResponse {
                status,
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
