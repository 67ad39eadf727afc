//! The transport seam: one HTTP GET per call.
//!
//! The resolver only talks to a [`Transport`]; [`crate::host::http::HttpTransport`]
//! is the network-backed implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use url::Url;
use webcrawler_core::Credentials;

use crate::error::ConnectionError;

// ============================================================================
// Raw Response
// ============================================================================

/// A response as returned by a transport, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns a header value if present and visible ASCII.
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The declared media type, without parameters.
    pub fn media_type(&self) -> Option<&str> {
        self.header_str(&header::CONTENT_TYPE)
            .and_then(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// The `Retry-After` header in seconds, when it is an integer.
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.header_str(&header::RETRY_AFTER)
            .and_then(|v| v.trim().parse().ok())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Performs a single HTTP GET.
///
/// Implementations must not follow redirects themselves and must fold every
/// socket, DNS or TLS failure into a [`ConnectionError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a GET to `target`, with basic auth when `credentials` is given.
    async fn send(
        &self,
        target: &Url,
        credentials: Option<&Credentials>,
    ) -> Result<RawResponse, ConnectionError>;
}
