//! HTTP transport backed by reqwest.
//!
//! The client is configured so the resolver sees every response as the
//! server sent it:
//! - redirects are never followed automatically
//! - certificates are verified for `https` targets
//! - every client error is folded into a [`ConnectionError`]

use async_trait::async_trait;
use reqwest::{Client, redirect};
use tracing::{debug, instrument};
use url::Url;
use webcrawler_core::{CrawlerSettings, Credentials};

use crate::error::{ConnectionError, FetchError};
use crate::transport::{RawResponse, Transport};

// ============================================================================
// HTTP Transport
// ============================================================================

/// Sends one GET per call over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    /// Creates a transport using the timeout and user agent from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the TLS backend cannot be
    /// initialised.
    pub fn new(settings: &CrawlerSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(settings.delays.timeout)
            .user_agent(settings.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { inner: client })
    }

    /// Wraps an existing client. The client must not follow redirects.
    pub fn with_client(client: Client) -> Self {
        Self { inner: client }
    }

    /// Returns the inner reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, target, credentials), fields(url = %target, auth = credentials.is_some()))]
    async fn send(
        &self,
        target: &Url,
        credentials: Option<&Credentials>,
    ) -> Result<RawResponse, ConnectionError> {
        let mut request = self.inner.get(target.clone());
        if let Some(credentials) = credentials {
            request = request.basic_auth(
                credentials.username(),
                Some(credentials.password().expose()),
            );
        }

        debug!("GET request");
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!(status = %status, bytes = body.len(), "Response received");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_default_settings() {
        assert!(HttpTransport::new(&CrawlerSettings::default()).is_ok());
    }
}
