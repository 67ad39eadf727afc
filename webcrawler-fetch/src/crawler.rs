//! The public fetch facade.
//!
//! A [`Crawler`] owns a [`ResponseResolver`] and a [`DecoderRegistry`].
//! `fetch` resolves one URL to a terminal response and decodes its body by
//! media subtype.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;
use webcrawler_core::CrawlerSettings;

use crate::clock::{Clock, TokioClock};
use crate::decode::{DecodedContent, DecoderRegistry};
use crate::error::FetchError;
use crate::host::http::HttpTransport;
use crate::resolver::{Resolution, ResponseResolver};
use crate::transport::Transport;

// ============================================================================
// Fetch Options
// ============================================================================

/// Per-call options for [`Crawler::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Send credentials on the first attempt.
    pub use_auth: bool,
    /// Wait the configured request delay before the first attempt.
    pub apply_delay: bool,
}

impl FetchOptions {
    /// Sends credentials from the first attempt on.
    pub fn with_auth(mut self) -> Self {
        self.use_auth = true;
        self
    }

    /// Skips the initial request delay.
    pub fn without_delay(mut self) -> Self {
        self.apply_delay = false;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_auth: false,
            apply_delay: true,
        }
    }
}

// ============================================================================
// Crawler
// ============================================================================

/// Fetches single resources and decodes them.
///
/// A crawler holds only read-only configuration, so one instance can serve
/// any number of concurrent fetches.
#[derive(Debug)]
pub struct Crawler {
    resolver: ResponseResolver,
    decoders: DecoderRegistry,
}

impl Crawler {
    /// Creates a crawler with the HTTP transport and standard decoders.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the HTTP client cannot
    /// be built.
    pub fn new(settings: CrawlerSettings) -> Result<Self, FetchError> {
        Self::builder(settings).build()
    }

    /// Creates a builder for swapping the transport, clock or decoders.
    pub fn builder(settings: CrawlerSettings) -> CrawlerBuilder {
        CrawlerBuilder::new(settings)
    }

    /// The decoder table in use.
    pub fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    /// Fetches `url` with default options: no initial auth, delay applied.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn get(&self, url: &str) -> Result<DecodedContent, FetchError> {
        self.fetch(url, FetchOptions::default()).await
    }

    /// Fetches and decodes `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Connection`], [`FetchError::Credentials`] or
    /// [`FetchError::Unresolvable`] from resolution, or [`FetchError::Decode`]
    /// if the body does not parse as its declared type.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<DecodedContent, FetchError> {
        self.fetch_with_cancel(url, options, &CancellationToken::new())
            .await
    }

    /// Like [`fetch`](Self::fetch), aborting with [`FetchError::Cancelled`]
    /// once `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    #[instrument(skip(self, url, cancel), fields(url = %url))]
    pub async fn fetch_with_cancel(
        &self,
        url: &str,
        options: FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<DecodedContent, FetchError> {
        let resolution = self.resolve(url, options, cancel).await?;
        debug!(
            final_url = %resolution.url,
            attempts = resolution.attempts,
            media_type = ?resolution.media_type,
            "Resolved"
        );

        Ok(self
            .decoders
            .decode(resolution.body, resolution.media_type.as_deref())?)
    }

    /// Resolves `url` without decoding the body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for a non-absolute URL, otherwise
    /// the resolver's errors.
    pub async fn resolve(
        &self,
        url: &str,
        options: FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<Resolution, FetchError> {
        let target = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        self.resolver
            .resolve(target, options.use_auth, options.apply_delay, cancel)
            .await
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Crawler`].
pub struct CrawlerBuilder {
    settings: CrawlerSettings,
    transport: Option<Arc<dyn Transport>>,
    clock: Arc<dyn Clock>,
    decoders: DecoderRegistry,
}

impl CrawlerBuilder {
    /// Starts from `settings` with the real clock and standard decoders.
    pub fn new(settings: CrawlerSettings) -> Self {
        Self {
            settings,
            transport: None,
            clock: Arc::new(TokioClock),
            decoders: DecoderRegistry::standard(),
        }
    }

    /// Uses `transport` instead of [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses `clock` for all waits.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the decoder table.
    pub fn decoders(mut self, decoders: DecoderRegistry) -> Self {
        self.decoders = decoders;
        self
    }

    /// Validates the settings and builds the crawler.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Core`] for invalid settings or
    /// [`FetchError::ClientBuild`] if the default transport cannot be built.
    pub fn build(self) -> Result<Crawler, FetchError> {
        self.settings.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.settings)?),
        };

        let resolver = ResponseResolver::new(
            transport,
            self.clock,
            self.settings.credentials(),
            self.settings.delays,
            self.settings.max_attempts,
        );

        Ok(Crawler {
            resolver,
            decoders: self.decoders,
        })
    }
}

impl std::fmt::Debug for CrawlerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlerBuilder")
            .field("settings", &self.settings)
            .field("decoders", &self.decoders)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
