//! The response-resolution state machine.
//!
//! [`ResponseResolver::resolve`] drives the transport in a bounded loop. Each
//! response is classified into an [`Outcome`]; redirects, auth challenges and
//! rate limits produce the next [`RequestAttempt`], while success and every
//! other status end the loop.
//!
//! | Outcome | Next attempt |
//! |---|---|
//! | `Success` | none, return the body |
//! | `Redirect(loc)` | `loc` joined onto the current target, same auth flag, retry delay |
//! | `AuthRequired` | same target, auth forced on, retry delay (fails without credentials) |
//! | `RateLimited(n)` | same target, same auth flag, `n` seconds |
//! | `Unresolvable(code)` | none, fail with `code` |
//!
//! The loop makes at most `max_attempts` transport calls. Reaching the bound
//! while another attempt is wanted fails with the last observed status.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;
use webcrawler_core::{Credentials, DelayPolicy, resolve_location};

use crate::clock::Clock;
use crate::error::FetchError;
use crate::outcome::{Outcome, classify};
use crate::transport::{RawResponse, Transport};

// ============================================================================
// Request Attempt
// ============================================================================

/// The input to one transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAttempt {
    /// Absolute target.
    pub target: Url,
    /// Whether to send credentials.
    pub use_auth: bool,
    /// Wait before sending.
    pub delay: Duration,
}

// ============================================================================
// Resolution
// ============================================================================

/// A successfully resolved response, before decoding.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The target that finally answered with success.
    pub url: Url,
    /// Its status code.
    pub status: StatusCode,
    /// Declared media type, without parameters.
    pub media_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
    /// Transport calls made, including the successful one.
    pub attempts: u32,
}

// ============================================================================
// Response Resolver
// ============================================================================

/// Resolves one request to a terminal success or failure.
pub struct ResponseResolver {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    credentials: Option<Credentials>,
    delays: DelayPolicy,
    max_attempts: u32,
}

impl ResponseResolver {
    /// Creates a resolver. A `max_attempts` of zero is treated as one.
    pub fn new(
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        credentials: Option<Credentials>,
        delays: DelayPolicy,
        max_attempts: u32,
    ) -> Self {
        Self {
            transport,
            clock,
            credentials,
            delays,
            max_attempts: max_attempts.max(1),
        }
    }

    /// The attempt bound in effect.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns true if credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Drives the transport until the request resolves.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Connection`] if the transport fails
    /// - [`FetchError::Credentials`] if auth is needed and none is configured
    /// - [`FetchError::Unresolvable`] for unhandled statuses or when the
    ///   attempt bound is reached
    /// - [`FetchError::Core`] for an unusable redirect location
    /// - [`FetchError::Cancelled`] if `cancel` fires
    #[instrument(skip(self, target, cancel), fields(url = %target))]
    pub async fn resolve(
        &self,
        target: Url,
        use_auth: bool,
        apply_delay: bool,
        cancel: &CancellationToken,
    ) -> Result<Resolution, FetchError> {
        let mut attempt = RequestAttempt {
            target,
            use_auth,
            delay: self.delays.initial(apply_delay),
        };
        let mut attempts = 0_u32;

        loop {
            attempts += 1;
            self.wait(attempt.delay, cancel).await?;

            let response = self.send(&attempt, cancel).await?;
            let status = response.status;
            debug!(
                attempt = attempts,
                status = status.as_u16(),
                url = %attempt.target,
                "Response received"
            );

            let next = match classify(response) {
                Outcome::Success { body, media_type } => {
                    return Ok(Resolution {
                        url: attempt.target,
                        status,
                        media_type,
                        body,
                        attempts,
                    });
                }
                Outcome::Redirect(location) => {
                    let target = resolve_location(&attempt.target, &location)?;
                    debug!(location = %target, "Following redirect");
                    // The auth flag carries over regardless of origin, so basic-auth
                    // credentials are also sent to a cross-origin redirect target.
                    RequestAttempt {
                        target,
                        use_auth: attempt.use_auth,
                        delay: self.delays.retry,
                    }
                }
                Outcome::AuthRequired => {
                    if self.credentials.is_none() {
                        return Err(FetchError::Credentials);
                    }
                    debug!("Authentication required, retrying with credentials");
                    RequestAttempt {
                        use_auth: true,
                        delay: self.delays.retry,
                        ..attempt
                    }
                }
                Outcome::RateLimited(seconds) => {
                    debug!(retry_after = seconds, "Rate limited");
                    RequestAttempt {
                        delay: Duration::from_secs(seconds),
                        ..attempt
                    }
                }
                Outcome::Unresolvable(code) => {
                    return Err(FetchError::Unresolvable { status: code });
                }
            };

            if attempts >= self.max_attempts {
                warn!(
                    attempts,
                    status = status.as_u16(),
                    "Attempt bound reached before the request resolved"
                );
                return Err(FetchError::Unresolvable {
                    status: status.as_u16(),
                });
            }
            attempt = next;
        }
    }

    async fn wait(&self, delay: Duration, cancel: &CancellationToken) -> Result<(), FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if delay.is_zero() {
            return Ok(());
        }

        debug!(delay_secs = delay.as_secs_f64(), "Waiting before request");
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            () = self.clock.sleep(delay) => Ok(()),
        }
    }

    async fn send(
        &self,
        attempt: &RequestAttempt,
        cancel: &CancellationToken,
    ) -> Result<RawResponse, FetchError> {
        let credentials = if attempt.use_auth {
            Some(self.credentials.as_ref().ok_or(FetchError::Credentials)?)
        } else {
            None
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.transport.send(&attempt.target, credentials) => {
                result.map_err(FetchError::from)
            }
        }
    }
}

impl std::fmt::Debug for ResponseResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("credentials", &self.credentials)
            .field("delays", &self.delays)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
