//! Fetch error types.

use thiserror::Error;
use webcrawler_core::CoreError;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
///
/// Only the status classes the resolver knows how to handle are retried; every
/// other condition ends the fetch with one of these variants.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, socket, TLS, timeout).
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Authentication was required but no credentials are configured.
    #[error("Login failed; missing valid credentials")]
    Credentials,

    /// A status outside the handled set, or the attempt bound was reached.
    #[error("Server responded with unresolvable status code {status}")]
    Unresolvable {
        /// The last status code observed.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The fetch was cancelled while waiting or sending.
    #[error("Fetch cancelled")]
    Cancelled,

    /// The requested URL is not an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Core error (configuration, redirect location).
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl FetchError {
    /// Returns the status code carried by an unresolvable response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unresolvable { status } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Connection Error
// ============================================================================

/// A transport failure, independent of its underlying cause.
#[derive(Debug, Error)]
#[error("Could not establish a connection with the target: {reason}")]
pub struct ConnectionError {
    reason: String,
}

impl ConnectionError {
    /// Creates a connection error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The underlying reason, for diagnostics.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<reqwest::Error> for ConnectionError {
    fn from(err: reqwest::Error) -> Self {
        // URLs may carry userinfo; keep them out of the message.
        Self::new(err.without_url().to_string())
    }
}

// ============================================================================
// Decode Error
// ============================================================================

/// Error type for content decoding. Never retried.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed PDF.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Body is not valid UTF-8 where text is required.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Structurally invalid document.
    #[error("Malformed document: {0}")]
    Malformed(String),
}
