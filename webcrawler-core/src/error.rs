//! Core error types for webcrawler.

use thiserror::Error;

/// Core error type for configuration and target handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A redirect location that cannot be turned into an absolute target.
    #[error("Invalid redirect location {location:?}: {reason}")]
    InvalidLocation {
        /// The raw `Location` header value.
        location: String,
        /// Why it could not be resolved.
        reason: String,
    },
}
