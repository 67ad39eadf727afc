//! Basic-auth credentials.
//!
//! The password is held in a [`Secret`], which can be checked for presence
//! and handed to the transport but never shows up in `Debug` output, logs or
//! error messages.

use std::fmt;

use serde::Deserialize;

/// Placeholder printed instead of secret values.
const REDACTED: &str = "[REDACTED]";

// ============================================================================
// Secret
// ============================================================================

/// An opaque string whose value is only reachable through [`Secret::expose`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value. Call only at the point of use.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// A username/password pair for HTTP basic auth.
///
/// Empty strings are valid credentials; "no credentials" is expressed as
/// `Option<Credentials>::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Secret,
}

impl Credentials {
    /// Creates credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<Secret>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials only when both halves are present.
    pub fn from_parts(username: Option<String>, password: Option<Secret>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }

    /// The username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password, still wrapped.
    pub fn password(&self) -> &Secret {
        &self.password
    }
}

// ============================================================================
// Tests
// ============================================================================
