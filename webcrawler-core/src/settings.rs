//! Construction-time crawler configuration.

use serde::Deserialize;

use crate::credentials::{Credentials, Secret};
use crate::delay::DelayPolicy;
use crate::error::CoreError;

/// Default bound on transport calls per fetch.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default User-Agent header.
const DEFAULT_USER_AGENT: &str = concat!("webcrawler/", env!("CARGO_PKG_VERSION"));

/// Settings a crawler is built from.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<Secret>,
    /// Wait durations.
    pub delays: DelayPolicy,
    /// Maximum transport calls made while resolving one fetch.
    pub max_attempts: u32,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl CrawlerSettings {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets basic-auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the delay policy.
    pub fn with_delays(mut self, delays: DelayPolicy) -> Self {
        self.delays = delays;
        self
    }

    /// Sets the attempt bound.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns credentials when both username and password are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.clone(), self.password.clone())
    }

    /// Checks the settings for values the resolver cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] when `max_attempts` is zero, the
    /// request timeout is zero, or the user agent is empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_attempts == 0 {
            return Err(CoreError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.delays.timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "user_agent must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            delays: DelayPolicy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = CrawlerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert!(settings.credentials().is_none());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let settings = CrawlerSettings::new().with_max_attempts(0);
        assert!(matches!(settings.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = CrawlerSettings::new()
            .with_delays(DelayPolicy::none().with_timeout(std::time::Duration::ZERO));
        match settings.validate() {
            Err(CoreError::InvalidConfig(msg)) => assert!(msg.contains("timeout")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_zero_waits_with_timeout_are_valid() {
        let settings = CrawlerSettings::new().with_delays(DelayPolicy::none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_half_configured_credentials_are_absent() {
        let mut settings = CrawlerSettings::new();
        settings.username = Some("alice".to_string());
        assert!(settings.credentials().is_none());

        let settings = settings.with_credentials("alice", "pw");
        assert!(settings.credentials().is_some());
    }
}
