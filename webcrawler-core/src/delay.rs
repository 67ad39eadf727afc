//! Wait durations used to throttle and back off requests.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed wait durations for one crawler.
///
/// All values are `Duration`s and therefore never negative. In configuration
/// they are written as whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayPolicy {
    /// Time allowed for a rendered page to settle after loading.
    #[serde(with = "seconds")]
    pub page_load: Duration,
    /// Wait before the first request of a fetch when delays are applied.
    #[serde(with = "seconds")]
    pub request: Duration,
    /// Wait before following a redirect or retrying with credentials.
    #[serde(with = "seconds")]
    pub retry: Duration,
    /// Per-request transport timeout.
    #[serde(with = "seconds")]
    pub timeout: Duration,
}

impl DelayPolicy {
    /// A policy with every wait set to zero. The timeout keeps its default.
    pub fn none() -> Self {
        Self {
            page_load: Duration::ZERO,
            request: Duration::ZERO,
            retry: Duration::ZERO,
            ..Self::default()
        }
    }

    /// The wait before the first attempt of a fetch.
    pub fn initial(&self, apply_delay: bool) -> Duration {
        if apply_delay { self.request } else { Duration::ZERO }
    }

    /// Sets the pre-request delay.
    pub fn with_request(mut self, delay: Duration) -> Self {
        self.request = delay;
        self
    }

    /// Sets the redirect/auth retry delay.
    pub fn with_retry(mut self, delay: Duration) -> Self {
        self.retry = delay;
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(1),
            request: Duration::from_secs(2),
            retry: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Serializes a `Duration` as whole seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let delays = DelayPolicy::default();
        assert_eq!(delays.page_load, Duration::from_secs(1));
        assert_eq!(delays.request, Duration::from_secs(2));
        assert_eq!(delays.retry, Duration::from_secs(5));
        assert_eq!(delays.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_initial_delay_respects_flag() {
        let delays = DelayPolicy::default();
        assert_eq!(delays.initial(true), Duration::from_secs(2));
        assert_eq!(delays.initial(false), Duration::ZERO);
    }

    #[test]
    fn test_none_zeroes_waits() {
        let delays = DelayPolicy::none();
        assert_eq!(delays.initial(true), Duration::ZERO);
        assert_eq!(delays.retry, Duration::ZERO);
        assert_eq!(delays.timeout, Duration::from_secs(5));
    }
}
