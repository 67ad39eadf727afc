//! Classification of raw responses.

use reqwest::StatusCode;
use reqwest::header;

use crate::transport::RawResponse;

/// What a single response means for the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx: the body is the result.
    Success {
        /// Response body.
        body: Vec<u8>,
        /// Declared media type, without parameters.
        media_type: Option<String>,
    },
    /// 3xx with a `Location` header.
    Redirect(String),
    /// 401.
    AuthRequired,
    /// 429, with the server's `Retry-After` in seconds (zero when absent or unparseable).
    RateLimited(u64),
    /// Anything else, including 3xx without a `Location`.
    Unresolvable(u16),
}

/// Classifies a response into exactly one [`Outcome`].
pub fn classify(response: RawResponse) -> Outcome {
    let status = response.status;

    if status.is_success() {
        let media_type = response.media_type().map(str::to_string);
        return Outcome::Success {
            body: response.body,
            media_type,
        };
    }

    if status.is_redirection() {
        return match response.header_str(&header::LOCATION) {
            Some(location) => Outcome::Redirect(location.to_string()),
            None => Outcome::Unresolvable(status.as_u16()),
        };
    }

    match status {
        StatusCode::UNAUTHORIZED => Outcome::AuthRequired,
        StatusCode::TOO_MANY_REQUESTS => {
            Outcome::RateLimited(response.retry_after_secs().unwrap_or(0))
        }
        _ => Outcome::Unresolvable(status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_success_carries_body_and_type() {
        let response = RawResponse::new(StatusCode::OK)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body("{}");

        assert_eq!(
            classify(response),
            Outcome::Success {
                body: b"{}".to_vec(),
                media_type: Some("application/json".to_string()),
            }
        );
    }

    #[test]
    fn test_any_2xx_is_success() {
        let response = RawResponse::new(StatusCode::NO_CONTENT);
        assert!(matches!(classify(response), Outcome::Success { .. }));
    }

    #[test]
    fn test_redirect_with_location() {
        for status in [
            StatusCode::MOVED_PERMANENTLY,
            StatusCode::FOUND,
            StatusCode::SEE_OTHER,
            StatusCode::TEMPORARY_REDIRECT,
            StatusCode::PERMANENT_REDIRECT,
        ] {
            let response = RawResponse::new(status)
                .with_header(header::LOCATION, HeaderValue::from_static("/next"));
            assert_eq!(classify(response), Outcome::Redirect("/next".to_string()));
        }
    }

    #[test]
    fn test_redirect_without_location_is_unresolvable() {
        let response = RawResponse::new(StatusCode::NOT_MODIFIED);
        assert_eq!(classify(response), Outcome::Unresolvable(304));
    }

    #[test]
    fn test_unauthorized() {
        let response = RawResponse::new(StatusCode::UNAUTHORIZED);
        assert_eq!(classify(response), Outcome::AuthRequired);
    }

    #[test]
    fn test_rate_limited_reads_retry_after() {
        let response = RawResponse::new(StatusCode::TOO_MANY_REQUESTS)
            .with_header(header::RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(classify(response), Outcome::RateLimited(3));

        let response = RawResponse::new(StatusCode::TOO_MANY_REQUESTS)
            .with_header(header::RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(classify(response), Outcome::RateLimited(0));

        let response = RawResponse::new(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(classify(response), Outcome::RateLimited(0));
    }

    #[test]
    fn test_other_statuses_are_unresolvable() {
        for code in [400_u16, 403, 404, 500, 503, 101] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(classify(RawResponse::new(status)), Outcome::Unresolvable(code));
        }
    }
}
