//! Target resolution for redirect locations.

use url::Url;

use crate::error::CoreError;

/// Resolves a `Location` header value against the target that produced it.
///
/// Absolute locations are used as-is. Relative references (`/next`, `next`,
/// `?page=2`, `//host/path`) inherit whatever components they omit from
/// `base`, so a location without an authority keeps the scheme, host and port
/// of `base`.
///
/// In a redirect chain `base` is the target of the hop that produced the
/// `Location`, not the first request's target. The two coincide on the first
/// hop; later relative hops resolve against where the previous one landed.
///
/// # Errors
///
/// Returns [`CoreError::InvalidLocation`] if the location is empty or cannot
/// be parsed as a URL reference.
pub fn resolve_location(base: &Url, location: &str) -> Result<Url, CoreError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(CoreError::InvalidLocation {
            location: location.to_string(),
            reason: "empty location".to_string(),
        });
    }

    base.join(location).map_err(|e| CoreError::InvalidLocation {
        location: location.to_string(),
        reason: e.to_string(),
    })
}
