//! URL parsing utilities for the decision path
//!
//! Parsing follows the WHATWG URL standard (the same parser the browser uses
//! for the request URL), so serializing a parsed URL yields what the host
//! would produce itself.

use url::Url;

use crate::error::RedirectError;

// =============================================================================
// Parsing
// =============================================================================

/// Parse a requested URL. Fails with [`RedirectError::MalformedUrl`].
pub fn parse_request_url(raw: &str) -> Result<Url, RedirectError> {
    Url::parse(raw).map_err(|e| RedirectError::malformed(raw, e))
}

// =============================================================================
// Host Handling
// =============================================================================

/// Lowercased hostname of a parsed URL, or an empty string for host-less URLs.
#[inline]
pub fn request_host(url: &Url) -> String {
    url.host_str().unwrap_or("").to_ascii_lowercase()
}

/// Serialize `url` with its host replaced by `host`.
/// Scheme, userinfo, port, path, query and fragment are kept.
pub fn replace_host(url: &Url, host: &str) -> Result<String, RedirectError> {
    let mut rewritten = url.clone();
    rewritten
        .set_host(Some(host))
        .map_err(|e| RedirectError::malformed(url.as_str(), e))?;
    Ok(rewritten.into())
}
