//! Interception filter
//!
//! Describes which requests the host should route to the listener: a list of
//! WebExtension match patterns plus a request type mask. The host applies the
//! filter itself; [`RequestFilter::matches`] evaluates it the same way so the
//! listener and tooling can check requests independently.

use serde::Serialize;

use crate::config::{is_same_or_subdomain, RedirectConfig};
use crate::types::RequestType;
use crate::url::{parse_request_url, request_host};

/// Listener mode that allows synchronous redirect answers.
pub const BLOCKING: &str = "blocking";

/// Host permissions a WebExtension needs besides the URL patterns.
pub const REQUIRED_PERMISSIONS: &[&str] = &["webRequest", "webRequestBlocking"];

// =============================================================================
// Request Filter
// =============================================================================

/// Which requests are intercepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    patterns: Vec<MatchPattern>,
    types: RequestType,
}

/// JSON shape of a filter, as passed to `onBeforeRequest.addListener`.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSpec {
    pub urls: Vec<String>,
    pub types: Vec<&'static str>,
}

impl RequestFilter {
    /// Filter covering the primary and short-link domains (bare and any
    /// subdomain) over both schemes, for document loads only.
    pub fn for_config(config: &RedirectConfig) -> Self {
        let mut patterns = Vec::with_capacity(4);
        for domain in [&config.primary_domain, &config.short_link_domain] {
            let domain = domain.to_ascii_lowercase();
            patterns.push(MatchPattern::any_scheme(HostPattern::Exact(domain.clone())));
            patterns.push(MatchPattern::any_scheme(HostPattern::Subdomains(domain)));
        }
        Self {
            patterns,
            types: RequestType::DOCUMENT,
        }
    }

    pub fn types(&self) -> RequestType {
        self.types
    }

    /// Match patterns in WebExtension syntax.
    pub fn url_patterns(&self) -> Vec<String> {
        self.patterns.iter().map(MatchPattern::to_string).collect()
    }

    pub fn spec(&self) -> FilterSpec {
        FilterSpec {
            urls: self.url_patterns(),
            types: self.types.browser_names(),
        }
    }

    /// Whether the host would route this request to the listener.
    pub fn matches(&self, url: &str, request_type: RequestType) -> bool {
        if !self.types.intersects(request_type) {
            return false;
        }
        let Ok(parsed) = parse_request_url(url) else {
            return false;
        };
        let host = request_host(&parsed);
        self.patterns
            .iter()
            .any(|p| p.matches(parsed.scheme(), &host))
    }
}

// =============================================================================
// Match Patterns
// =============================================================================

/// Host part of a match pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    /// `example.org`
    Exact(String),
    /// `*.example.org` (the domain itself and any subdomain)
    Subdomains(String),
}

/// `*://<host>/*` pattern. `*` as scheme means http or https.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MatchPattern {
    host: HostPattern,
}

impl MatchPattern {
    fn any_scheme(host: HostPattern) -> Self {
        Self { host }
    }

    // The path part is always `/*`.
    fn matches(&self, scheme: &str, host: &str) -> bool {
        if !matches!(scheme, "http" | "https") {
            return false;
        }
        match &self.host {
            HostPattern::Exact(domain) => host == domain,
            HostPattern::Subdomains(domain) => is_same_or_subdomain(host, domain),
        }
    }
}

impl std::fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.host {
            HostPattern::Exact(domain) => write!(f, "*://{}/*", domain),
            HostPattern::Subdomains(domain) => write!(f, "*://*.{}/*", domain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RequestFilter {
        RequestFilter::for_config(&RedirectConfig::default())
    }

    #[test]
    fn test_url_patterns() {
        assert_eq!(
            filter().url_patterns(),
            vec![
                "*://reddit.com/*",
                "*://*.reddit.com/*",
                "*://redd.it/*",
                "*://*.redd.it/*",
            ]
        );
    }

    #[test]
    fn test_spec_json() {
        let json = serde_json::to_value(filter().spec()).unwrap();
        assert_eq!(json["types"], serde_json::json!(["main_frame", "sub_frame"]));
        assert_eq!(json["urls"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_matches_documents_only() {
        let f = filter();
        assert!(f.matches("https://www.reddit.com/", RequestType::MAIN_FRAME));
        assert!(f.matches("http://redd.it/abc", RequestType::SUBDOCUMENT));
        assert!(f.matches("https://i.redd.it/a.png", RequestType::MAIN_FRAME));
        assert!(!f.matches("https://www.reddit.com/app.js", RequestType::SCRIPT));
        assert!(!f.matches("https://i.redd.it/a.png", RequestType::IMAGE));
        assert!(!f.matches("https://www.reddit.com/api", RequestType::XMLHTTPREQUEST));
    }

    #[test]
    fn test_matches_hosts_and_schemes() {
        let f = filter();
        assert!(!f.matches("https://example.com/", RequestType::MAIN_FRAME));
        assert!(!f.matches("https://notreddit.com/", RequestType::MAIN_FRAME));
        assert!(!f.matches("ftp://reddit.com/", RequestType::MAIN_FRAME));
        assert!(!f.matches("not a url", RequestType::MAIN_FRAME));
        assert!(f.matches("https://REDDIT.com/r/x", RequestType::MAIN_FRAME));
    }
}
