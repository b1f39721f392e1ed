//! Redirect Decision Engine
//!
//! Every intercepted navigation goes through [`Redirector::decide`].
//! The redirector is immutable after construction and safe to share
//! between any number of callers.

use std::collections::HashSet;

use crate::config::{is_same_or_subdomain, RedirectConfig};
use crate::error::{ConfigError, RedirectError};
use crate::host::DiagnosticLog;
use crate::types::{Decision, HostClass};
use crate::url::{parse_request_url, replace_host, request_host};

/// Prefix for diagnostic log entries.
pub const LOG_PREFIX: &str = "OldRedirect";

// =============================================================================
// Redirector
// =============================================================================

/// Classifies requested URLs and rewrites them to the target host.
#[derive(Debug, Clone)]
pub struct Redirector {
    config: RedirectConfig,
    primary_exclusions: HashSet<String>,
    media_exclusions: HashSet<String>,
}

impl Default for Redirector {
    /// Redirector for the built-in configuration.
    fn default() -> Self {
        Self::build(RedirectConfig::default())
    }
}

impl Redirector {
    /// Validate `config` and build a redirector from it.
    pub fn new(config: RedirectConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RedirectConfig) -> Self {
        let config = config.normalized();
        Self {
            primary_exclusions: config.primary_exclusions.iter().cloned().collect(),
            media_exclusions: config.media_exclusions.iter().cloned().collect(),
            config,
        }
    }

    /// Effective (normalized) configuration.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Classify a bare hostname. Exclusions always win over redirect rules.
    pub fn classify_host(&self, host: &str) -> HostClass {
        let host = host.to_ascii_lowercase();

        if self.primary_exclusions.contains(&host) {
            return HostClass::PrimaryExcluded;
        }
        if self.media_exclusions.contains(&host) {
            return HostClass::MediaExcluded;
        }
        if is_same_or_subdomain(&host, &self.config.primary_domain) {
            return HostClass::Primary;
        }
        if host == self.config.short_link_domain {
            return HostClass::ShortLink;
        }
        if is_same_or_subdomain(&host, &self.config.short_link_domain) {
            return HostClass::ShortLinkSubdomain;
        }
        HostClass::Unrelated
    }

    /// Decide what to do with a requested URL.
    pub fn decide(&self, url: &str) -> Result<Decision, RedirectError> {
        let parsed = parse_request_url(url)?;
        let host = request_host(&parsed);

        let class = self.classify_host(&host);
        if !class.redirects() {
            return Ok(Decision::Unchanged);
        }

        let redirect = replace_host(&parsed, &self.config.target_host)?;
        log::debug!("{} ({}) -> {}", url, class, redirect);
        Ok(Decision::RedirectTo(redirect))
    }

    /// Like [`decide`](Self::decide), but a malformed URL is reported to `log`
    /// once and treated as [`Decision::Unchanged`].
    pub fn decide_or_unchanged(&self, url: &str, log: &dyn DiagnosticLog) -> Decision {
        match self.decide(url) {
            Ok(decision) => decision,
            Err(e) => {
                log.error(&format!("{}: Failed to process {}: {}", LOG_PREFIX, url, e));
                Decision::Unchanged
            }
        }
    }
}
