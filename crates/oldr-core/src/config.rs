//! Static redirect configuration
//!
//! The browser runtime always uses [`RedirectConfig::default`]. Developer
//! tooling may load an alternative deployment from JSON.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Canonical legacy-layout host every redirect points to.
pub const DEFAULT_TARGET_HOST: &str = "old.reddit.com";
/// Primary domain whose modern-layout pages are redirected.
pub const DEFAULT_PRIMARY_DOMAIN: &str = "reddit.com";
/// Short-link domain for compact permalinks.
pub const DEFAULT_SHORT_LINK_DOMAIN: &str = "redd.it";

/// Service subdomains of the primary domain that must never be rewritten.
pub const DEFAULT_PRIMARY_EXCLUSIONS: &[&str] = &[
    "old.reddit.com",
    "oauth.reddit.com",
    "gateway.reddit.com",
    "gql.reddit.com",
    "ads.reddit.com",
    "accounts.reddit.com",
    "events.reddit.com",
    "mod.reddit.com",
    "blog.reddit.com",
];

/// Media subdomains of the short-link domain (images, video, previews, styles).
pub const DEFAULT_MEDIA_EXCLUSIONS: &[&str] = &[
    "i.redd.it",
    "v.redd.it",
    "preview.redd.it",
    "styles.redd.it",
];

/// Redirect configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedirectConfig {
    pub target_host: String,
    pub primary_domain: String,
    pub short_link_domain: String,
    pub primary_exclusions: BTreeSet<String>,
    pub media_exclusions: BTreeSet<String>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            target_host: DEFAULT_TARGET_HOST.to_string(),
            primary_domain: DEFAULT_PRIMARY_DOMAIN.to_string(),
            short_link_domain: DEFAULT_SHORT_LINK_DOMAIN.to_string(),
            primary_exclusions: DEFAULT_PRIMARY_EXCLUSIONS.iter().map(|h| h.to_string()).collect(),
            media_exclusions: DEFAULT_MEDIA_EXCLUSIONS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl RedirectConfig {
    /// Parse a configuration from JSON. Missing fields take the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate every hostname and the relationship between the domains.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_host("targetHost", &self.target_host)?;
        check_host("primaryDomain", &self.primary_domain)?;
        check_host("shortLinkDomain", &self.short_link_domain)?;
        for host in &self.primary_exclusions {
            check_host("primaryExclusions", host)?;
        }
        for host in &self.media_exclusions {
            check_host("mediaExclusions", host)?;
        }

        let primary = self.primary_domain.to_ascii_lowercase();
        let short = self.short_link_domain.to_ascii_lowercase();
        if primary == short {
            return Err(ConfigError::OverlappingDomains(primary));
        }

        let target = self.target_host.to_ascii_lowercase();
        if !is_same_or_subdomain(&target, &primary) {
            return Err(ConfigError::TargetOutsidePrimary { target, primary });
        }

        Ok(())
    }

    /// Lowercase every value and make sure the target host is excluded.
    pub(crate) fn normalized(&self) -> Self {
        let lower = |set: &BTreeSet<String>| -> BTreeSet<String> {
            set.iter().map(|h| h.to_ascii_lowercase()).collect()
        };

        let target_host = self.target_host.to_ascii_lowercase();
        let mut primary_exclusions = lower(&self.primary_exclusions);
        primary_exclusions.insert(target_host.clone());

        Self {
            target_host,
            primary_domain: self.primary_domain.to_ascii_lowercase(),
            short_link_domain: self.short_link_domain.to_ascii_lowercase(),
            primary_exclusions,
            media_exclusions: lower(&self.media_exclusions),
        }
    }
}

/// `host == domain` or `host` ends with `.domain`. Both must be lowercase.
pub(crate) fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    match host.strip_suffix(domain) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

fn check_host(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(field));
    }
    let bad = value.starts_with('.')
        || value.ends_with('.')
        || value.contains("..")
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | ':' | '*' | '@' | '?' | '#'));
    if bad {
        return Err(ConfigError::InvalidHost {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
