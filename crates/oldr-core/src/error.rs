//! Error types

/// Errors surfaced by the redirect engine and its host integration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectError {
    /// The host does not expose a blocking request-interception API.
    #[error("request interception unavailable: {reason}")]
    CapabilityUnavailable { reason: String },
    /// A requested URL could not be parsed.
    #[error("malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },
}

impl RedirectError {
    pub(crate) fn malformed(url: &str, reason: impl ToString) -> Self {
        Self::MalformedUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty value for {0}")]
    EmptyValue(&'static str),
    #[error("Invalid hostname in {field}: '{value}'")]
    InvalidHost { field: &'static str, value: String },
    #[error("Target host '{target}' is not within primary domain '{primary}'")]
    TargetOutsidePrimary { target: String, primary: String },
    #[error("Primary domain and short-link domain are both '{0}'")]
    OverlappingDomains(String),
}
