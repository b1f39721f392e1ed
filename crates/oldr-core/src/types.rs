//! Core type definitions for OldRedirect
//!
//! Decisions, host classes and the request data exchanged with the host.

// =============================================================================
// Decision
// =============================================================================

/// Outcome of the redirect decision function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request proceed unmodified.
    Unchanged,
    /// Replace the navigation with this URL.
    RedirectTo(String),
}

impl Decision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::RedirectTo(_))
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::RedirectTo(url) => Some(url),
            Self::Unchanged => None,
        }
    }
}

// =============================================================================
// Host Classification
// =============================================================================

/// Why a host was (or was not) redirected. Variants follow evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostClass {
    /// Exact match in the primary exclusion set (includes the target host)
    PrimaryExcluded,
    /// Exact match in the media exclusion set
    MediaExcluded,
    /// Primary domain or one of its subdomains
    Primary,
    /// The bare short-link domain
    ShortLink,
    /// Unlisted subdomain of the short-link domain
    ShortLinkSubdomain,
    /// Not a managed domain
    Unrelated,
}

impl HostClass {
    /// Hosts of this class are rewritten to the target host.
    pub fn redirects(self) -> bool {
        matches!(self, Self::Primary | Self::ShortLink)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryExcluded => "primary-excluded",
            Self::MediaExcluded => "media-excluded",
            Self::Primary => "primary",
            Self::ShortLink => "short-link",
            Self::ShortLinkSubdomain => "short-link-subdomain",
            Self::Unrelated => "unrelated",
        }
    }
}

impl std::fmt::Display for HostClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Request Types (bit mask for type filtering)
// =============================================================================

bitflags::bitflags! {
    /// Request type bit mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RequestType: u32 {
        const OTHER = 1 << 0;
        const SCRIPT = 1 << 1;
        const IMAGE = 1 << 2;
        const STYLESHEET = 1 << 3;
        const OBJECT = 1 << 4;
        const SUBDOCUMENT = 1 << 5;  // iframe/frame
        const MAIN_FRAME = 1 << 6;   // main document
        const XMLHTTPREQUEST = 1 << 7;
        const WEBSOCKET = 1 << 8;
        const FONT = 1 << 9;
        const MEDIA = 1 << 10;
        const PING = 1 << 11;
        const CSP_REPORT = 1 << 12;
        const BEACON = 1 << 13;
        const FETCH = 1 << 14;

        /// Document types (main_frame + sub_frame)
        const DOCUMENT = Self::MAIN_FRAME.bits() | Self::SUBDOCUMENT.bits();
    }
}

impl RequestType {
    /// Parse from browser request type string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "main_frame" | "document" => Self::MAIN_FRAME,
            "sub_frame" | "subdocument" => Self::SUBDOCUMENT,
            "stylesheet" => Self::STYLESHEET,
            "script" => Self::SCRIPT,
            "image" => Self::IMAGE,
            "font" => Self::FONT,
            "object" => Self::OBJECT,
            "xmlhttprequest" => Self::XMLHTTPREQUEST,
            "ping" => Self::PING,
            "beacon" => Self::BEACON,
            "fetch" => Self::FETCH,
            "csp_report" => Self::CSP_REPORT,
            "media" => Self::MEDIA,
            "websocket" => Self::WEBSOCKET,
            _ => Self::OTHER,
        }
    }

    /// Browser type strings for every flag set.
    pub fn browser_names(self) -> Vec<&'static str> {
        BROWSER_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

const BROWSER_NAMES: &[(RequestType, &str)] = &[
    (RequestType::MAIN_FRAME, "main_frame"),
    (RequestType::SUBDOCUMENT, "sub_frame"),
    (RequestType::STYLESHEET, "stylesheet"),
    (RequestType::SCRIPT, "script"),
    (RequestType::IMAGE, "image"),
    (RequestType::FONT, "font"),
    (RequestType::OBJECT, "object"),
    (RequestType::XMLHTTPREQUEST, "xmlhttprequest"),
    (RequestType::PING, "ping"),
    (RequestType::BEACON, "beacon"),
    (RequestType::FETCH, "fetch"),
    (RequestType::CSP_REPORT, "csp_report"),
    (RequestType::MEDIA, "media"),
    (RequestType::WEBSOCKET, "websocket"),
    (RequestType::OTHER, "other"),
];

// =============================================================================
// Request / Response
// =============================================================================

/// Request as handed to the interception callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    /// Full request URL
    pub url: String,
    /// Request type
    pub request_type: RequestType,
}

/// Answer returned to the host. Empty means "continue unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingResponse {
    pub redirect_url: Option<String>,
}

impl BlockingResponse {
    pub fn unchanged() -> Self {
        Self::default()
    }
}

impl From<Decision> for BlockingResponse {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::RedirectTo(url) => Self { redirect_url: Some(url) },
            Decision::Unchanged => Self::unchanged(),
        }
    }
}
