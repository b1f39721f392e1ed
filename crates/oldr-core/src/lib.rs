//! OldRedirect Core Library
//!
//! This crate decides whether a navigation request to the modern site layout
//! should be rewritten to the canonical legacy-layout host.
//!
//! # Architecture
//!
//! A [`Redirector`] owns an immutable [`RedirectConfig`] and classifies each
//! requested URL in strict order: exclusion sets first, then the primary
//! domain family, then the short-link domain. The decision is pure; the only
//! side effect is a diagnostic entry when a URL cannot be parsed.
//!
//! The browser is reached through the [`InterceptionHost`] trait, which the
//! platform adapter implements. [`install`] registers a blocking listener on
//! that host.
//!
//! # Modules
//!
//! - `config`: Static configuration sets and validation
//! - `error`: Error types
//! - `types`: Decision, host class and request type definitions
//! - `url`: URL parsing and host rewriting
//! - `redirector`: The redirect decision function
//! - `filter`: Interception filter (URL match patterns + request types)
//! - `host`: Host capability abstraction
//! - `listener`: Blocking listener and installation

pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod listener;
pub mod redirector;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use config::RedirectConfig;
pub use error::{ConfigError, RedirectError};
pub use filter::RequestFilter;
pub use host::{DiagnosticLog, InterceptionHost, LogDiagnostics, RequestHandler};
pub use listener::{install, RedirectListener};
pub use redirector::Redirector;
pub use types::{BlockingResponse, Decision, HostClass, RequestDetails, RequestType};
