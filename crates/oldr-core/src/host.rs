//! Host capability abstraction
//!
//! The platform adapter resolves the browser's request-interception API once
//! and hands it to [`install`](crate::listener::install) through these traits.

use std::sync::Arc;

use crate::error::RedirectError;
use crate::filter::RequestFilter;
use crate::types::{BlockingResponse, RequestDetails};

/// Callback invoked synchronously before each matching request.
pub type RequestHandler = Box<dyn Fn(&RequestDetails) -> BlockingResponse + Send + Sync>;

/// Diagnostic channel. Only used for a missing capability and for URLs
/// that fail to parse.
pub trait DiagnosticLog: Send + Sync {
    fn error(&self, message: &str);
}

/// A host environment that can intercept navigation requests.
pub trait InterceptionHost {
    /// Diagnostic channel of this host.
    fn diagnostics(&self) -> Arc<dyn DiagnosticLog>;

    /// Register `handler` in blocking mode for requests matching `filter`.
    ///
    /// Returns [`RedirectError::CapabilityUnavailable`] when the host has no
    /// interception API; nothing is registered in that case.
    fn register_blocking(
        &mut self,
        filter: &RequestFilter,
        handler: RequestHandler,
    ) -> Result<(), RedirectError>;
}

/// [`DiagnosticLog`] backed by the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticLog for LogDiagnostics {
    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}
