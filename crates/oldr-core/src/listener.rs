//! Blocking request listener

use std::sync::Arc;

use crate::error::RedirectError;
use crate::filter::RequestFilter;
use crate::host::{DiagnosticLog, InterceptionHost};
use crate::redirector::{Redirector, LOG_PREFIX};
use crate::types::{BlockingResponse, RequestDetails};

/// Answers intercepted requests with the redirector's decision.
#[derive(Clone)]
pub struct RedirectListener {
    redirector: Arc<Redirector>,
    filter: RequestFilter,
    log: Arc<dyn DiagnosticLog>,
}

impl RedirectListener {
    pub fn new(redirector: Arc<Redirector>, log: Arc<dyn DiagnosticLog>) -> Self {
        let filter = RequestFilter::for_config(redirector.config());
        Self {
            redirector,
            filter,
            log,
        }
    }

    pub fn filter(&self) -> &RequestFilter {
        &self.filter
    }

    /// Handle one intercepted request. Never fails.
    pub fn handle(&self, details: &RequestDetails) -> BlockingResponse {
        // Sub-resources are never redirected, even if a host delivers them.
        if !self.filter.types().intersects(details.request_type) {
            return BlockingResponse::unchanged();
        }
        self.redirector
            .decide_or_unchanged(&details.url, self.log.as_ref())
            .into()
    }
}

/// Register a blocking listener for `redirector` on `host`.
///
/// A missing capability is reported once through the host's diagnostic
/// channel and returned; the host itself is left untouched.
pub fn install<H: InterceptionHost + ?Sized>(
    host: &mut H,
    redirector: Arc<Redirector>,
) -> Result<RequestFilter, RedirectError> {
    let diagnostics = host.diagnostics();
    let listener = RedirectListener::new(redirector, Arc::clone(&diagnostics));
    let filter = listener.filter().clone();
    let handler = Box::new(move |details: &RequestDetails| listener.handle(details));

    match host.register_blocking(&filter, handler) {
        Ok(()) => {
            log::info!("listening on {}", filter.url_patterns().join(", "));
            Ok(filter)
        }
        Err(e) => {
            diagnostics.error(&format!("{}: {}", LOG_PREFIX, e));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::RequestType;

    #[derive(Default)]
    struct RecordingLog {
        entries: Mutex<Vec<String>>,
    }

    impl DiagnosticLog for RecordingLog {
        fn error(&self, message: &str) {
            self.entries.lock().unwrap().push(message.to_string());
        }
    }

    fn listener(log: Arc<RecordingLog>) -> RedirectListener {
        RedirectListener::new(Arc::new(Redirector::default()), log)
    }

    fn details(url: &str, request_type: RequestType) -> RequestDetails {
        RequestDetails {
            url: url.to_string(),
            request_type,
        }
    }

    #[test]
    fn test_handle_main_frame() {
        let l = listener(Arc::default());
        let response = l.handle(&details("https://www.reddit.com/r/rust", RequestType::MAIN_FRAME));
        assert_eq!(response.redirect_url.as_deref(), Some("https://old.reddit.com/r/rust"));
    }

    #[test]
    fn test_handle_ignores_subresources() {
        let l = listener(Arc::default());
        let response = l.handle(&details("https://www.reddit.com/app.js", RequestType::SCRIPT));
        assert_eq!(response, BlockingResponse::unchanged());
    }

    #[test]
    fn test_handle_malformed_logs_once() {
        let log = Arc::new(RecordingLog::default());
        let l = listener(Arc::clone(&log));
        let response = l.handle(&details("not a valid url", RequestType::SUBDOCUMENT));
        assert_eq!(response, BlockingResponse::unchanged());
        assert_eq!(log.entries.lock().unwrap().len(), 1);
    }
}
