use std::sync::{Arc, Mutex};

use oldr_core::{
    install, BlockingResponse, Decision, DiagnosticLog, HostClass, InterceptionHost, RedirectConfig,
    RedirectError, Redirector, RequestDetails, RequestFilter, RequestHandler, RequestType,
};

fn example_config() -> RedirectConfig {
    RedirectConfig::from_json(
        r#"{
            "targetHost": "old.example.org",
            "primaryDomain": "example.org",
            "shortLinkDomain": "ex.it",
            "primaryExclusions": ["old.example.org", "api.example.org"],
            "mediaExclusions": ["i.ex.it", "v.ex.it"]
        }"#,
    )
    .unwrap()
}

fn example() -> Redirector {
    Redirector::new(example_config()).unwrap()
}

#[derive(Default)]
struct MemoryLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryLog {
    fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl DiagnosticLog for MemoryLog {
    fn error(&self, message: &str) {
        self.entries.lock().unwrap().push(message.to_string());
    }
}

/// In-memory host: dispatches requests to the registered listener when the
/// URL and type match its filter.
struct MemoryHost {
    available: bool,
    log: Arc<MemoryLog>,
    listeners: Vec<(RequestFilter, RequestHandler)>,
}

impl MemoryHost {
    fn new(available: bool) -> Self {
        Self {
            available,
            log: Arc::default(),
            listeners: Vec::new(),
        }
    }

    fn navigate(&self, url: &str, request_type: &str) -> BlockingResponse {
        let details = RequestDetails {
            url: url.to_string(),
            request_type: RequestType::from_str(request_type),
        };
        self.listeners
            .iter()
            .filter(|(filter, _)| filter.matches(url, details.request_type))
            .map(|(_, handler)| handler(&details))
            .find(|response| response.redirect_url.is_some())
            .unwrap_or_default()
    }
}

impl InterceptionHost for MemoryHost {
    fn diagnostics(&self) -> Arc<dyn DiagnosticLog> {
        self.log.clone()
    }

    fn register_blocking(
        &mut self,
        filter: &RequestFilter,
        handler: RequestHandler,
    ) -> Result<(), RedirectError> {
        if !self.available {
            return Err(RedirectError::CapabilityUnavailable {
                reason: "no webRequest".to_string(),
            });
        }
        self.listeners.push((filter.clone(), handler));
        Ok(())
    }
}

#[test]
fn scenario_www_redirects() {
    assert_eq!(
        example().decide("https://www.example.org/r/foo").unwrap(),
        Decision::RedirectTo("https://old.example.org/r/foo".to_string())
    );
}

#[test]
fn scenario_target_unchanged() {
    assert_eq!(
        example().decide("https://old.example.org/r/foo").unwrap(),
        Decision::Unchanged
    );
}

#[test]
fn scenario_media_unchanged() {
    assert_eq!(
        example().decide("https://i.ex.it/image.png").unwrap(),
        Decision::Unchanged
    );
}

#[test]
fn scenario_short_link_redirects() {
    assert_eq!(
        example().decide("https://ex.it/abc123").unwrap(),
        Decision::RedirectTo("https://old.example.org/abc123".to_string())
    );
}

#[test]
fn scenario_unrelated_unchanged() {
    assert_eq!(
        example().decide("https://unrelatedsite.com/").unwrap(),
        Decision::Unchanged
    );
}

#[test]
fn scenario_malformed_unchanged_and_logged_once() {
    let log = MemoryLog::default();
    assert_eq!(
        example().decide_or_unchanged("not a valid url", &log),
        Decision::Unchanged
    );
    assert_eq!(log.count(), 1);
}

#[test]
fn unlisted_short_link_subdomain_unchanged() {
    let r = example();
    assert_eq!(r.classify_host("new.ex.it"), HostClass::ShortLinkSubdomain);
    assert_eq!(r.decide("https://new.ex.it/abc").unwrap(), Decision::Unchanged);
}

#[test]
fn exclusions_win_regardless_of_path() {
    let r = example();
    for url in [
        "https://api.example.org/",
        "https://api.example.org/r/foo?x=1",
        "https://API.Example.org/deep/path#frag",
        "https://v.ex.it/clip.mp4?t=3",
    ] {
        assert_eq!(r.decide(url).unwrap(), Decision::Unchanged, "{}", url);
    }
}

#[test]
fn install_redirects_documents_through_host() {
    let mut host = MemoryHost::new(true);
    let filter = install(&mut host, Arc::new(example())).unwrap();
    assert_eq!(filter.types(), RequestType::DOCUMENT);

    let response = host.navigate("https://www.example.org/r/foo?a=b#c", "main_frame");
    assert_eq!(
        response.redirect_url.as_deref(),
        Some("https://old.example.org/r/foo?a=b#c")
    );

    let response = host.navigate("http://ex.it/abc123", "sub_frame");
    assert_eq!(
        response.redirect_url.as_deref(),
        Some("http://old.example.org/abc123")
    );

    assert_eq!(
        host.navigate("https://www.example.org/logo.png", "image"),
        BlockingResponse::unchanged()
    );
    assert_eq!(
        host.navigate("https://old.example.org/r/foo", "main_frame"),
        BlockingResponse::unchanged()
    );
    assert_eq!(host.log.count(), 0);
}

#[test]
fn install_without_capability_logs_once() {
    let mut host = MemoryHost::new(false);
    let err = install(&mut host, Arc::new(example())).unwrap_err();
    assert!(matches!(err, RedirectError::CapabilityUnavailable { .. }));
    assert!(host.listeners.is_empty());
    assert_eq!(host.log.count(), 1);
    assert_eq!(
        host.navigate("https://www.example.org/", "main_frame"),
        BlockingResponse::unchanged()
    );
}

#[test]
fn redirector_is_shareable_across_threads() {
    let r = Arc::new(Redirector::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let r = Arc::clone(&r);
            std::thread::spawn(move || r.decide(&format!("https://www.reddit.com/r/{}", i)).unwrap())
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            Decision::RedirectTo(format!("https://old.reddit.com/r/{}", i))
        );
    }
}
