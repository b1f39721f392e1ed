//! WebAssembly bindings for OldRedirect
//!
//! Resolves the browser's `webRequest.onBeforeRequest` event (Firefox
//! `browser` namespace first, then Chromium `chrome`) and installs the
//! blocking redirect listener on it.

use std::sync::{Arc, OnceLock};

use js_sys::{Array, Function, Object, Reflect};
use oldr_core::{
    filter::BLOCKING, install, BlockingResponse, DiagnosticLog, InterceptionHost, RedirectError,
    Redirector, RequestDetails, RequestFilter, RequestHandler, RequestType,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

static REDIRECTOR: OnceLock<Arc<Redirector>> = OnceLock::new();

fn redirector() -> &'static Arc<Redirector> {
    REDIRECTOR.get_or_init(|| Arc::new(Redirector::default()))
}

// =============================================================================
// Exports
// =============================================================================

/// Register the listener. Returns false when the browser has no
/// blocking webRequest API (the error is logged to the console).
#[wasm_bindgen]
pub fn start() -> bool {
    let mut host = WebExtensionHost::detect();
    install(&mut host, Arc::clone(redirector())).is_ok()
}

/// Decide a single URL. Returns `{}` or `{ redirectUrl }`, the same shape
/// the listener hands back to the browser.
#[wasm_bindgen]
pub fn decide(url: &str) -> JsValue {
    let decision = redirector().decide_or_unchanged(url, &ConsoleDiagnostics);
    blocking_response_to_js(&decision.into()).into()
}

#[wasm_bindgen]
pub fn classify_host(host: &str) -> String {
    redirector().classify_host(host).as_str().to_string()
}

/// The `{ urls, types }` filter passed to `addListener`.
#[wasm_bindgen]
pub fn filter_spec() -> JsValue {
    filter_to_js(&RequestFilter::for_config(redirector().config())).into()
}

// =============================================================================
// Host
// =============================================================================

struct ConsoleDiagnostics;

impl DiagnosticLog for ConsoleDiagnostics {
    fn error(&self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
    }
}

/// The browser's webRequest API, if present.
struct WebExtensionHost {
    on_before_request: Option<Object>,
}

impl WebExtensionHost {
    fn detect() -> Self {
        let global: JsValue = js_sys::global().into();
        let on_before_request = ["browser", "chrome"]
            .iter()
            .find_map(|namespace| lookup_on_before_request(&global, namespace));
        Self { on_before_request }
    }
}

fn lookup_on_before_request(global: &JsValue, namespace: &str) -> Option<Object> {
    let api = get_object(global, namespace)?;
    let web_request = get_object(&api, "webRequest")?;
    get_object(&web_request, "onBeforeRequest")
}

fn get_object(target: &JsValue, key: &str) -> Option<Object> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| value.is_object())
        .map(|value| value.unchecked_into::<Object>())
}

fn unavailable(reason: impl Into<String>) -> RedirectError {
    RedirectError::CapabilityUnavailable {
        reason: reason.into(),
    }
}

impl InterceptionHost for WebExtensionHost {
    fn diagnostics(&self) -> Arc<dyn DiagnosticLog> {
        Arc::new(ConsoleDiagnostics)
    }

    fn register_blocking(
        &mut self,
        filter: &RequestFilter,
        handler: RequestHandler,
    ) -> Result<(), RedirectError> {
        let event = self
            .on_before_request
            .as_ref()
            .ok_or_else(|| unavailable("The WebRequest API is not available in this browser."))?;

        let add_listener: Function = Reflect::get(event, &"addListener".into())
            .ok()
            .and_then(|value| value.dyn_into().ok())
            .ok_or_else(|| unavailable("onBeforeRequest.addListener is not a function"))?;

        let callback = Closure::wrap(Box::new(move |details: JsValue| -> JsValue {
            let details = RequestDetails {
                url: get_string(&details, "url"),
                request_type: RequestType::from_str(&get_string(&details, "type")),
            };
            blocking_response_to_js(&handler(&details)).into()
        }) as Box<dyn Fn(JsValue) -> JsValue>);

        let extra_info = Array::of1(&JsValue::from_str(BLOCKING));
        add_listener
            .call3(
                event,
                callback.as_ref().unchecked_ref(),
                &filter_to_js(filter),
                &extra_info,
            )
            .map_err(|e| unavailable(format!("addListener failed: {:?}", e)))?;

        // The browser keeps the listener for the lifetime of the extension.
        callback.forget();
        Ok(())
    }
}

// =============================================================================
// Conversions
// =============================================================================

fn get_string(target: &JsValue, key: &str) -> String {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

fn blocking_response_to_js(response: &BlockingResponse) -> Object {
    let result = Object::new();
    if let Some(url) = &response.redirect_url {
        let _ = Reflect::set(&result, &"redirectUrl".into(), &JsValue::from_str(url));
    }
    result
}

fn filter_to_js(filter: &RequestFilter) -> Object {
    let urls = Array::new();
    for pattern in filter.url_patterns() {
        urls.push(&JsValue::from_str(&pattern));
    }
    let types = Array::new();
    for name in filter.types().browser_names() {
        types.push(&JsValue::from_str(name));
    }

    let result = Object::new();
    let _ = Reflect::set(&result, &"urls".into(), &urls);
    let _ = Reflect::set(&result, &"types".into(), &types);
    result
}
