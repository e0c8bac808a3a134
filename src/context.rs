//! Per-request context carried through the middleware pipeline.
//!
//! A [`Context`] is constructed by the dispatcher for every inbound request,
//! owned exclusively by the coroutine serving that request, and discarded
//! after the buffered response has been flushed. Handlers and middleware
//! communicate only by mutating it: the outbound status and body are
//! buffered, never written to the transport directly, so post-processing
//! middleware can still rewrite them after the wrapped handler has returned.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use tracing::{error, warn};

use crate::server::ParsedRequest;
use crate::template::{TemplateEngine, TemplateError};

/// Maximum number of path parameters before heap allocation.
/// Most route templates have well under 8 named segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated path-parameter storage.
///
/// Names come from the static routing tree and are shared as `Arc<str>`;
/// values are per-request captures from the URL. Pairs are stored in
/// left-to-right template order.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Outbound seam between the context and the host HTTP stack.
///
/// The finalization layer calls [`Transport::send`] exactly once per request
/// with the buffered response state. Implemented for
/// `may_minihttp::Response`; tests supply their own capture implementations.
pub trait Transport {
    /// Write a complete response to the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns any transport-level write failure. The caller logs and
    /// swallows it; a partially written HTTP response cannot be retried.
    fn send(&mut self, status: u16, headers: &[(String, String)], body: Vec<u8>) -> io::Result<()>;
}

/// Per-request mutable state.
///
/// The lifetime parameter ties the context to the outbound transport for the
/// duration of one request.
pub struct Context<'t> {
    /// HTTP method of the inbound request.
    pub method: Method,
    /// Request path with the query string stripped.
    pub path: String,
    /// Inbound headers, keys lowercased.
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters.
    pub query_params: HashMap<String, String>,
    /// Raw request body, if one was sent.
    pub body: Option<Vec<u8>>,
    /// Template of the matched route (e.g. `/user/:id`), set on a route hit.
    pub matched_route: Option<Arc<str>>,

    path_params: ParamVec,
    status: u16,
    resp_body: Vec<u8>,
    resp_headers: Vec<(String, String)>,
    engine: Option<Arc<dyn TemplateEngine>>,
    transport: &'t mut dyn Transport,
    finalized: bool,
}

impl<'t> Context<'t> {
    /// Build a fresh context for one inbound request.
    pub fn new(
        parsed: ParsedRequest,
        engine: Option<Arc<dyn TemplateEngine>>,
        transport: &'t mut dyn Transport,
    ) -> Self {
        Self {
            method: parsed.method,
            path: parsed.path,
            headers: parsed.headers,
            query_params: parsed.query_params,
            body: parsed.body,
            matched_route: None,
            path_params: ParamVec::new(),
            status: 0,
            resp_body: Vec::new(),
            resp_headers: Vec::new(),
            engine,
            transport,
            finalized: false,
        }
    }

    /// Buffer the outbound status code. Last write wins; `0` means unset and
    /// finalizes as 200.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    /// Buffer the outbound body. Last write wins.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.resp_body = body.into();
    }

    /// Buffer an outbound header, replacing any previous value for the same
    /// name (case-insensitive).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.resp_headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.resp_headers.push((name.to_string(), value.into()));
    }

    /// Currently buffered status code (`0` = unset).
    #[must_use]
    pub fn response_status(&self) -> u16 {
        self.status
    }

    /// Currently buffered body bytes.
    #[must_use]
    pub fn response_body(&self) -> &[u8] {
        &self.resp_body
    }

    /// Look up a path parameter captured from the matched route template.
    ///
    /// Uses last-write-wins semantics when the same name occurs at several
    /// template depths.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// All captured path parameters in left-to-right template order.
    #[must_use]
    pub fn path_params(&self) -> &ParamVec {
        &self.path_params
    }

    pub(crate) fn set_path_params(&mut self, params: ParamVec) {
        self.path_params = params;
    }

    /// Look up a query string parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Look up an inbound header (case-insensitive per RFC 7230).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Deserialize the request body as JSON.
    ///
    /// # Errors
    ///
    /// Fails when the body is missing or is not valid JSON for `T`.
    pub fn bind_json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match &self.body {
            Some(bytes) => serde_json::from_slice(bytes),
            None => serde_json::from_slice(b""),
        }
    }

    /// Render a template through the configured engine and buffer the output
    /// as the response body with a `text/html` content type.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NoEngine`] when no engine is configured, or
    /// the engine's own error. On failure the buffered status is set to 500
    /// so a response is still produced if the handler ignores the error.
    pub fn render(&mut self, name: &str, data: &serde_json::Value) -> Result<(), TemplateError> {
        let engine = match &self.engine {
            Some(engine) => Arc::clone(engine),
            None => {
                self.set_status(500);
                return Err(TemplateError::NoEngine);
            }
        };
        match engine.render(self, name, data) {
            Ok(bytes) => {
                self.set_header("Content-Type", "text/html");
                self.set_body(bytes);
                Ok(())
            }
            Err(err) => {
                self.set_status(500);
                Err(err)
            }
        }
    }

    /// Flush the buffered status, headers, and body to the transport.
    ///
    /// Runs exactly once per request; a second call logs a warning and does
    /// nothing. Transport errors are logged, never propagated - the request
    /// is already over and a partial HTTP response cannot be resumed.
    pub(crate) fn finalize(&mut self) {
        if self.finalized {
            warn!(
                method = %self.method,
                path = %self.path,
                "response already finalized"
            );
            return;
        }
        self.finalized = true;
        let status = if self.status == 0 { 200 } else { self.status };
        let headers = std::mem::take(&mut self.resp_headers);
        let body = std::mem::take(&mut self.resp_body);
        if let Err(err) = self.transport.send(status, &headers, body) {
            error!(
                method = %self.method,
                path = %self.path,
                status = status,
                error = %err,
                "failed to write response"
            );
        }
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("matched_route", &self.matched_route)
            .field("status", &self.status)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}
