//! Per-request context and the handler chain runner.
//!
//! # Chain model
//!
//! A request's chain is the middleware of every matching group followed by
//! one terminal handler (the route handler, or the 404 handler). A single
//! cursor walks it:
//!
//! - [`Context::next`] invokes the next handler and returns once that
//!   handler returns. A middleware that calls `next()` therefore resumes the
//!   rest of the chain before its own trailing statements run.
//! - A handler that returns without calling `next()` ends the chain.
//! - [`Context::fail`] writes a JSON error and abandons the chain entirely,
//!   including the trailing statements of every enclosing middleware.
//!
//! `fail` unwinds to the chain runner with a private payload. The runner
//! catches it (and any other panic escaping a handler), so nothing unwinds
//! past [`crate::Engine::handle`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::request::Request;
use super::response::{Response, APPLICATION_JSON, REQUEST_ID_HEADER, TEXT_HTML, TEXT_PLAIN};
use crate::ids::RequestId;
use crate::render::Renderer;
use crate::router::ParamVec;

/// A request handler or middleware.
///
/// Handlers receive exclusive access to the request's [`Context`] and
/// communicate only through it: writing the response, calling
/// [`Context::next`], or calling [`Context::fail`].
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Wrap a closure as a [`HandlerFunc`].
///
/// Gives the closure its `&mut Context` parameter type, so
/// `handler(|ctx| ctx.string(200, "ok"))` needs no annotation.
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Unwind payload used by [`Context::fail`]
struct Abort;

/// State of one request while its handler chain runs
pub struct Context {
    request: Request,
    response: Response,
    params: ParamVec,
    handlers: Vec<HandlerFunc>,
    /// Number of handlers already started. The next handler to run is
    /// `handlers[index]`.
    index: usize,
    status_code: Option<u16>,
    aborted: bool,
    request_id: RequestId,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Context {
    /// Create a context for `request` with an empty chain.
    ///
    /// The request id is taken from a valid `x-request-id` header, or
    /// generated, and echoed on the response.
    #[must_use]
    pub fn new(request: Request) -> Self {
        let request_id = RequestId::from_header_or_new(request.header("x-request-id"));
        let mut response = Response::default();
        response.set_header(REQUEST_ID_HEADER, request_id.to_string());
        Self {
            request,
            response,
            params: ParamVec::new(),
            handlers: Vec::new(),
            index: 0,
            status_code: None,
            aborted: false,
            request_id,
            renderer: None,
        }
    }

    pub(crate) fn set_renderer(&mut self, renderer: Option<Arc<dyn Renderer>>) {
        self.renderer = renderer;
    }

    pub(crate) fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
        self.handlers = handlers;
        self.index = 0;
    }

    pub(crate) fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    pub(crate) fn set_params(&mut self, params: ParamVec) {
        self.params = params;
    }

    // ---------------------------------------------------------------------
    // Request accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.request.path()
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Path parameter bound by the matched route (`:name` or `*name`)
    #[inline]
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn params(&self) -> &ParamVec {
        &self.params
    }

    /// URL query parameter
    #[must_use]
    pub fn query(&self, key: &str) -> Option<String> {
        self.request.query(key)
    }

    /// Form field from an urlencoded body, falling back to the query string
    #[must_use]
    pub fn post_form(&self, key: &str) -> Option<String> {
        self.request.post_form(key)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    // ---------------------------------------------------------------------
    // Response writers
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Status code set by a handler, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// True once [`Context::fail`] ran or a handler panic was contained
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn set_status(&mut self, code: u16) {
        self.status_code = Some(code);
        self.response.status = code;
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.response.set_header(name, value.into());
    }

    /// Write a plain-text body
    pub fn string(&mut self, code: u16, body: impl AsRef<str>) {
        self.set_header("content-type", TEXT_PLAIN);
        self.set_status(code);
        self.response.body.extend_from_slice(body.as_ref().as_bytes());
    }

    /// Serialize `obj` as the JSON body.
    ///
    /// If serialization fails nothing of `obj` is written; the response
    /// becomes a 500 carrying the serializer's error text.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: u16, obj: &T) {
        match serde_json::to_vec(obj) {
            Ok(bytes) => {
                self.set_header("content-type", APPLICATION_JSON);
                self.set_status(code);
                self.response.body.extend_from_slice(&bytes);
            }
            Err(e) => {
                warn!(
                    request_id = %self.request_id,
                    path = %self.path(),
                    error = %e,
                    "JSON serialization failed"
                );
                self.string(500, format!("{e}\n"));
            }
        }
    }

    /// Write raw bytes
    pub fn data(&mut self, code: u16, bytes: impl AsRef<[u8]>) {
        self.set_status(code);
        self.response.body.extend_from_slice(bytes.as_ref());
    }

    /// Render the named template with `data` as an HTML body.
    ///
    /// A missing renderer, unserializable data or a render error ends the
    /// chain through `fail(500, ..)`.
    pub fn html<T: Serialize + ?Sized>(&mut self, code: u16, name: &str, data: &T) {
        let Some(renderer) = self.renderer.as_ref().map(Arc::clone) else {
            self.fail(500, "no template renderer configured");
        };
        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => self.fail(500, &e.to_string()),
        };
        match renderer.render(name, &data) {
            Ok(body) => {
                self.set_header("content-type", TEXT_HTML);
                self.set_status(code);
                self.response.body.extend_from_slice(body.as_bytes());
            }
            Err(e) => {
                warn!(
                    request_id = %self.request_id,
                    template = %name,
                    error = %e,
                    "Template render failed"
                );
                self.fail(500, &e.to_string());
            }
        }
    }

    // ---------------------------------------------------------------------
    // Chain control
    // ---------------------------------------------------------------------

    /// Run the next handler of the chain, if any.
    pub fn next(&mut self) {
        if let Some(handler) = self.handlers.get(self.index).map(Arc::clone) {
            self.index += 1;
            handler(self);
        }
    }

    /// Abort the chain with `code` and the JSON body `{"message": message}`.
    ///
    /// Anything written so far is discarded, headers included (only
    /// `x-request-id` survives). No further handler runs, and
    /// code after `next()` in enclosing middleware does not run either.
    /// Must be called from inside a running chain.
    pub fn fail(&mut self, code: u16, message: &str) -> ! {
        self.abort_with(code, message);
        panic::resume_unwind(Box::new(Abort))
    }

    fn abort_with(&mut self, code: u16, message: &str) {
        self.index = self.handlers.len();
        self.aborted = true;
        self.response.clear_for_error();
        self.json(code, &serde_json::json!({ "message": message }));
    }

    /// Run the chain from its start, containing aborts and panics.
    pub(crate) fn run(&mut self) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.next()));
        let Err(payload) = outcome else {
            return;
        };

        if is_abort(payload.as_ref()) {
            debug!(
                request_id = %self.request_id,
                path = %self.path(),
                status = self.response.status,
                "Handler chain aborted"
            );
            return;
        }

        let panic_message = panic_message(payload.as_ref());
        error!(
            request_id = %self.request_id,
            method = %self.method(),
            path = %self.path(),
            panic_message = %panic_message,
            "Handler panicked"
        );
        self.abort_with(500, "Internal Server Error");
    }

    /// Consume the context, yielding the buffered response
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }
}

/// True when `payload` is the unwind payload of [`Context::fail`]
pub(crate) fn is_abort(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Abort>()
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
