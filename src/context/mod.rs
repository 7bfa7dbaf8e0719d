//! # Context Module
//!
//! Per-request state handed to every handler in a chain.
//!
//! - [`Request`] - transport-independent method, path, query, headers, body
//! - [`Response`] - buffered status, headers and body
//! - [`Context`] - both of the above plus path params, the resolved
//!   handler chain and its cursor
//!
//! A `Context` is created per request by [`crate::Engine::handle`], mutated
//! by the handlers of that request only, and consumed into its `Response`
//! once the chain is done.

mod core;
mod request;
mod response;

pub use core::{handler, Context, HandlerFunc};
pub(crate) use core::{is_abort, panic_message};
pub use request::Request;
pub use response::{status_reason, HeaderVec, Response, MAX_INLINE_HEADERS};
pub(crate) use response::{APPLICATION_JSON, REQUEST_ID_HEADER, TEXT_HTML, TEXT_PLAIN};
