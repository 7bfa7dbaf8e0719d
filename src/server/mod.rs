//! # Server Module
//!
//! Adapter between the `may_minihttp` transport and the [`crate::Engine`].
//!
//! - [`parse_request`] turns a wire request into a [`crate::Request`]
//! - [`write_response`] writes a buffered [`crate::Response`] back
//! - [`EngineService`] glues both around [`crate::Engine::handle`]
//! - [`HttpServer`] / [`ServerHandle`] start and stop the listener
//!
//! Each connection is served on its own `may` coroutine.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{build_request, parse_request, RequestError};
pub use response::{write_response, MAX_INTERNED_HEADER_LINES};
pub use service::EngineService;
