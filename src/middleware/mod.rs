//! # Middleware Module
//!
//! Middleware are ordinary [`crate::HandlerFunc`]s registered on a group.
//! They run before the route handler of every request whose path starts
//! with the group's prefix, and resume the chain with
//! [`crate::Context::next`].
//!
//! Bundled middleware:
//! - [`logger`] - access log line per request
//! - [`recovery`] - turns handler panics into a 500 JSON error
//! - [`Metrics`] - request counters with a Prometheus text endpoint
//!
//! Hook-style middleware can implement [`Middleware`] and be wrapped with
//! [`from_middleware`].

mod core;
mod logger;
mod metrics;
mod recovery;

pub use core::{from_middleware, Middleware};
pub use logger::{logger, Logger};
pub use metrics::Metrics;
pub use recovery::recovery;
