use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{from_middleware, Middleware};
use crate::context::{Context, HandlerFunc};

/// Access log middleware.
///
/// Logs one `info` line per request once the rest of the chain is done.
pub struct Logger;

impl Middleware for Logger {
    fn after(&self, ctx: &mut Context, latency: Duration) {
        info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status = ctx.response().status,
            latency_us = latency.as_micros() as u64,
            aborted = ctx.is_aborted(),
            "Request completed"
        );
    }
}

/// [`Logger`] as a chain handler
#[must_use]
pub fn logger() -> HandlerFunc {
    from_middleware(Arc::new(Logger))
}
