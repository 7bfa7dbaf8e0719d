use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::{Context, HandlerFunc};

/// Hook-style middleware.
///
/// Most middleware only needs to act before and after the rest of the
/// chain. Implement this trait and wrap it with [`from_middleware`] instead
/// of writing the `next()` call by hand.
pub trait Middleware: Send + Sync {
    /// Runs before the rest of the chain. Calling `ctx.fail(..)` here rejects
    /// the request.
    fn before(&self, _ctx: &mut Context) {}

    /// Runs after the rest of the chain, including when it was aborted with
    /// `fail`. `ctx.response()` holds what was written so far.
    fn after(&self, _ctx: &mut Context, _latency: Duration) {}
}

/// Turn a hook-style [`Middleware`] into a chain handler
pub fn from_middleware<M: Middleware + 'static>(middleware: Arc<M>) -> HandlerFunc {
    Arc::new(move |ctx: &mut Context| {
        middleware.before(ctx);
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| ctx.next()));
        middleware.after(ctx, start.elapsed());
        if let Err(payload) = outcome {
            panic::resume_unwind(payload);
        }
    })
}
