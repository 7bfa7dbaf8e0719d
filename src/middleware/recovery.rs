use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

use crate::context::{is_abort, panic_message, Context, HandlerFunc};

/// Recovery middleware.
///
/// Catches a panic raised further down the chain, logs it and answers
/// `500 {"message": "Internal Server Error"}`. Aborts from
/// [`Context::fail`] pass through untouched.
#[must_use]
pub fn recovery() -> HandlerFunc {
    Arc::new(|ctx: &mut Context| {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| ctx.next()));
        let Err(payload) = outcome else {
            return;
        };
        if is_abort(payload.as_ref()) {
            panic::resume_unwind(payload);
        }
        error!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            panic_message = %panic_message(payload.as_ref()),
            "Recovered from handler panic"
        );
        ctx.fail(500, "Internal Server Error");
    })
}
