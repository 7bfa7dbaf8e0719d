//! Demo application served by `grove serve`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::info;

use crate::context::{handler, Context};
use crate::engine::Engine;
use crate::middleware::Metrics;

/// Optional parts of the demo application
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Served under `/assets/*filepath`
    pub static_dir: Option<PathBuf>,
    /// Enables `GET /index` rendering `index.html`
    pub templates: Option<PathBuf>,
}

#[allow(clippy::panic)]
fn panic_handler(_ctx: &mut Context) {
    panic!("intentional panic from /panic");
}

/// Middleware timing the `/v2` group only
fn v2_timer(ctx: &mut Context) {
    let start = Instant::now();
    ctx.next();
    info!(
        path = %ctx.path(),
        status = ctx.response().status,
        elapsed_us = start.elapsed().as_micros() as u64,
        "v2 request timed"
    );
}

/// Build the demo engine
#[must_use]
pub fn demo_engine(options: &DemoOptions) -> Engine {
    let metrics = Arc::new(Metrics::new());
    let mut engine = Engine::with_defaults();
    engine.use_middleware(metrics.middleware());

    engine
        .get("/", handler(|ctx| ctx.string(200, "Hello Grove\n")))
        .get(
            "/hello",
            handler(|ctx| {
                let name = ctx.query("name").unwrap_or_default();
                let body = format!("hello {name}, you're at {}\n", ctx.path());
                ctx.string(200, body);
            }),
        )
        .get(
            "/hello/:name",
            handler(|ctx| {
                let name = ctx.param("name").unwrap_or_default().to_string();
                let body = format!("hello {name}, you're at {}\n", ctx.path());
                ctx.string(200, body);
            }),
        )
        .get("/panic", handler(panic_handler))
        .get("/metrics", metrics.endpoint());

    match &options.static_dir {
        Some(dir) => {
            engine.static_files("/assets", dir.clone());
        }
        None => {
            engine.get(
                "/assets/*filepath",
                handler(|ctx| {
                    let filepath = ctx.param("filepath").unwrap_or_default().to_string();
                    ctx.json(200, &json!({ "filepath": filepath }));
                }),
            );
        }
    }

    if let Some(dir) = &options.templates {
        engine.load_html_dir(dir).get(
            "/index",
            handler(|ctx| {
                let data = json!({ "title": "grove", "path": ctx.path() });
                ctx.html(200, "index.html", &data);
            }),
        );
    }

    {
        let mut v1 = engine.group("/v1");
        v1.get(
            "/hello",
            handler(|ctx| {
                let name = ctx.query("name").unwrap_or_default();
                let body = format!("hello {name}, you're at {}\n", ctx.path());
                ctx.string(200, body);
            }),
        );
    }

    {
        let mut v2 = engine.group("/v2");
        v2.use_middleware(handler(v2_timer));
        v2.get(
            "/hello/:name",
            handler(|ctx| {
                let body = format!(
                    "hello {}, you're at {}\n",
                    ctx.param("name").unwrap_or_default(),
                    ctx.path()
                );
                ctx.string(200, body);
            }),
        )
        .post(
            "/login",
            handler(|ctx| {
                let (Some(username), Some(password)) =
                    (ctx.post_form("username"), ctx.post_form("password"))
                else {
                    ctx.fail(400, "username and password are required");
                };
                ctx.json(200, &json!({ "username": username, "password": password }));
            }),
        );
    }

    engine
}
