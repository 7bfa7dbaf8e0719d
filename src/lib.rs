//! # grove
//!
//! **grove** is an embeddable HTTP router for Rust: a per-method segment
//! trie, route groups sharing a path prefix, and an onion-style middleware
//! chain, served on `may` coroutines through `may_minihttp`.
//!
//! ## Architecture
//!
//! - **[`router`]** - segment trie per HTTP method and the handler table
//! - **[`context`]** - per-request [`Context`], [`Request`] and buffered [`Response`]
//! - **[`engine`]** - the [`Engine`] and its [`RouterGroup`]s
//! - **[`middleware`]** - logger, recovery and metrics middleware
//! - **[`render`]** - the [`Renderer`] trait and `minijinja` [`Templates`]
//! - **[`static_files`]** - serving a directory under a route prefix
//! - **[`server`]** - `may_minihttp` transport adapter
//! - **[`logging`]** / **[`runtime_config`]** - process setup for binaries
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as server::EngineService
//!     participant Engine
//!     participant Router
//!     participant Chain as Context chain
//!
//!     Client->>Server: HTTP request
//!     Server->>Engine: handle(Request)
//!     Engine->>Engine: collect middleware of matching groups
//!     Engine->>Router: handle(ctx)
//!     Router->>Router: trie search, bind params
//!     Router->>Chain: append route or 404 handler, run
//!     Chain->>Chain: middleware A -> next() -> ... -> handler
//!     Chain-->>Engine: buffered Response
//!     Engine-->>Server: Response
//!     Server-->>Client: status, headers, body
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use grove::{handler, middleware, Engine, Request};
//! use http::Method;
//!
//! let mut engine = Engine::new();
//! engine.use_middleware(middleware::recovery());
//! engine.get("/hello/:name", handler(|ctx| {
//!     let body = format!("hello {}", ctx.param("name").unwrap_or_default());
//!     ctx.string(200, body);
//! }));
//!
//! {
//!     let mut v1 = engine.group("/v1");
//!     v1.use_middleware(handler(|ctx| {
//!         ctx.set_header("x-api", "v1");
//!         ctx.next();
//!     }));
//!     v1.post("/login", handler(|ctx| {
//!         let user = ctx.post_form("username").unwrap_or_default();
//!         ctx.json(200, &serde_json::json!({ "username": user }));
//!     }));
//! }
//!
//! let res = engine.handle(Request::new(Method::GET, "/hello/grove"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body_text(), "hello grove");
//!
//! let res = engine.handle(Request::new(Method::GET, "/nope"));
//! assert_eq!(res.status, 404);
//! assert_eq!(res.body_text(), "404 NOT FOUND: /nope\n");
//! ```
//!
//! Serving on the network instead:
//!
//! ```rust,no_run
//! # let engine = grove::Engine::with_defaults();
//! engine.run("127.0.0.1:9999")?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Chain semantics
//!
//! - A middleware continues the chain with [`Context::next`]; code after the
//!   call runs once everything downstream returned.
//! - Returning without calling `next()` ends the chain there.
//! - [`Context::fail`] replaces the response with `{"message": ..}` and ends
//!   the whole chain, including the code after `next()` in every enclosing
//!   middleware.
//! - A panicking handler never takes the server down; it becomes a 500.

pub mod cli;
pub mod context;
pub mod engine;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod render;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod static_files;

pub use context::{handler, Context, HandlerFunc, Request, Response};
pub use engine::{Engine, RouterGroup};
pub use ids::RequestId;
pub use render::{RenderError, Renderer, Templates};
pub use router::Router;
pub use static_files::StaticFiles;
