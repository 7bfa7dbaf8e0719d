//! # Engine Module
//!
//! The [`Engine`] owns the [`crate::router::Router`], the list of route
//! groups and the template renderer. It is configured through `&mut self`
//! and then served read-only, either in-process through
//! [`Engine::handle`] or on the network through [`Engine::run`].
//!
//! ## Groups
//!
//! Groups share a path prefix. Nested groups concatenate prefixes:
//!
//! ```rust
//! use grove::{handler, Engine};
//!
//! let mut engine = Engine::new();
//! {
//!     let mut v2 = engine.group("/v2");
//!     v2.use_middleware(handler(|ctx| ctx.next()));
//!     let mut admin = v2.group("/admin");
//!     admin.get("/stats", handler(|ctx| ctx.string(200, "ok")));
//!     assert_eq!(admin.prefix(), "/v2/admin");
//!     assert_eq!(admin.parent_prefix(), Some("/v2"));
//! }
//! assert_eq!(engine.group_prefixes(), vec!["", "/v2", "/v2/admin"]);
//! ```
//!
//! A request runs the middleware of every group whose prefix starts its
//! path, in group creation order, then the route handler.

mod core;
mod group;

pub use core::Engine;
pub use group::RouterGroup;
