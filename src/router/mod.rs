//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Storing registered patterns in one segment trie per HTTP method
//! - Mapping each `(method, pattern)` to its handler
//! - Matching incoming requests and extracting path parameters
//! - Appending the resolved handler (or a 404 handler) to a request's chain
//!
//! ## Pattern syntax
//!
//! Patterns are split on `/` with empty segments dropped:
//!
//! - `users` matches the literal segment
//! - `:id` matches exactly one segment and binds it as `id`
//! - `*filepath` matches all remaining segments and binds them joined by `/`;
//!   anything after it in the pattern is ignored
//!
//! Literal segments take precedence over wildcards at the same depth.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use grove::{router::Router, Context};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/p/:lang/doc", Arc::new(|_ctx: &mut Context| {}));
//!
//! let m = router.get_route(&Method::GET, "/p/go/doc").unwrap();
//! assert_eq!(&*m.pattern, "/p/:lang/doc");
//! assert_eq!(m.get_path_param("lang"), Some("go"));
//! ```

mod core;
mod radix;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
