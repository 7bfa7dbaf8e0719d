//! Router core module - per-method tries plus the handler table.
//!
//! Registration happens on `&mut Router` before serving. Lookup only needs
//! `&Router`, so a served engine is shared read-only between coroutines.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;
use tracing::{debug, info};

use super::radix::{parse_pattern, Node};
use crate::context::{Context, HandlerFunc};

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 params (e.g. `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` since they are cut from registered patterns.
/// Values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The registered pattern that matched (e.g. `/p/:lang/doc`)
    pub pattern: Arc<str>,
    /// Path parameters extracted from the URL (`:lang` → `("lang", "go")`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics if the same name appears twice in a
    /// pattern.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Key of the handler table: `"{METHOD}-{pattern}"`
fn route_key(method: &Method, pattern: &str) -> String {
    let mut key = String::with_capacity(method.as_str().len() + 1 + pattern.len());
    key.push_str(method.as_str());
    key.push('-');
    key.push_str(pattern);
    key
}

/// Router that matches HTTP requests to handlers using one trie per method
///
/// Every trie-terminal node has a handler stored under the same method and
/// pattern. Both structures are only ever updated together in
/// [`Router::add_route`].
#[derive(Clone, Default)]
pub struct Router {
    /// Trie root per HTTP method, created on first registration
    roots: HashMap<Method, Node>,
    /// Handlers keyed by `method-pattern`
    handlers: HashMap<String, HandlerFunc>,
}

impl Router {
    /// Create an empty router
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// Registering the same method and pattern again replaces the handler.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = parse_pattern(pattern);
        let key = route_key(&method, pattern);

        self.roots
            .entry(method.clone())
            .or_insert_with(Node::root)
            .insert(pattern, &parts, 0);

        let replaced = self.handlers.insert(key, handler).is_some();
        info!(
            method = %method,
            pattern = %pattern,
            replaced = replaced,
            total_routes = self.handlers.len(),
            "Route registered"
        );
    }

    /// Match `method` and `path` against the registered routes.
    ///
    /// Returns `None` when nothing matches. A match without parameters is
    /// `Some` with empty `path_params`.
    #[must_use]
    pub fn get_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let search_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let root = self.roots.get(method)?;
        let node = root.search(&search_parts, 0)?;
        let pattern = Arc::clone(node.pattern()?);

        let mut path_params = ParamVec::new();
        for (index, part) in parse_pattern(&pattern).into_iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if let Some(value) = search_parts.get(index) {
                    path_params.push((Arc::from(name), (*value).to_string()));
                }
            }
            if let Some(name) = part.strip_prefix('*') {
                if !name.is_empty() {
                    let rest = search_parts.get(index..).unwrap_or_default().join("/");
                    path_params.push((Arc::from(name), rest));
                }
                break;
            }
        }

        Some(RouteMatch {
            pattern,
            path_params,
        })
    }

    /// Handler registered for exactly `method` and `pattern`
    #[must_use]
    pub fn handler(&self, method: &Method, pattern: &str) -> Option<&HandlerFunc> {
        self.handlers.get(&route_key(method, pattern))
    }

    /// Resolve the terminal handler for `ctx`, append it to the chain and
    /// run the chain.
    ///
    /// Unmatched requests get a handler writing `404 NOT FOUND: <path>`.
    pub fn handle(&self, ctx: &mut Context) {
        let matched = self.get_route(ctx.method(), ctx.path());
        let terminal = matched.and_then(|m| {
            let handler = self.handler(ctx.method(), &m.pattern).map(Arc::clone)?;
            debug!(
                method = %ctx.method(),
                path = %ctx.path(),
                route_pattern = %m.pattern,
                path_params = ?m.path_params,
                "Route matched"
            );
            ctx.set_params(m.path_params);
            Some(handler)
        });

        let terminal = terminal.unwrap_or_else(|| {
            debug!(method = %ctx.method(), path = %ctx.path(), "No route matched");
            not_found_handler()
        });

        ctx.push_handler(terminal);
        ctx.run();
    }

    /// All registered `(method, pattern)` pairs, sorted for stable output
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, Arc<str>)> {
        let mut routes = Vec::new();
        for (method, root) in &self.roots {
            let mut patterns = Vec::new();
            root.collect_patterns(&mut patterns);
            routes.extend(patterns.into_iter().map(|p| (method.clone(), p)));
        }
        routes.sort_by(|(ma, pa), (mb, pb)| (ma.as_str(), pa).cmp(&(mb.as_str(), pb)));
        routes
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        let routes = self.routes();
        println!("[routes] count={}", routes.len());
        for (method, pattern) in routes {
            println!("[route] {method} {pattern}");
        }
    }
}

fn not_found_handler() -> HandlerFunc {
    Arc::new(|ctx: &mut Context| {
        let body = format!("404 NOT FOUND: {}\n", ctx.path());
        ctx.string(404, body);
    })
}
