use std::io;
use std::net::ToSocketAddrs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::Method;
use tracing::{info, info_span};

use super::group::{GroupRecord, RouterGroup};
use crate::context::{Context, HandlerFunc, Request, Response};
use crate::middleware::{logger, recovery};
use crate::render::{Renderer, Templates};
use crate::router::Router;
use crate::server::{EngineService, HttpServer, ServerHandle};

/// Index of the root group, whose prefix is empty
const ROOT_GROUP: usize = 0;

/// Top-level application object: the router, every route group and the
/// optional template renderer.
///
/// The engine is itself the root group: routes and middleware registered
/// directly on it apply to every request.
pub struct Engine {
    pub(crate) router: Router,
    /// Groups in creation order, root first
    pub(crate) groups: Vec<GroupRecord>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with no middleware
    #[must_use]
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            groups: vec![GroupRecord::root()],
            renderer: None,
        }
    }

    /// Engine with the [`logger`] and [`recovery`] middleware installed
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.use_middlewares([logger(), recovery()]);
        engine
    }

    fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, ROOT_GROUP)
    }

    /// Create a group whose routes and middleware live under `prefix`
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let id = self.push_group(ROOT_GROUP, prefix);
        RouterGroup::new(self, id)
    }

    /// Register a child of group `parent` and return its index
    pub(crate) fn push_group(&mut self, parent: usize, prefix: &str) -> usize {
        let full = format!("{}{}", self.groups[parent].prefix, prefix);
        info!(
            prefix = %full,
            parent = %self.groups[parent].prefix,
            "Route group created"
        );
        self.groups.push(GroupRecord {
            prefix: full,
            parent: Some(parent),
            middlewares: Vec::new(),
        });
        self.groups.len() - 1
    }

    pub fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.root().use_middleware(middleware);
        self
    }

    pub fn use_middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.root().use_middlewares(middlewares);
        self
    }

    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.root().add_route(method, pattern, handler);
        self
    }

    pub fn get(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::DELETE, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::PATCH, pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::HEAD, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::OPTIONS, pattern, handler)
    }

    /// Serve files under `root` at `relative_path/*filepath`
    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        self.root().static_files(relative_path, root);
        self
    }

    /// Use `renderer` for [`Context::html`]
    pub fn set_renderer(&mut self, renderer: impl Renderer + 'static) -> &mut Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Render [`Context::html`] templates from files in `dir`
    pub fn load_html_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        info!(dir = %dir.as_ref().display(), "Loading HTML templates");
        self.set_renderer(Templates::from_dir(dir))
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Full prefixes of all groups in creation order (root `""` first)
    #[must_use]
    pub fn group_prefixes(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.prefix.as_str()).collect()
    }

    /// Run `request` through the middleware of every group whose prefix
    /// starts its path, then the matched route handler (or the 404
    /// handler), and return the buffered response.
    #[must_use]
    pub fn handle(&self, request: Request) -> Response {
        let mut ctx = Context::new(request);
        let span = info_span!(
            "request",
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path()
        );
        let _enter = span.enter();

        let middlewares: Vec<HandlerFunc> = self
            .groups
            .iter()
            .filter(|group| ctx.path().starts_with(group.prefix.as_str()))
            .flat_map(|group| group.middlewares.iter().map(Arc::clone))
            .collect();
        ctx.set_handlers(middlewares);
        ctx.set_renderer(self.renderer.as_ref().map(Arc::clone));

        self.router.handle(&mut ctx);
        ctx.into_response()
    }

    /// Start serving on `addr` in the background
    pub fn serve<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let handle = HttpServer(EngineService::new(Arc::new(self))).start(addr)?;
        info!(addr = %handle.addr(), "Server listening");
        Ok(handle)
    }

    /// Serve on `addr` until the server stops
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> io::Result<()> {
        self.serve(addr)?
            .join()
            .map_err(|_| io::Error::other("server coroutine panicked"))
    }
}
