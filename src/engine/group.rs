use http::Method;
use tracing::info;

use super::core::Engine;
use crate::context::HandlerFunc;
use crate::static_files::StaticFiles;

/// One registered route group.
///
/// `prefix` is already expanded with every ancestor's prefix, so matching a
/// request against a group is a single `starts_with`.
pub(crate) struct GroupRecord {
    pub(crate) prefix: String,
    pub(crate) parent: Option<usize>,
    pub(crate) middlewares: Vec<HandlerFunc>,
}

impl GroupRecord {
    pub(crate) fn root() -> Self {
        Self {
            prefix: String::new(),
            parent: None,
            middlewares: Vec::new(),
        }
    }
}

/// Registration handle for a route group.
///
/// Obtained from [`Engine::group`] or [`RouterGroup::group`]. Routes added
/// through it get the group's prefix, and its middleware runs for every
/// request whose path starts with that prefix.
///
/// The handle borrows the engine mutably, so registration finishes before
/// the engine is shared for serving.
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    id: usize,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, id: usize) -> Self {
        Self { engine, id }
    }

    fn record(&self) -> &GroupRecord {
        &self.engine.groups[self.id]
    }

    /// Full prefix of this group
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.record().prefix
    }

    /// Full prefix of the enclosing group, `None` for the engine's root group
    #[must_use]
    pub fn parent_prefix(&self) -> Option<&str> {
        self.record()
            .parent
            .map(|parent| self.engine.groups[parent].prefix.as_str())
    }

    /// Create a child group whose prefix is this group's prefix + `prefix`
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let id = self.engine.push_group(self.id, prefix);
        RouterGroup::new(self.engine, id)
    }

    /// Append a middleware to this group
    pub fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.engine.groups[self.id].middlewares.push(middleware);
        self
    }

    /// Append several middleware, keeping their order
    pub fn use_middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.engine.groups[self.id].middlewares.extend(middlewares);
        self
    }

    /// Register `handler` for `method` at this group's prefix + `comp`
    pub fn add_route(&mut self, method: Method, comp: &str, handler: HandlerFunc) -> &mut Self {
        let pattern = format!("{}{}", self.prefix(), comp);
        self.engine.router.add_route(method, &pattern, handler);
        self
    }

    pub fn get(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::GET, comp, handler)
    }

    pub fn post(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::POST, comp, handler)
    }

    pub fn put(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::PUT, comp, handler)
    }

    pub fn delete(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::DELETE, comp, handler)
    }

    pub fn patch(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::PATCH, comp, handler)
    }

    pub fn head(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::HEAD, comp, handler)
    }

    pub fn options(&mut self, comp: &str, handler: HandlerFunc) -> &mut Self {
        self.add_route(Method::OPTIONS, comp, handler)
    }

    /// Serve files under `root` at `relative_path/*filepath`.
    ///
    /// Requests for missing files, or paths escaping `root`, get an empty 404.
    pub fn static_files(
        &mut self,
        relative_path: &str,
        root: impl Into<std::path::PathBuf>,
    ) -> &mut Self {
        let files = StaticFiles::new(root);
        let pattern = format!("{}/*filepath", relative_path.trim_end_matches('/'));
        info!(
            prefix = %self.prefix(),
            pattern = %pattern,
            root = %files.base_dir().display(),
            "Static directory mounted"
        );
        self.get(&pattern, files.handler())
    }
}
