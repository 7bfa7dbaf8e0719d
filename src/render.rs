//! HTML template rendering used by [`crate::Context::html`].
//!
//! The engine holds at most one [`Renderer`]. [`Templates`] is the bundled
//! implementation on top of `minijinja`; anything else implementing the
//! trait can be plugged in with [`crate::Engine::set_renderer`].

use std::fmt;
use std::path::Path;

use minijinja::{Environment, ErrorKind};
use serde_json::Value;
use tracing::debug;

/// Renders named templates with JSON data
pub trait Renderer: Send + Sync {
    /// Render template `name` with `data` as its context
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError>;
}

/// Template rendering failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No template with that name is known to the renderer
    TemplateNotFound { name: String },
    /// The template exists but could not be compiled or evaluated
    Render { name: String, message: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateNotFound { name } => write!(f, "template not found: {name}"),
            RenderError::Render { name, message } => {
                write!(f, "failed to render template {name}: {message}")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// `minijinja`-backed template set
pub struct Templates {
    env: Environment<'static>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    /// Empty template set; add sources with [`Templates::add_template`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Template set loading `name` from `dir/name` on first use
    #[must_use]
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir.as_ref()));
        debug!(dir = %dir.as_ref().display(), "Template directory registered");
        Self { env }
    }

    /// Register a template from source.
    ///
    /// Syntax errors are reported here rather than at render time.
    pub fn add_template(
        &mut self,
        name: &str,
        source: impl Into<String>,
    ) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.into())
            .map_err(|e| RenderError::Render {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Underlying environment, for registering filters and globals
    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Renderer for Templates {
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound {
                name: name.to_string(),
            },
            _ => RenderError::Render {
                name: name.to_string(),
                message: e.to_string(),
            },
        })?;
        template.render(data).map_err(|e| RenderError::Render {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}
