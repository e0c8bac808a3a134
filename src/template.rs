//! Pluggable template rendering.
//!
//! The framework does not mandate a template language. Handlers call
//! [`Context::render`](crate::context::Context::render), which delegates to
//! whatever [`TemplateEngine`] the server was configured with. A
//! MiniJinja-backed engine ships by default; applications can implement the
//! trait over any other renderer.

use std::sync::Arc;

use minijinja::Environment;
use thiserror::Error;

use crate::context::Context;

/// Errors surfaced by template rendering.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// [`Context::render`] was called but no engine is configured.
    ///
    /// [`Context::render`]: crate::context::Context::render
    #[error("no template engine configured")]
    NoEngine,
    /// The engine failed to load or evaluate the template.
    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Renders a named template against JSON data.
///
/// The request context is passed read-only so engines can vary output on
/// request attributes (negotiated language, matched route) without the
/// handler threading them through the data value.
pub trait TemplateEngine: Send + Sync {
    /// Render `name` with `data`, returning the output bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] when the template is missing or fails to
    /// evaluate.
    fn render(
        &self,
        ctx: &Context<'_>,
        name: &str,
        data: &serde_json::Value,
    ) -> Result<Vec<u8>, TemplateError>;
}

/// [`TemplateEngine`] backed by an in-memory MiniJinja environment.
#[derive(Default)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the template source fails to parse.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    /// Convenience wrapper producing the `Arc` form the server expects.
    ///
    /// # Errors
    ///
    /// Returns an error when any template source fails to parse.
    pub fn from_templates<'a, I>(templates: I) -> Result<Arc<dyn TemplateEngine>, TemplateError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut engine = Self::new();
        for (name, source) in templates {
            engine.add_template(name, source)?;
        }
        Ok(Arc::new(engine))
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(
        &self,
        _ctx: &Context<'_>,
        name: &str,
        data: &serde_json::Value,
    ) -> Result<Vec<u8>, TemplateError> {
        let template = self.env.get_template(name)?;
        let rendered = template.render(data)?;
        Ok(rendered.into_bytes())
    }
}
