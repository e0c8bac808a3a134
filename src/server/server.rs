//! Application-facing registration surface.

use std::io;
use std::net::ToSocketAddrs;
use std::sync::Arc;

use http::Method;

use super::http_server::{HttpServer, ServerHandle};
use super::service::AppService;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::middleware::{Handler, Middleware};
use crate::router::{RouteError, Router};
use crate::runtime_config::RuntimeConfig;
use crate::template::TemplateEngine;

/// Builder for an application: routes, global middleware, and an optional
/// template engine, turned into a [`Dispatcher`] when serving starts.
///
/// Registration happens single-threaded before `start`; the built dispatcher
/// is immutable and shared across serving coroutines.
pub struct Server {
    router: Router,
    middlewares: Vec<Middleware>,
    engine: Option<Arc<dyn TemplateEngine>>,
    config: RuntimeConfig,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    /// Create a server with runtime settings read from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::from_env())
    }

    /// Create a server with explicit runtime settings.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            router: Router::new(),
            middlewares: Vec::new(),
            engine: None,
            config,
        }
    }

    /// Add a global middleware. Global middleware wrap every request in
    /// registration order, first registered outermost.
    pub fn wrap(&mut self, middleware: Middleware) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Install the template engine used by [`Context::render`].
    ///
    /// [`Context::render`]: crate::context::Context::render
    pub fn set_template_engine(&mut self, engine: Arc<dyn TemplateEngine>) -> &mut Self {
        self.engine = Some(engine);
        self
    }

    /// Register a handler with per-route middleware.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts with
    /// an existing registration.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
        middlewares: Vec<Middleware>,
    ) -> Result<(), RouteError> {
        self.router.register(method, path, Some(handler), middlewares)
    }

    /// Attach middleware to a path prefix without a handler.
    ///
    /// The middleware run for every matched route at or below that prefix,
    /// after global middleware and before deeper prefix middleware.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts with
    /// an existing registration.
    pub fn middleware_at(
        &mut self,
        method: Method,
        path: &str,
        middlewares: Vec<Middleware>,
    ) -> Result<(), RouteError> {
        self.router.register(method, path, None, middlewares)
    }

    /// Register a `GET` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn get<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::GET, path, Arc::new(handler), Vec::new())
    }

    /// Register a `HEAD` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn head<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::HEAD, path, Arc::new(handler), Vec::new())
    }

    /// Register a `POST` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn post<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::POST, path, Arc::new(handler), Vec::new())
    }

    /// Register a `PUT` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn put<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::PUT, path, Arc::new(handler), Vec::new())
    }

    /// Register a `PATCH` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn patch<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::PATCH, path, Arc::new(handler), Vec::new())
    }

    /// Register a `DELETE` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn delete<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::DELETE, path, Arc::new(handler), Vec::new())
    }

    /// Register a `CONNECT` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn connect<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::CONNECT, path, Arc::new(handler), Vec::new())
    }

    /// Register an `OPTIONS` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn options<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::OPTIONS, path, Arc::new(handler), Vec::new())
    }

    /// Register a `TRACE` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the path is malformed or conflicts.
    pub fn trace<F>(&mut self, path: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.route(Method::TRACE, path, Arc::new(handler), Vec::new())
    }

    /// Freeze registration and build the serving component without binding
    /// a listener. Useful for embedding the dispatcher in another host.
    #[must_use]
    pub fn into_service(self) -> AppService {
        let dispatcher = Dispatcher::new(self.router, self.middlewares, self.engine);
        AppService::new(dispatcher)
    }

    /// Freeze registration, bind the listener, and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be
    /// bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        may::config().set_stack_size(self.config.stack_size);
        let service = self.into_service();
        HttpServer(service).start(addr)
    }
}
