//! Method-keyed route registration and lookup.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use thiserror::Error;
use tracing::{debug, info};

use super::tree::Node;
use crate::context::ParamVec;
use crate::middleware::{Handler, Middleware};

/// Configuration error surfaced eagerly at registration time.
///
/// Conflicting registrations are rejected rather than silently shadowed;
/// all variants are fatal to continue unless caught by the caller.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route path must not be empty")]
    EmptyPath,
    #[error("route path must start with '/': {0}")]
    MissingLeadingSlash(String),
    #[error("route path must not end with '/': {0}")]
    TrailingSlash(String),
    #[error("route path must not contain empty segments: {0}")]
    EmptySegment(String),
    #[error("parameter segment must have a name: {0}")]
    EmptyParamName(String),
    #[error("wildcard must be the last segment: {0}")]
    WildcardNotLast(String),
    #[error("conflicting handler already registered for {method} {path}")]
    HandlerConflict { method: Method, path: String },
    #[error("conflicting parameter names at the same position in {path}: :{existing} vs :{proposed}")]
    ParamConflict {
        path: String,
        existing: String,
        proposed: String,
    },
}

/// Result of successfully matching a request path to a route.
pub struct RouteMatch {
    /// The handler registered at the terminal node.
    pub handler: Handler,
    /// Middleware collected root-to-leaf along the matched path (prefix
    /// registrations first, the route's own list last).
    pub middlewares: Vec<Middleware>,
    /// The original route template (e.g. `/user/:id`).
    pub route: Arc<str>,
    /// Captures in left-to-right template order; a trailing wildcard's
    /// remainder is stored under `"*"`.
    pub path_params: ParamVec,
}

/// One prefix tree per HTTP method.
///
/// Built during startup registration, then treated as read-only for the
/// remainder of the process; lookups take `&self` and need no locking as
/// long as no registration happens concurrently with serving.
#[derive(Default)]
pub struct Router {
    trees: HashMap<Method, Node>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route template for a method.
    ///
    /// `handler = None` is a middleware-only registration: the given
    /// middleware attach to the node (and thereby to every route beneath it)
    /// without making the node itself routable.
    ///
    /// # Errors
    ///
    /// Rejects malformed templates and conflicting registrations; see
    /// [`RouteError`].
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        handler: Option<Handler>,
        middlewares: Vec<Middleware>,
    ) -> Result<(), RouteError> {
        let segments = Self::validate(path)?;
        let root = self.trees.entry(method.clone()).or_insert_with(Node::new);
        let node = if segments.is_empty() {
            root
        } else {
            root.insert(&segments, path)?
        };

        if handler.is_some() && node.handler.is_some() {
            return Err(RouteError::HandlerConflict {
                method,
                path: path.to_string(),
            });
        }
        if let Some(handler) = handler {
            node.handler = Some(handler);
            node.route = Some(Arc::from(path));
            info!(method = %method, path = %path, "route registered");
        } else if !middlewares.is_empty() {
            info!(
                method = %method,
                path = %path,
                count = middlewares.len(),
                "middleware attached"
            );
        }
        node.middlewares.extend(middlewares);
        Ok(())
    }

    /// Match `(method, path)` against the registered trees.
    ///
    /// Not-found is a normal outcome, signaled as `None`; the dispatcher
    /// renders the default not-found response for it.
    #[must_use]
    pub fn find_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let root = self.trees.get(method)?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut params = ParamVec::new();
        let mut middlewares: Vec<Middleware> = root.middlewares.to_vec();
        let node = match root.search(&segments, &mut params, &mut middlewares) {
            Some(node) => node,
            None => {
                debug!(method = %method, path = %path, "no route matched");
                return None;
            }
        };

        let handler = Arc::clone(node.handler.as_ref()?);
        let route = Arc::clone(node.route.as_ref()?);
        debug!(
            method = %method,
            path = %path,
            route = %route,
            params = ?params,
            "route matched"
        );
        Some(RouteMatch {
            handler,
            middlewares,
            route,
            path_params: params,
        })
    }

    /// Split and validate a route template, returning its segments (empty
    /// for the root path `/`).
    fn validate(path: &str) -> Result<Vec<&str>, RouteError> {
        if path.is_empty() {
            return Err(RouteError::EmptyPath);
        }
        if !path.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(path.to_string()));
        }
        if path == "/" {
            return Ok(Vec::new());
        }
        if path.ends_with('/') {
            return Err(RouteError::TrailingSlash(path.to_string()));
        }
        let segments: Vec<&str> = path[1..].split('/').collect();
        for (idx, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(RouteError::EmptySegment(path.to_string()));
            }
            if *segment == ":" {
                return Err(RouteError::EmptyParamName(path.to_string()));
            }
            if *segment == "*" && idx + 1 != segments.len() {
                return Err(RouteError::WildcardNotLast(path.to_string()));
            }
        }
        Ok(segments)
    }
}
