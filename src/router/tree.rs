//! Prefix-tree nodes over `/`-delimited path segments.
//!
//! Each HTTP method owns one tree. A node holds a mapping from static literal
//! segments to children, at most one parameter child, and at most one
//! wildcard child. Nodes are created on demand during registration and never
//! mutated once the server starts serving.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ParamVec;
use crate::middleware::{Handler, Middleware};
use crate::router::RouteError;

pub(crate) struct Node {
    children: HashMap<String, Node>,
    param_child: Option<Box<Node>>,
    wildcard_child: Option<Box<Node>>,
    /// Capture name when this node is a parameter child.
    param_name: Option<Arc<str>>,
    /// Set only when some registration terminated exactly at this node; a
    /// node without one is a pure intermediate prefix and is not routable.
    pub(crate) handler: Option<Handler>,
    pub(crate) middlewares: Vec<Middleware>,
    /// Full route template recorded for display and tracing.
    pub(crate) route: Option<Arc<str>>,
}

impl Node {
    pub(crate) fn new() -> Self {
        Self {
            children: HashMap::new(),
            param_child: None,
            wildcard_child: None,
            param_name: None,
            handler: None,
            middlewares: Vec::new(),
            route: None,
        }
    }

    fn new_param(name: &str) -> Self {
        let mut node = Self::new();
        node.param_name = Some(Arc::from(name));
        node
    }

    /// Walk or extend the tree for the given template segments, returning the
    /// terminal node.
    pub(crate) fn insert(
        &mut self,
        segments: &[&str],
        template: &str,
    ) -> Result<&mut Node, RouteError> {
        let mut node = self;
        for segment in segments {
            node = if let Some(name) = segment.strip_prefix(':') {
                node.param_child_mut(name, template)?
            } else if *segment == "*" {
                node.wildcard_child.get_or_insert_with(|| Box::new(Node::new()))
            } else {
                node.children
                    .entry((*segment).to_string())
                    .or_insert_with(Node::new)
            };
        }
        Ok(node)
    }

    fn param_child_mut(&mut self, name: &str, template: &str) -> Result<&mut Node, RouteError> {
        if let Some(existing) = self.param_child.as_deref() {
            let existing_name = existing.param_name.as_deref().unwrap_or("");
            if existing_name != name {
                return Err(RouteError::ParamConflict {
                    path: template.to_string(),
                    existing: existing_name.to_string(),
                    proposed: name.to_string(),
                });
            }
        }
        Ok(self
            .param_child
            .get_or_insert_with(|| Box::new(Node::new_param(name))))
    }

    /// Walk the tree consuming `segments`, collecting parameter captures and
    /// middleware attached to every node on the path.
    ///
    /// Precedence at each level: static literal, then parameter child, then
    /// wildcard child. Static and parameter branches backtrack on a dead end,
    /// unwinding their captures; a wildcard consumes the whole remainder and
    /// matches only if it carries a handler.
    pub(crate) fn search<'n>(
        &'n self,
        segments: &[&str],
        params: &mut ParamVec,
        middlewares: &mut Vec<Middleware>,
    ) -> Option<&'n Node> {
        if segments.is_empty() {
            return if self.handler.is_some() { Some(self) } else { None };
        }

        let segment = segments[0];
        let remaining = &segments[1..];

        if let Some(child) = self.children.get(segment) {
            let mark = middlewares.len();
            middlewares.extend(child.middlewares.iter().cloned());
            if let Some(found) = child.search(remaining, params, middlewares) {
                return Some(found);
            }
            middlewares.truncate(mark);
        }

        if let Some(child) = self.param_child.as_deref() {
            let mark = middlewares.len();
            middlewares.extend(child.middlewares.iter().cloned());
            if let Some(name) = &child.param_name {
                params.push((Arc::clone(name), segment.to_string()));
            }
            if let Some(found) = child.search(remaining, params, middlewares) {
                return Some(found);
            }
            params.pop();
            middlewares.truncate(mark);
        }

        if let Some(child) = self.wildcard_child.as_deref() {
            if child.handler.is_some() {
                middlewares.extend(child.middlewares.iter().cloned());
                params.push((Arc::from("*"), segments.join("/")));
                return Some(child);
            }
        }

        None
    }
}
