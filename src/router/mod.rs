//! # Router Module
//!
//! Path matching and route resolution over method-keyed prefix trees.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Building one prefix tree per HTTP method from registered route templates
//! - Matching incoming requests to handlers and extracting path parameters
//! - Rejecting conflicting or malformed registrations eagerly at startup
//!
//! ## Matching Rules
//!
//! Templates are split on `/` into segments. A segment starting with `:`
//! matches any single segment and captures it under the name after the colon;
//! a trailing `*` matches the whole remainder of the path as one opaque
//! capture. At each tree level the precedence is deterministic: static
//! literal first, then parameter child, then wildcard child - a path that
//! could satisfy both a literal and a parameter sibling always prefers the
//! literal.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use http::Method;
//! use trellis::router::Router;
//! use trellis::Context;
//!
//! let mut router = Router::new();
//! router
//!     .register(
//!         Method::GET,
//!         "/user/:id",
//!         Some(Arc::new(|_: &mut Context<'_>| {})),
//!         Vec::new(),
//!     )
//!     .unwrap();
//!
//! let m = router.find_route(&Method::GET, "/user/42").unwrap();
//! assert_eq!(m.route.as_ref(), "/user/:id");
//! assert_eq!(m.path_params[0].1, "42");
//! ```

mod core;
mod tree;

pub use core::{RouteError, RouteMatch, Router};
