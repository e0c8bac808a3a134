//! # Trellis
//!
//! **Trellis** is a minimal, coroutine-powered HTTP server framework for Rust built on
//! the `may` runtime and `may_minihttp`. Applications register handlers per HTTP method
//! and path and wrap them with composable middleware.
//!
//! ## Architecture
//!
//! The library is organized into a handful of focused modules:
//!
//! - **[`context`]** - Per-request mutable state: the inbound request, buffered response
//!   state, extracted path parameters, and the outbound transport seam
//! - **[`router`]** - Method-keyed prefix trees with static, `:name` parameter, and `*`
//!   wildcard segments, plus eager conflict detection at registration time
//! - **[`middleware`]** - The `Handler`/`Middleware` function-value types, the reverse-order
//!   composition fold, and the stock middleware (access log, tracing, recovery, error map)
//! - **[`dispatcher`]** - The per-request entry point that builds the context, runs the
//!   composed pipeline, and guarantees response finalization
//! - **[`server`]** - Route registration surface, the `may_minihttp` service adapter,
//!   and the listener lifecycle
//! - **[`template`]** - Pluggable template rendering (`minijinja` implementation included)
//!
//! ## Request Handling Flow
//!
//! 1. `may_minihttp` parses the wire request on its own coroutine
//! 2. The dispatcher constructs a fresh [`context::Context`]
//! 3. Global middleware wrap a terminal handler, first registered outermost
//! 4. The terminal handler resolves `(method, path)` in the routing tree; a miss buffers
//!    a fixed 404 response, a hit runs the route's own middleware chain around its handler
//! 5. The finalization layer, always outermost, flushes the buffered status and body to
//!    the transport exactly once
//!
//! ## Quick Start
//!
//! ```no_run
//! use trellis::server::Server;
//!
//! let mut server = Server::new();
//! server
//!     .get("/user/:id", |ctx| {
//!         let id = ctx.path_param("id").unwrap_or("unknown").to_string();
//!         ctx.set_body(format!("hello, {id}"));
//!     })
//!     .unwrap();
//! let handle = server.start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```
//!
//! ## Runtime Considerations
//!
//! Trellis uses the `may` coroutine runtime, not tokio or async-std. Handlers and
//! middleware execute synchronously to completion on the coroutine serving the
//! connection. Stack size is configurable via the `TRELLIS_STACK_SIZE` environment
//! variable (see [`runtime_config`]).

pub mod context;
pub mod dispatcher;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod template;

pub use context::{Context, ParamVec, Transport};
pub use dispatcher::{Dispatcher, NOT_FOUND_BODY};
pub use middleware::{compose, Handler, Middleware};
pub use router::{RouteError, RouteMatch, Router};
pub use runtime_config::RuntimeConfig;
pub use server::{ParsedRequest, Server, ServerHandle};
pub use template::{MiniJinjaEngine, TemplateEngine, TemplateError};
