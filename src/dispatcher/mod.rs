//! # Dispatcher Module
//!
//! The dispatcher is the per-request entry point. It builds the [`Context`],
//! runs the pre-composed global middleware pipeline around the terminal
//! resolve-and-invoke handler, and guarantees that response finalization runs
//! exactly once regardless of what the pipeline did.
//!
//! ## Request Flow
//!
//! 1. A fresh context is bound to the parsed request and outbound transport
//! 2. Global middleware execute in registration order on the way in,
//!    reverse order on the way out
//! 3. The terminal handler resolves `(method, path)` in the routing tree:
//!    a miss buffers the fixed 404 response, a hit populates the matched
//!    route and path parameters and runs the route's own chain
//! 4. The finalization layer flushes the buffered status and body to the
//!    transport and logs (never raises) any write failure
//!
//! Handler panics are contained only if a
//! [`RecoveryBuilder`](crate::middleware::RecoveryBuilder) middleware is
//! installed; without one the panic unwinds into the host coroutine,
//! terminating that request's coroutine but not the listener.
//!
//! [`Context`]: crate::context::Context

mod core;

pub use core::{Dispatcher, NOT_FOUND_BODY};
