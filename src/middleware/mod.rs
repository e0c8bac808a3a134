//! Middleware composition and the stock cross-cutting middleware.
//!
//! A middleware is a pure transformation `wrap(next: Handler) -> Handler`.
//! Composition nests first-registered-outermost; see [`compose`]. The stock
//! implementations here conform to that contract and call `next` at most
//! once:
//!
//! - [`AccessLogBuilder`] - JSON access-log line after the pipeline returns
//! - [`TracingBuilder`] - a `tracing` span around the downstream pipeline
//! - [`RecoveryBuilder`] - panic boundary producing a configured fallback response
//! - [`ErrorMapBuilder`] - remaps buffered status codes to custom bodies

mod access_log;
mod core;
mod error_map;
mod recovery;
mod tracing;

pub use access_log::AccessLogBuilder;
pub use core::{compose, handler_fn, middleware_fn, Handler, Middleware};
pub use error_map::ErrorMapBuilder;
pub use recovery::RecoveryBuilder;
pub use tracing::TracingBuilder;
