//! # Server Module
//!
//! HTTP serving on the `may` coroutine runtime via `may_minihttp`.
//!
//! The module splits into:
//! - [`Server`] - the registration surface: routes, global middleware,
//!   template engine, and startup
//! - [`AppService`] - the `may_minihttp` service adapter, one clone per
//!   connection coroutine
//! - [`HttpServer`] / [`ServerHandle`] - listener wrapper and lifecycle
//!   handle (`wait_ready`, `stop`, `join`)
//! - request parsing and the transport implementation over `may_minihttp`
//!   responses
//!
//! Each request is served synchronously on its own coroutine; handlers block
//! the coroutine, not an OS thread.

mod http_server;
mod request;
mod response;
#[allow(clippy::module_inception)]
mod server;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request, ParsedRequest};
pub use server::Server;
pub use service::AppService;
