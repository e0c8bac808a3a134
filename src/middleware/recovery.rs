//! Panic-recovery boundary.
//!
//! Install this as the global middleware that most closely wraps the rest of
//! the chain that can fault: it catches an unwinding panic from anything
//! downstream, overwrites the buffered response with the configured fallback,
//! notifies the fault observer, and returns normally so the finalization
//! layer above it still writes a well-formed response to the transport.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

use super::{Handler, Middleware};
use crate::context::Context;

/// Builds a recovery middleware with a configurable fallback response and
/// fault-observation callback.
pub struct RecoveryBuilder {
    status: u16,
    body: Vec<u8>,
    observer: Arc<dyn Fn(&Context<'_>) + Send + Sync>,
}

impl Default for RecoveryBuilder {
    fn default() -> Self {
        Self {
            status: 500,
            body: b"internal error".to_vec(),
            observer: Arc::new(|ctx| {
                error!(
                    method = %ctx.method,
                    path = %ctx.path,
                    route = ctx.matched_route.as_deref().unwrap_or(""),
                    "handler panicked"
                );
            }),
        }
    }
}

impl RecoveryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback status code buffered when a panic is caught (default 500).
    #[must_use]
    pub fn status_code(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Fallback body buffered when a panic is caught (default `internal error`).
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Callback invoked exactly once per caught panic, with the context as
    /// it stands after the fallback response has been buffered.
    #[must_use]
    pub fn observe<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context<'_>) + Send + Sync + 'static,
    {
        self.observer = Arc::new(f);
        self
    }

    #[must_use]
    pub fn build(self) -> Middleware {
        let status = self.status;
        let body = self.body;
        let observer = self.observer;
        Arc::new(move |next: Handler| {
            let body = body.clone();
            let observer = Arc::clone(&observer);
            Arc::new(move |ctx| {
                let outcome = catch_unwind(AssertUnwindSafe(|| next(ctx)));
                if outcome.is_err() {
                    ctx.set_status(status);
                    ctx.set_body(body.clone());
                    observer(ctx);
                }
            })
        })
    }
}
