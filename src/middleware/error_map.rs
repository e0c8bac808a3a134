//! Status-code to response-body remapping.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Handler, Middleware};

/// Builds a middleware that rewrites the buffered body for configured status
/// codes after `next` returns.
///
/// Useful for serving branded error pages without touching handlers: map 404
/// to a custom body once, globally. Unmapped status codes pass through
/// untouched.
#[derive(Default)]
pub struct ErrorMapBuilder {
    bodies: HashMap<u16, Vec<u8>>,
}

impl ErrorMapBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a replacement body for a status code.
    #[must_use]
    pub fn add_code(mut self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(status, body.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Middleware {
        let bodies = Arc::new(self.bodies);
        Arc::new(move |next: Handler| {
            let bodies = Arc::clone(&bodies);
            Arc::new(move |ctx| {
                next(ctx);
                if let Some(body) = bodies.get(&ctx.response_status()) {
                    ctx.set_body(body.clone());
                }
            })
        })
    }
}
