//! Tracing middleware: one span per request.

use std::sync::Arc;

use tracing::{field, info_span};

use super::{Handler, Middleware};

/// Builds a middleware that opens a `request` span around the downstream
/// pipeline and records the matched route and response status once it
/// returns.
///
/// The span is entered on the coroutine serving the request, so events
/// emitted by handlers and inner middleware are nested under it. Exporting
/// spans (OTLP or otherwise) is the subscriber's concern, not this
/// middleware's.
#[derive(Default)]
pub struct TracingBuilder;

impl TracingBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn build(self) -> Middleware {
        Arc::new(|next: Handler| {
            Arc::new(move |ctx| {
                let span = info_span!(
                    "request",
                    method = %ctx.method,
                    path = %ctx.path,
                    route = field::Empty,
                    status = field::Empty,
                );
                {
                    let _guard = span.enter();
                    next(ctx);
                }
                if let Some(route) = &ctx.matched_route {
                    span.record("route", route.as_ref());
                }
                let status = ctx.response_status();
                span.record("status", u64::from(if status == 0 { 200 } else { status }));
            })
        })
    }
}
