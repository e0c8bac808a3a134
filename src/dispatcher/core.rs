//! Dispatcher core - the per-request hot path.

use std::sync::Arc;

use tracing::debug;

use crate::context::{Context, Transport};
use crate::middleware::{compose, Handler, Middleware};
use crate::router::Router;
use crate::server::ParsedRequest;
use crate::template::TemplateEngine;

/// Fixed body of the default not-found response.
pub const NOT_FOUND_BODY: &[u8] = b"NOT FOUND";

/// Single entry point invoked once per inbound request.
///
/// The global pipeline is composed once at construction:
/// `finalize(m0(m1(...mk(resolve_and_invoke)...)))`. The finalization layer
/// is always the outermost wrapper, so it runs after every other middleware
/// and handler has returned (or panicked and been recovered) and flushes the
/// buffered response exactly once.
pub struct Dispatcher {
    pipeline: Handler,
    engine: Option<Arc<dyn TemplateEngine>>,
}

impl Dispatcher {
    /// Compose the dispatch pipeline from an already-built router and the
    /// global middleware list.
    ///
    /// Registration is assumed complete: the router is read-only from here
    /// on and shared lock-free across serving coroutines.
    #[must_use]
    pub fn new(
        router: Router,
        middlewares: Vec<Middleware>,
        engine: Option<Arc<dyn TemplateEngine>>,
    ) -> Self {
        let router = Arc::new(router);
        let terminal: Handler = Arc::new(move |ctx: &mut Context<'_>| {
            let matched = match router.find_route(&ctx.method, &ctx.path) {
                Some(matched) => matched,
                None => {
                    ctx.set_status(404);
                    ctx.set_body(NOT_FOUND_BODY.to_vec());
                    return;
                }
            };
            ctx.matched_route = Some(Arc::clone(&matched.route));
            ctx.set_path_params(matched.path_params);
            let route_pipeline = compose(&matched.middlewares, matched.handler);
            route_pipeline(ctx);
        });

        let chain = compose(&middlewares, terminal);
        let pipeline: Handler = Arc::new(move |ctx: &mut Context<'_>| {
            chain(ctx);
            ctx.finalize();
        });

        Self { pipeline, engine }
    }

    /// Serve one request: construct a fresh context bound to the inbound
    /// request and outbound transport, then invoke the pipeline once,
    /// synchronously, on the calling coroutine.
    pub fn dispatch(&self, parsed: ParsedRequest, transport: &mut dyn Transport) {
        debug!(method = %parsed.method, path = %parsed.path, "dispatching request");
        let mut ctx = Context::new(parsed, self.engine.clone(), transport);
        (self.pipeline)(&mut ctx);
    }
}
