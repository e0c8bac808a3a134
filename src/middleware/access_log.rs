//! Access-log middleware emitting one JSON line per request.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::{Handler, Middleware};

#[derive(Serialize)]
struct AccessLog<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a str>,
    http_method: &'a str,
    path: &'a str,
}

/// Builds an access-log middleware.
///
/// The line is emitted after `next` returns, so the matched route template is
/// available even though matching happens further down the pipeline. The sink
/// defaults to a `tracing::info!` event under the `access_log` target.
pub struct AccessLogBuilder {
    sink: Arc<dyn Fn(&str) + Send + Sync>,
}

impl Default for AccessLogBuilder {
    fn default() -> Self {
        Self {
            sink: Arc::new(|line| info!(target: "access_log", "{line}")),
        }
    }
}

impl AccessLogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default sink with a custom one.
    #[must_use]
    pub fn log_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.sink = Arc::new(f);
        self
    }

    #[must_use]
    pub fn build(self) -> Middleware {
        let sink = self.sink;
        Arc::new(move |next: Handler| {
            let sink = Arc::clone(&sink);
            Arc::new(move |ctx| {
                next(ctx);
                let entry = AccessLog {
                    host: ctx.header("host"),
                    route: ctx.matched_route.as_deref(),
                    http_method: ctx.method.as_str(),
                    path: &ctx.path,
                };
                if let Ok(line) = serde_json::to_string(&entry) {
                    sink(&line);
                }
            })
        })
    }
}
