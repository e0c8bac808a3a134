//! `may_minihttp` service adapter.

use std::io;
use std::sync::Arc;

use may_minihttp::{HttpService, Request, Response};
use tracing::warn;

use super::request::parse_request;
use super::response::status_reason;
use crate::dispatcher::Dispatcher;

/// The service handed to the host HTTP stack; one clone serves each
/// connection coroutine. All per-request state lives in the context, so the
/// service itself is just a shared handle to the immutable dispatcher.
#[derive(Clone)]
pub struct AppService {
    dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = match parse_request(req) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "failed to parse request");
                res.status_code(400, status_reason(400));
                res.body_mut().extend_from_slice(b"bad request");
                return Ok(());
            }
        };
        self.dispatcher.dispatch(parsed, res);
        Ok(())
    }
}
