//! Handler and middleware function-value types plus the composition fold.

use std::sync::Arc;

use crate::context::Context;

/// Application logic bound to a route: side effects only through the context.
pub type Handler = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// A pure transformation `wrap(next) -> Handler`.
///
/// A middleware may run logic before calling the wrapped handler, after it
/// returns, or both, and may choose not to call it at all (short-circuiting
/// is a legal, intended pattern, e.g. early authorization rejection).
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Wrap a plain closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&mut Context<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a plain closure as a [`Middleware`].
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compose an ordered middleware slice around a terminal handler.
///
/// Given `[m0, m1, ..., mk]` and terminal `H`, produces
/// `m0(m1(...mk(H)...))`: the fold iterates the registration list in reverse
/// so the first-registered middleware becomes the outermost wrapper. m0
/// therefore observes the request first on the way in and last on the way
/// out (classic onion nesting).
#[must_use]
pub fn compose(middlewares: &[Middleware], terminal: Handler) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, mw| mw(next))
}
