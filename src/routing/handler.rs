//! Handler traits.

use std::sync::Arc;

use crate::http::{HttpRequest, HttpResponse};

/// Turns a request into a response. Never fails: errors are responses too.
pub trait HttpHandler: Send + Sync {
    /// Handle one request
    fn execute(&self, request: &HttpRequest) -> HttpResponse;
}

impl<F> HttpHandler for F
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync,
{
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        self(request)
    }
}

/// Shared, type-erased handler
pub type Handler = Arc<dyn HttpHandler>;

/// A handler that knows which requests it serves
pub trait Routable: HttpHandler {
    /// Whether this handler serves `request`
    fn matches(&self, request: &HttpRequest) -> bool;
}

/// Wrap a handler into a [`Handler`]
pub fn handler(h: impl HttpHandler + 'static) -> Handler {
    Arc::new(h)
}
