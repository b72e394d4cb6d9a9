//! Handler-to-handler transformations.
//!
//! `f1.and_then(f2).and_finally(h)` builds `f1(f2(h))`: `f1` runs its
//! pre-processing first and its post-processing last.
//!
//! ```text
//! request ─> f1 pre ─> f2 pre ─> h ─> f2 post ─> f1 post ─> response
//! ```

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;

use super::handler::{Handler, HttpHandler};
use super::route::Route;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse, MemoizedContent, DEFAULT_MEMORY_THRESHOLD};

/// Wraps a handler for cross-cutting pre/post processing
pub trait Filter: Send + Sync {
    /// Wrap `next`
    fn apply(&self, next: Handler) -> Handler;

    /// Sequence with `next`; `self` ends up outermost
    fn and_then(self, next: impl Filter + 'static) -> AndThen
    where
        Self: Sized + 'static,
    {
        AndThen {
            outer: Arc::new(self),
            inner: Arc::new(next),
        }
    }

    /// Terminate the chain with a handler
    fn and_finally(self, handler: impl HttpHandler + 'static) -> Handler
    where
        Self: Sized,
    {
        self.apply(Arc::new(handler))
    }

    /// Terminate the chain with a route, keeping its matching
    fn and_finally_route(self, route: Route) -> Route
    where
        Self: Sized + 'static,
    {
        route.with(self)
    }
}

impl<F> Filter for F
where
    F: Fn(Handler) -> Handler + Send + Sync,
{
    fn apply(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Two filters in sequence, built by [`Filter::and_then`]
#[derive(Clone)]
pub struct AndThen {
    outer: Arc<dyn Filter>,
    inner: Arc<dyn Filter>,
}

impl Filter for AndThen {
    fn apply(&self, next: Handler) -> Handler {
        self.outer.apply(self.inner.apply(next))
    }
}

/// Logs method, path, status and latency of every request
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFilter;

impl LoggingFilter {
    /// New logging filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for LoggingFilter {
    fn apply(&self, next: Handler) -> Handler {
        Arc::new(move |request: &HttpRequest| -> HttpResponse {
            let start = Instant::now();
            let response = next.execute(request);
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            if response.status >= 500 {
                tracing::warn!(
                    method = %request.method,
                    path = %request.uri,
                    status = response.status,
                    elapsed_ms,
                    "Request failed"
                );
            } else {
                tracing::info!(
                    method = %request.method,
                    path = %request.uri,
                    status = response.status,
                    elapsed_ms,
                    "Request handled"
                );
            }
            response
        })
    }
}

/// Logs a preview of request and response bodies at debug level.
///
/// Bodies are buffered through [`MemoizedContent`]; anything over the
/// memory threshold is spilled to a temporary file while it is inspected.
#[derive(Debug, Clone, Copy)]
pub struct BodyLoggingFilter {
    threshold: usize,
    preview_len: usize,
}

impl Default for BodyLoggingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_THRESHOLD)
    }
}

impl BodyLoggingFilter {
    /// Bodies up to `threshold` bytes are buffered in memory
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            preview_len: 1024,
        }
    }

    /// Log at most `len` bytes of each body
    pub fn with_preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    /// Buffer `content` and return its leading bytes as text
    pub fn preview(&self, content: &Bytes) -> Result<(MemoizedContent, String)> {
        let buffered = MemoizedContent::new(Cursor::new(content.clone()), self.threshold);
        let mut head = Vec::new();
        buffered
            .reader()?
            .take(self.preview_len as u64)
            .read_to_end(&mut head)?;
        Ok((buffered, String::from_utf8_lossy(&head).into_owned()))
    }

    fn log(&self, direction: &'static str, content: &Bytes) {
        if content.is_empty() || !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        match self.preview(content) {
            Ok((buffered, body)) => tracing::debug!(
                direction,
                bytes = content.len(),
                spilled = buffered.is_spilled().unwrap_or(false),
                body = %body,
                "Body"
            ),
            Err(e) => tracing::warn!(direction, error = %e, "Unable to buffer body"),
        }
    }
}

impl Filter for BodyLoggingFilter {
    fn apply(&self, next: Handler) -> Handler {
        let filter = *self;
        Arc::new(move |request: &HttpRequest| -> HttpResponse {
            filter.log("request", &request.content);
            let response = next.execute(request);
            filter.log("response", &response.content);
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::routing::Routable;
    use std::sync::Mutex;

    fn recording(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> impl Filter {
        move |next: Handler| -> Handler {
            let log = Arc::clone(&log);
            Arc::new(move |request: &HttpRequest| {
                log.lock().unwrap().push(format!("{label} pre"));
                let response = next.execute(request);
                log.lock().unwrap().push(format!("{label} post"));
                response
            })
        }
    }

    #[test]
    fn test_first_filter_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = Arc::clone(&log);

        let handler = recording("f1", Arc::clone(&log))
            .and_then(recording("f2", Arc::clone(&log)))
            .and_finally(move |_: &HttpRequest| {
                handler_log.lock().unwrap().push("handler".to_string());
                HttpResponse::new(200)
            });

        handler.execute(&HttpRequest::new(HttpMethod::Get, "/"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["f1 pre", "f2 pre", "handler", "f2 post", "f1 post"]
        );
    }

    #[test]
    fn test_filtered_route_keeps_matching() {
        let route = Route::get("/a")
            .unwrap()
            .to_handler(|_: &HttpRequest| HttpResponse::new(200));
        let add_header = |next: Handler| -> Handler {
            Arc::new(move |request: &HttpRequest| next.execute(request).with_header("X-Filtered", "yes"))
        };
        let route = add_header.and_finally_route(route);

        assert!(!route.matches(&HttpRequest::new(HttpMethod::Get, "/b")));
        let response = route.execute(&HttpRequest::new(HttpMethod::Get, "/a"));
        assert_eq!(response.header("X-Filtered"), Some("yes"));
    }

    #[test]
    fn test_body_logging_filter_leaves_bodies_intact() {
        let handler = BodyLoggingFilter::new(8).and_finally(|request: &HttpRequest| {
            HttpResponse::new(200).with_content(request.content.clone())
        });
        let request = HttpRequest::new(HttpMethod::Post, "/echo").with_content("a body longer than eight bytes");
        let response = handler.execute(&request);
        assert_eq!(response.content, request.content);
    }

    #[test]
    fn test_body_preview_is_truncated_and_large_bodies_spill() {
        let filter = BodyLoggingFilter::new(16).with_preview_len(5);

        let (buffered, preview) = filter.preview(&Bytes::from_static(b"hello world")).unwrap();
        assert_eq!(preview, "hello");
        assert!(!buffered.is_spilled().unwrap());

        let large = Bytes::from(vec![b'x'; 64]);
        let (buffered, preview) = filter.preview(&large).unwrap();
        assert_eq!(preview, "xxxxx");
        assert!(buffered.is_spilled().unwrap());
        assert_eq!(buffered.bytes().unwrap(), large);
    }

    #[test]
    fn test_logging_filter_passes_response_through() {
        let handler = LoggingFilter::new().and_finally(|_: &HttpRequest| HttpResponse::new(204));
        let response = handler.execute(&HttpRequest::new(HttpMethod::Delete, "/x"));
        assert_eq!(response.status, 204);
    }
}
