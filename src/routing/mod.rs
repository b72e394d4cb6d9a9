//! Server-side request routing.
//!
//! Routes are assembled once, at server start, into an immutable dispatch
//! graph that can be shared across threads without locking.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wdp::routing::{Filter, HttpHandler, LoggingFilter, Route};
//! use wdp::http::{HttpRequest, HttpResponse};
//!
//! let status = Route::get("/status")?
//!     .to_handler(|_: &HttpRequest| HttpResponse::new(200).with_text("ready"));
//! let session = Route::delete("/session/{sessionId}")?
//!     .to_handler(|_: &HttpRequest| HttpResponse::new(200));
//!
//! let app = LoggingFilter::new()
//!     .and_finally_route(Route::prefix("/wd/hub").to(Route::combine([status, session])));
//! ```

mod filter;
mod handler;
mod route;
mod template;

pub use filter::{AndThen, BodyLoggingFilter, Filter, LoggingFilter};
pub use handler::{handler, Handler, HttpHandler, Routable};
pub use route::{
    HandlerFactory, NestedRouteBuilder, PathParams, PredicateRouteBuilder, Route,
    TemplateRouteBuilder,
};
pub use template::{UrlTemplate, UrlTemplateMatch};
