//! Composable, predicate-guarded routes.
//!
//! | Form        | Built with                   | Matches when                              |
//! |-------------|------------------------------|-------------------------------------------|
//! | templatized | [`Route::get`] / `post` / `delete` | method equal and template matches   |
//! | predicated  | [`Route::matching`]          | predicate returns true                    |
//! | nested      | [`Route::prefix`]            | path starts with prefix and inner matches |
//! | combined    | [`Route::combine`]           | any member matches; last added wins       |
//! | fallback    | [`Route::fallback_to`]       | always                                    |
//! | filtered    | [`Route::with`]              | inner matches                             |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::json;

use super::filter::Filter;
use super::handler::{Handler, HttpHandler, Routable};
use super::template::UrlTemplate;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Path parameters resolved by a template match
pub type PathParams = HashMap<String, String>;

/// Produces the handler for a templatized route from its path parameters
pub trait HandlerFactory: Send + Sync {
    /// `None` when no handler can serve these parameters
    fn create(&self, params: &PathParams) -> Option<Handler>;
}

impl<F> HandlerFactory for F
where
    F: Fn(&PathParams) -> Option<Handler> + Send + Sync,
{
    fn create(&self, params: &PathParams) -> Option<Handler> {
        self(params)
    }
}

/// An immutable node of the dispatch graph. Cloning shares the node.
#[derive(Clone)]
pub struct Route {
    inner: Arc<dyn Routable>,
}

impl Route {
    /// Wrap any [`Routable`]
    pub fn new(routable: impl Routable + 'static) -> Self {
        Self {
            inner: Arc::new(routable),
        }
    }

    /// Start a `GET` route
    pub fn get(template: &str) -> Result<TemplateRouteBuilder> {
        TemplateRouteBuilder::new(HttpMethod::Get, template)
    }

    /// Start a `POST` route
    pub fn post(template: &str) -> Result<TemplateRouteBuilder> {
        TemplateRouteBuilder::new(HttpMethod::Post, template)
    }

    /// Start a `DELETE` route
    pub fn delete(template: &str) -> Result<TemplateRouteBuilder> {
        TemplateRouteBuilder::new(HttpMethod::Delete, template)
    }

    /// Start a route guarded by an arbitrary predicate
    pub fn matching<P>(predicate: P) -> PredicateRouteBuilder
    where
        P: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
    {
        PredicateRouteBuilder {
            predicate: Arc::new(predicate),
        }
    }

    /// Start a route mounted under a literal path prefix
    pub fn prefix(prefix: impl Into<String>) -> NestedRouteBuilder {
        NestedRouteBuilder {
            prefix: prefix.into(),
        }
    }

    /// Combine routes. Later routes take precedence over earlier ones.
    pub fn combine(routes: impl IntoIterator<Item = Route>) -> Route {
        let mut routes: Vec<Route> = routes.into_iter().collect();
        routes.reverse();
        Route::new(CombinedRoute { routes })
    }

    /// A route that matches everything, using `fallback` when this route
    /// does not match
    pub fn fallback_to(self, fallback: impl HttpHandler + 'static) -> Route {
        Route::new(FallbackRoute {
            route: self,
            fallback: Arc::new(fallback),
        })
    }

    /// Wrap this route's handling in a filter; matching is unchanged
    pub fn with(self, filter: impl Filter + 'static) -> Route {
        let handler = filter.apply(Arc::new(self.clone()));
        Route::new(FilteredRoute {
            route: self,
            handler,
        })
    }
}

impl HttpHandler for Route {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        if !self.inner.matches(request) {
            return not_found(request);
        }
        self.inner.execute(request)
    }
}

impl Routable for Route {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.inner.matches(request)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").finish_non_exhaustive()
    }
}

/// `404` with a W3C `unknown command` body
fn not_found(request: &HttpRequest) -> HttpResponse {
    HttpResponse::new(404).with_json(&json!({
        "value": {
            "error": "unknown command",
            "message": format!("Unable to find handler for {request}"),
            "stacktrace": "",
        }
    }))
}

/// Builder returned by [`Route::get`] and friends
pub struct TemplateRouteBuilder {
    method: HttpMethod,
    template: UrlTemplate,
}

impl TemplateRouteBuilder {
    fn new(method: HttpMethod, template: &str) -> Result<Self> {
        Ok(Self {
            method,
            template: UrlTemplate::new(template)?,
        })
    }

    /// Finish with a factory that builds the handler from path parameters
    pub fn to(self, factory: impl HandlerFactory + 'static) -> Route {
        Route::new(TemplateRoute {
            method: self.method,
            template: self.template,
            factory: Box::new(factory),
        })
    }

    /// Finish with a fixed handler
    pub fn to_handler(self, handler: impl HttpHandler + 'static) -> Route {
        let handler: Handler = Arc::new(handler);
        self.to(move |_: &PathParams| Some(Arc::clone(&handler)))
    }
}

struct TemplateRoute {
    method: HttpMethod,
    template: UrlTemplate,
    factory: Box<dyn HandlerFactory>,
}

impl HttpHandler for TemplateRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        let params = self
            .template
            .matches(&request.uri)
            .map(|found| found.into_parameters())
            .unwrap_or_default();

        match self.factory.create(&params) {
            Some(handler) => handler.execute(request),
            None => {
                tracing::warn!(request = %request, template = %self.template, "No handler produced");
                HttpResponse::new(500).with_json(&json!({
                    "value": {
                        "error": "unknown error",
                        "message": format!("Unable to find handler for {request}"),
                        "stacktrace": "",
                    }
                }))
            },
        }
    }
}

impl Routable for TemplateRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        request.method == self.method && self.template.matches(&request.uri).is_some()
    }
}

/// Builder returned by [`Route::matching`]
pub struct PredicateRouteBuilder {
    predicate: Arc<dyn Fn(&HttpRequest) -> bool + Send + Sync>,
}

impl PredicateRouteBuilder {
    /// Finish with a handler
    pub fn to(self, handler: impl HttpHandler + 'static) -> Route {
        Route::new(PredicateRoute {
            predicate: self.predicate,
            handler: Box::new(handler),
        })
    }
}

struct PredicateRoute {
    predicate: Arc<dyn Fn(&HttpRequest) -> bool + Send + Sync>,
    handler: Box<dyn HttpHandler>,
}

impl HttpHandler for PredicateRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        self.handler.execute(request)
    }
}

impl Routable for PredicateRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        (self.predicate)(request)
    }
}

/// Builder returned by [`Route::prefix`]
pub struct NestedRouteBuilder {
    prefix: String,
}

impl NestedRouteBuilder {
    /// Mount `route` under the prefix
    pub fn to(self, route: Route) -> Route {
        Route::new(NestedRoute {
            prefix: self.prefix,
            route,
        })
    }
}

struct NestedRoute {
    prefix: String,
    route: Route,
}

impl NestedRoute {
    /// Copy of `request` with the prefix stripped and pushed onto its context
    fn strip(&self, request: &HttpRequest) -> Option<HttpRequest> {
        let rest = request.uri.strip_prefix(&self.prefix)?;
        let uri = if rest.is_empty() { "/" } else { rest };

        Some(HttpRequest {
            method: request.method,
            uri: uri.to_string(),
            headers: request.headers.clone(),
            query: request.query.clone(),
            content: request.content.clone(),
            attributes: request.attributes.clone(),
            context: request.context.with_prefix(self.prefix.as_str()),
        })
    }
}

impl HttpHandler for NestedRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        match self.strip(request) {
            Some(stripped) => self.route.execute(&stripped),
            None => not_found(request),
        }
    }
}

impl Routable for NestedRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.strip(request)
            .is_some_and(|stripped| self.route.matches(&stripped))
    }
}

/// Members stored most-recently-added first
struct CombinedRoute {
    routes: Vec<Route>,
}

impl HttpHandler for CombinedRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        self.routes
            .iter()
            .find(|route| route.matches(request))
            .map_or_else(|| not_found(request), |route| route.execute(request))
    }
}

impl Routable for CombinedRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.routes.iter().any(|route| route.matches(request))
    }
}

struct FallbackRoute {
    route: Route,
    fallback: Handler,
}

impl HttpHandler for FallbackRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        if self.route.matches(request) {
            self.route.execute(request)
        } else {
            self.fallback.execute(request)
        }
    }
}

impl Routable for FallbackRoute {
    fn matches(&self, _request: &HttpRequest) -> bool {
        true
    }
}

struct FilteredRoute {
    route: Route,
    handler: Handler,
}

impl HttpHandler for FilteredRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        self.handler.execute(request)
    }
}

impl Routable for FilteredRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.route.matches(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::relative_to_context;

    fn text(body: &'static str) -> impl HttpHandler {
        move |_: &HttpRequest| HttpResponse::new(200).with_text(body)
    }

    fn get(uri: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, uri)
    }

    #[test]
    fn test_templatized_route_passes_parameters() {
        let route = Route::get("/hello/{name}")
            .unwrap()
            .to(|params: &PathParams| {
                let name = params.get("name").cloned().unwrap_or_default();
                let h: Handler = Arc::new(move |_: &HttpRequest| {
                    HttpResponse::new(200).with_text(format!("hi {name}"))
                });
                Some(h)
            });

        assert!(route.matches(&get("/hello/bob")));
        assert!(!route.matches(&HttpRequest::new(HttpMethod::Post, "/hello/bob")));
        assert_eq!(route.execute(&get("/hello/bob")).utf8_string(), "hi bob");
    }

    #[test]
    fn test_missing_handler_is_500() {
        let route = Route::get("/x").unwrap().to(|_: &PathParams| -> Option<Handler> { None });
        let response = route.execute(&get("/x"));
        assert_eq!(response.status, 500);
        assert!(response.utf8_string().contains("Unable to find handler for (GET) /x"));
    }

    #[test]
    fn test_unmatched_route_is_404_unknown_command() {
        let route = Route::get("/x").unwrap().to_handler(text("x"));
        let response = route.execute(&get("/y"));
        assert_eq!(response.status, 404);
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["value"]["error"], "unknown command");
    }

    #[test]
    fn test_later_routes_win() {
        let first = Route::get("/a").unwrap().to_handler(text("first"));
        let second = Route::get("/a").unwrap().to_handler(text("second"));
        let other = Route::get("/b").unwrap().to_handler(text("b"));
        let combined = Route::combine([first, second, other]);

        assert_eq!(combined.execute(&get("/a")).utf8_string(), "second");
        assert_eq!(combined.execute(&get("/b")).utf8_string(), "b");
        assert_eq!(combined.execute(&get("/c")).status, 404);
    }

    #[test]
    fn test_nested_route_strips_prefix_and_records_context() {
        let inner = Route::get("/status").unwrap().to_handler(|req: &HttpRequest| {
            HttpResponse::new(200).with_text(relative_to_context(req, "/status"))
        });
        let nested = Route::prefix("/wd/hub").to(inner);

        let request = get("/wd/hub/status").with_header("X-Trace", "1");
        assert!(nested.matches(&request));
        assert_eq!(nested.execute(&request).utf8_string(), "/wd/hub/status");
        assert!(!nested.matches(&get("/status")));
    }

    #[test]
    fn test_prefix_only_forwards_root() {
        let inner = Route::get("/").unwrap().to_handler(text("root"));
        let nested = Route::prefix("/hub").to(inner);
        assert_eq!(nested.execute(&get("/hub")).utf8_string(), "root");
    }

    #[test]
    fn test_predicate_and_fallback() {
        let route = Route::matching(|req: &HttpRequest| req.header("X-Admin").is_some())
            .to(text("admin"))
            .fallback_to(text("public"));

        assert!(route.matches(&get("/anything")));
        assert_eq!(route.execute(&get("/anything")).utf8_string(), "public");
        let admin = get("/anything").with_header("X-Admin", "yes");
        assert_eq!(route.execute(&admin).utf8_string(), "admin");
    }
}
