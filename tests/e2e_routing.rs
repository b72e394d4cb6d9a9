//! End-to-end routing tests.
//!
//! Builds a small remote end out of routes, filters and a command route and
//! drives it with encoded commands, without any network.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use wdp::codec::CommandCodec;
use wdp::http::{relative_to_context, HttpMethod, HttpRequest, HttpResponse};
use wdp::protocol::{names, Command, Dialect, ErrorKind, Response, WebDriverError};
use wdp::routing::{Filter, Handler, HttpHandler, LoggingFilter, Routable, Route, UrlTemplate};
use wdp::server::CommandRoute;

fn remote_end(dialect: Dialect) -> Route {
    let commands = CommandRoute::new(dialect, |command: Command| match command.name.as_str() {
        names::FIND_ELEMENT => Response::error(WebDriverError::new(
            ErrorKind::NoSuchElement,
            format!("Cannot locate {}", command.parameters["value"]),
        )),
        _ => Response::success(json!({ "command": command.name })),
    })
    .into_route();

    let status = Route::get("/status").unwrap().to_handler(|request: &HttpRequest| {
        HttpResponse::new(200).with_json(&json!({
            "value": {"ready": true, "self": relative_to_context(request, "/status")}
        }))
    });

    Route::prefix("/wd/hub").to(Route::combine([commands, status]))
}

fn prefixed(mut request: HttpRequest) -> HttpRequest {
    request.uri = format!("/wd/hub{}", request.uri);
    request
}

#[test]
fn test_encoded_commands_reach_the_handler() {
    for dialect in [Dialect::Legacy, Dialect::W3c] {
        let app = remote_end(dialect);
        let codec = CommandCodec::new(dialect);

        let request = codec
            .encode(&Command::new("s1", names::GET).with_parameter("url", "https://example.com"))
            .unwrap();
        let response = app.execute(&prefixed(request));

        let decoded = dialect.response_codec().decode(&response).unwrap();
        assert_eq!(decoded.session_id.as_deref(), if dialect == Dialect::Legacy { Some("s1") } else { None });
        assert_eq!(decoded.into_result().unwrap(), json!({"command": names::GET}));
    }
}

#[test]
fn test_handler_errors_cross_the_wire() {
    let app = remote_end(Dialect::W3c);
    let request = CommandCodec::new(Dialect::W3c)
        .encode(
            &Command::new("s1", names::FIND_ELEMENT)
                .with_parameter("using", "css selector")
                .with_parameter("value", "#missing"),
        )
        .unwrap();

    let response = app.execute(&prefixed(request));
    assert_eq!(response.status, 404);

    let err = Dialect::W3c
        .response_codec()
        .decode(&response)
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoSuchElement);
    assert!(err.message.contains("#missing"));
}

#[test]
fn test_later_status_route_overrides_status_command() {
    let app = remote_end(Dialect::W3c);
    let response = app.execute(&HttpRequest::new(HttpMethod::Get, "/wd/hub/status"));

    let body: Value = response.json().unwrap();
    assert_eq!(body["value"]["ready"], true);
    assert_eq!(body["value"]["self"], "/wd/hub/status");
}

#[test]
fn test_requests_outside_prefix_are_not_found() {
    let app = remote_end(Dialect::W3c);
    let request = HttpRequest::new(HttpMethod::Get, "/status");

    assert!(!app.matches(&request));
    assert_eq!(app.execute(&request).status, 404);
}

#[test]
fn test_filters_wrap_in_registration_order() {
    let trace = Arc::new(Mutex::new(Vec::new()));

    let tag = |label: &'static str, trace: Arc<Mutex<Vec<String>>>| {
        move |next: Handler| -> Handler {
            let trace = Arc::clone(&trace);
            Arc::new(move |request: &HttpRequest| {
                trace.lock().unwrap().push(format!("{label}>"));
                let response = next.execute(request);
                trace.lock().unwrap().push(format!("<{label}"));
                response.with_header("X-Via", label)
            })
        }
    };

    let app = tag("outer", Arc::clone(&trace))
        .and_then(tag("inner", Arc::clone(&trace)))
        .and_then(LoggingFilter::new())
        .and_finally_route(remote_end(Dialect::W3c));

    let response = app.execute(&HttpRequest::new(HttpMethod::Get, "/wd/hub/status"));
    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers.get_all("X-Via").collect::<Vec<_>>(),
        vec!["inner", "outer"]
    );
    assert_eq!(*trace.lock().unwrap(), vec!["outer>", "inner>", "<inner", "<outer"]);
}

#[test]
fn test_fallback_catches_everything_else() {
    let app = remote_end(Dialect::W3c)
        .fallback_to(|request: &HttpRequest| HttpResponse::new(418).with_text(request.uri.clone()));

    assert!(app.matches(&HttpRequest::new(HttpMethod::Get, "/anything")));
    let response = app.execute(&HttpRequest::new(HttpMethod::Get, "/anything"));
    assert_eq!(response.status, 418);
    assert_eq!(response.utf8_string(), "/anything");
}

#[test]
fn test_attribute_template_example() {
    let template = UrlTemplate::new("/session/{sessionId}/element/{id}/attribute/{name}").unwrap();

    let found = template.matches("/session/abc/element/7/attribute/value").unwrap();
    assert_eq!(found.get("sessionId"), Some("abc"));
    assert_eq!(found.get("id"), Some("7"));
    assert_eq!(found.get("name"), Some("value"));
    assert_eq!(found.parameters().len(), 3);

    assert!(template.matches("/session/abc/element/7").is_none());
}

#[test]
fn test_route_graph_is_shared_across_threads() {
    let app = remote_end(Dialect::Legacy);
    let codec = CommandCodec::new(Dialect::Legacy);

    std::thread::scope(|scope| {
        for i in 0..4 {
            let app = app.clone();
            let codec = codec.clone();
            scope.spawn(move || {
                let session = format!("s{i}");
                let request = codec.encode(&Command::new(session.as_str(), names::GET_TITLE)).unwrap();
                let response = app.execute(&prefixed(request));
                let body: Value = response.json().unwrap();
                assert_eq!(body["sessionId"], session);
            });
        }
    });
}
