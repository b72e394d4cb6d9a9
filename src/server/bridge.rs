//! axum adapter for [`HttpHandler`]s.
//!
//! The routing layer is synchronous; each request is handed to
//! `spawn_blocking` so a slow handler never stalls the runtime.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::ServerConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::routing::Handler;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Serve `handler` as the fallback of an axum router, next to `/health`
pub fn into_axum(handler: Handler, config: &ServerConfig) -> Router {
    let max_body_size = config.max_body_size;

    let mut router = Router::new()
        .route("/health", get(health_check))
        .fallback(move |request: Request| dispatch(handler.clone(), max_body_size, request));

    if config.logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn dispatch(handler: Handler, max_body_size: usize, request: Request) -> axum::response::Response {
    let (parts, body) = request.into_parts();

    let Ok(method) = HttpMethod::try_from(&parts.method) else {
        return to_axum(error_response(
            405,
            "unknown method",
            &format!("Unsupported HTTP method: {}", parts.method),
        ));
    };

    let content = match to_bytes(body, max_body_size).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(method = %method, path = %parts.uri.path(), "Request body rejected: {e}");
            return to_axum(error_response(
                413,
                "invalid argument",
                &format!("Request body exceeds {max_body_size} bytes"),
            ));
        },
    };

    let uri = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
    let mut http_request = HttpRequest::new(method, uri).with_content(content);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            http_request.headers.add(name.as_str(), value);
        }
    }

    match tokio::task::spawn_blocking(move || handler.execute(&http_request)).await {
        Ok(response) => to_axum(response),
        Err(e) => {
            tracing::error!("Handler panicked: {e}");
            to_axum(error_response(500, "unknown error", "Handler failed"))
        },
    }
}

fn error_response(status: u16, error: &str, message: &str) -> HttpResponse {
    HttpResponse::new(status).with_json(&json!({
        "value": {
            "error": error,
            "message": message,
            "stacktrace": "",
        }
    }))
}

fn to_axum(response: HttpResponse) -> axum::response::Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = axum::response::Response::builder().status(status);
    for (name, value) in response.headers.iter() {
        builder = builder.header(name, value);
    }

    builder.body(Body::from(response.content)).unwrap_or_else(|e| {
        tracing::error!("Invalid response head: {e}");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
