//! Legacy JSON Wire Protocol dialect.
//!
//! Errors travel as a numeric `status` inside the body; HTTP status is only
//! 200 or 500.
//!
//! ```text
//! {"sessionId": "...", "status": 7, "state": "no such element", "value": {...}}
//! ```

use serde_json::{json, Map, Value};

use super::registry::RegistryBuilder;
use super::response::{error_of, resolved_state, resolved_status, status_from_http};
use super::shared::Binding;
use crate::error::Result;
use crate::http::HttpMethod::{Get, Post};
#[allow(clippy::wildcard_imports)]
use crate::protocol::names::*;
use crate::protocol::{errors, Response, ResponseValue};

pub(super) static LEGACY_COMMANDS: &[Binding] = &[
    // Alerts
    (GET_ALERT_TEXT, Get, "/session/{sessionId}/alert_text"),
    (SET_ALERT_VALUE, Post, "/session/{sessionId}/alert_text"),
    (ACCEPT_ALERT, Post, "/session/{sessionId}/accept_alert"),
    (DISMISS_ALERT, Post, "/session/{sessionId}/dismiss_alert"),
    // Script execution
    (EXECUTE_SCRIPT, Post, "/session/{sessionId}/execute"),
    (EXECUTE_ASYNC_SCRIPT, Post, "/session/{sessionId}/execute_async"),
    // Elements
    (GET_ACTIVE_ELEMENT, Post, "/session/{sessionId}/element/active"),
    (GET_ELEMENT_LOCATION, Get, "/session/{sessionId}/element/{id}/location"),
    (
        GET_ELEMENT_LOCATION_ONCE_SCROLLED_INTO_VIEW,
        Get,
        "/session/{sessionId}/element/{id}/location_in_view",
    ),
    (GET_ELEMENT_SIZE, Get, "/session/{sessionId}/element/{id}/size"),
    (SUBMIT_ELEMENT, Post, "/session/{sessionId}/element/{id}/submit"),
    // Timeouts
    (IMPLICITLY_WAIT, Post, "/session/{sessionId}/timeouts/implicit_wait"),
    (SET_SCRIPT_TIMEOUT, Post, "/session/{sessionId}/timeouts/async_script"),
    // Windows
    (GET_CURRENT_WINDOW_HANDLE, Get, "/session/{sessionId}/window_handle"),
    (GET_WINDOW_HANDLES, Get, "/session/{sessionId}/window_handles"),
    (GET_CURRENT_WINDOW_SIZE, Get, "/session/{sessionId}/window/{windowHandle}/size"),
    (SET_CURRENT_WINDOW_SIZE, Post, "/session/{sessionId}/window/{windowHandle}/size"),
    (GET_CURRENT_WINDOW_POSITION, Get, "/session/{sessionId}/window/{windowHandle}/position"),
    (SET_CURRENT_WINDOW_POSITION, Post, "/session/{sessionId}/window/{windowHandle}/position"),
    (MAXIMIZE_CURRENT_WINDOW, Post, "/session/{sessionId}/window/{windowHandle}/maximize"),
    // Mouse and keyboard
    (MOUSE_MOVE_TO, Post, "/session/{sessionId}/moveto"),
    (MOUSE_DOWN, Post, "/session/{sessionId}/buttondown"),
    (MOUSE_UP, Post, "/session/{sessionId}/buttonup"),
    (CLICK, Post, "/session/{sessionId}/click"),
    (DOUBLE_CLICK, Post, "/session/{sessionId}/doubleclick"),
    (SEND_KEYS_TO_ACTIVE_ELEMENT, Post, "/session/{sessionId}/keys"),
];

/// Window commands addressed by handle; `"current"` targets the focused window
const WINDOW_HANDLE_COMMANDS: &[&str] = &[
    GET_CURRENT_WINDOW_SIZE,
    SET_CURRENT_WINDOW_SIZE,
    GET_CURRENT_WINDOW_POSITION,
    SET_CURRENT_WINDOW_POSITION,
    MAXIMIZE_CURRENT_WINDOW,
];

pub(super) fn register(builder: &mut RegistryBuilder) {
    super::shared::register(builder, LEGACY_COMMANDS);
}

pub(super) fn amend_parameters(name: &str, parameters: &mut Map<String, Value>) -> Result<()> {
    if WINDOW_HANDLE_COMMANDS.contains(&name) {
        parameters
            .entry("windowHandle")
            .or_insert_with(|| Value::from("current"));
    }
    Ok(())
}

/// Whole response as the body; HTTP 200 on success, 500 otherwise
pub(super) fn encode_response(response: &Response) -> (u16, Value) {
    let status = resolved_status(response);
    let http_status = if errors::is_success(status) { 200 } else { 500 };

    let value = match error_of(response) {
        Some(err) => {
            let stack_trace: Vec<&str> = err
                .stacktrace
                .as_deref()
                .map(|trace| trace.lines().collect())
                .unwrap_or_default();
            let mut value = json!({
                "message": err.message,
                "stackTrace": stack_trace,
            });
            if let Some(data) = err.data {
                value["data"] = data;
            }
            value
        },
        None => response.value.to_json(),
    };

    let body = json!({
        "sessionId": response.session_id,
        "status": status,
        "state": resolved_state(response),
        "value": value,
    });
    (http_status, body)
}

/// Body `status`/`state` win; otherwise a non-2xx HTTP status picks one
pub(super) fn decode_response(http_status: u16, parsed: Option<Value>, text: &str) -> Result<Response> {
    let mut response = Response::default();
    if !(200..300).contains(&http_status) {
        response.status = Some(status_from_http(http_status));
    }

    match parsed {
        Some(Value::Object(mut body)) if is_envelope(&body) => {
            match body.remove("status") {
                Some(Value::Number(n)) => response.status = n.as_i64(),
                // Some servers put the state token in `status`
                Some(Value::String(state)) => {
                    response.status = Some(errors::to_status(&state, Some(http_status)));
                    response.state = Some(state);
                },
                _ => {},
            }
            if let Some(Value::String(state)) = body.remove("state") {
                response.state = Some(state);
            }
            if let Some(Value::String(id)) = body.remove("sessionId") {
                response.session_id = Some(id);
            }
            response.value = ResponseValue::Json(body.remove("value").unwrap_or(Value::Null));
        },
        Some(other) => response.value = ResponseValue::Json(other),
        None if text.is_empty() => {
            if http_status == 200 {
                tracing::warn!("Empty body on HTTP 200, treating as empty success");
            }
        },
        None => response.value = ResponseValue::Json(Value::from(text)),
    }

    Ok(response)
}

fn is_envelope(body: &Map<String, Value>) -> bool {
    body.contains_key("status") || body.contains_key("value") || body.contains_key("state")
}
