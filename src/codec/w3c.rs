//! W3C WebDriver dialect.
//!
//! The HTTP status is the primary error signal and the body is always an
//! envelope around `value`:
//!
//! ```text
//! 200  {"value": ...}
//! 404  {"value": {"error": "no such element", "message": "...", "stacktrace": "..."}}
//! ```
//!
//! Several legacy-only commands are still accepted on encode: they are
//! aliased onto their W3C replacement and their parameters rewritten.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use super::registry::RegistryBuilder;
use super::response::{error_of, status_from_http};
use super::shared::Binding;
use crate::error::{Result, WdpError};
use crate::http::HttpMethod::{Delete, Get, Post};
#[allow(clippy::wildcard_imports)]
use crate::protocol::names::*;
use crate::protocol::{errors, Response, ResponseValue, WebDriverError};

pub(super) static W3C_COMMANDS: &[Binding] = &[
    // Alerts
    (GET_ALERT_TEXT, Get, "/session/{sessionId}/alert/text"),
    (SET_ALERT_VALUE, Post, "/session/{sessionId}/alert/text"),
    (ACCEPT_ALERT, Post, "/session/{sessionId}/alert/accept"),
    (DISMISS_ALERT, Post, "/session/{sessionId}/alert/dismiss"),
    // Script execution
    (EXECUTE_SCRIPT, Post, "/session/{sessionId}/execute/sync"),
    (EXECUTE_ASYNC_SCRIPT, Post, "/session/{sessionId}/execute/async"),
    // Elements
    (GET_ACTIVE_ELEMENT, Get, "/session/{sessionId}/element/active"),
    (GET_ELEMENT_SHADOW_ROOT, Get, "/session/{sessionId}/element/{id}/shadow"),
    (FIND_ELEMENT_FROM_SHADOW_ROOT, Post, "/session/{sessionId}/shadow/{shadowId}/element"),
    (FIND_ELEMENTS_FROM_SHADOW_ROOT, Post, "/session/{sessionId}/shadow/{shadowId}/elements"),
    (GET_ELEMENT_ARIA_ROLE, Get, "/session/{sessionId}/element/{id}/computedrole"),
    (GET_ELEMENT_ACCESSIBLE_NAME, Get, "/session/{sessionId}/element/{id}/computedlabel"),
    // Timeouts
    (GET_TIMEOUTS, Get, "/session/{sessionId}/timeouts"),
    // Windows
    (GET_CURRENT_WINDOW_HANDLE, Get, "/session/{sessionId}/window"),
    (GET_WINDOW_HANDLES, Get, "/session/{sessionId}/window/handles"),
    (SWITCH_TO_NEW_WINDOW, Post, "/session/{sessionId}/window/new"),
    (GET_WINDOW_RECT, Get, "/session/{sessionId}/window/rect"),
    (SET_WINDOW_RECT, Post, "/session/{sessionId}/window/rect"),
    (MAXIMIZE_CURRENT_WINDOW, Post, "/session/{sessionId}/window/maximize"),
    (MINIMIZE_CURRENT_WINDOW, Post, "/session/{sessionId}/window/minimize"),
    // Input
    (ACTIONS, Post, "/session/{sessionId}/actions"),
    (CLEAR_ACTIONS_STATE, Delete, "/session/{sessionId}/actions"),
    // Printing
    (PRINT_PAGE, Post, "/session/{sessionId}/print"),
];

/// Legacy-only names and the W3C command they are sent as
pub(super) static W3C_ALIASES: &[(&str, &str)] = &[
    (GET_ELEMENT_LOCATION, GET_ELEMENT_RECT),
    (GET_ELEMENT_SIZE, GET_ELEMENT_RECT),
    (GET_CURRENT_WINDOW_SIZE, GET_WINDOW_RECT),
    (GET_CURRENT_WINDOW_POSITION, GET_WINDOW_RECT),
    (SET_CURRENT_WINDOW_SIZE, SET_WINDOW_RECT),
    (SET_CURRENT_WINDOW_POSITION, SET_WINDOW_RECT),
    (IMPLICITLY_WAIT, SET_TIMEOUT),
    (SET_SCRIPT_TIMEOUT, SET_TIMEOUT),
];

/// Characters that must be backslash-escaped in a CSS identifier
static CSS_SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\s'"\\#.:;,!?+<>=~*^$|%&@`{}\-/\[\]()])"#).expect("valid CSS escape pattern")
});

pub(super) fn register(builder: &mut RegistryBuilder) {
    super::shared::register(builder, W3C_COMMANDS);
    for &(name, target) in W3C_ALIASES {
        builder.alias(name, target);
    }
}

pub(super) fn amend_parameters(name: &str, parameters: &mut Map<String, Value>) -> Result<()> {
    match name {
        FIND_ELEMENT | FIND_ELEMENTS | FIND_CHILD_ELEMENT | FIND_CHILD_ELEMENTS => {
            amend_locator(parameters)?;
        },
        SET_TIMEOUT => {
            if let (Some(Value::String(kind)), Some(ms)) = (parameters.get("type"), parameters.get("ms")) {
                let key = match kind.as_str() {
                    "implicit" => "implicit",
                    "page load" | "pageLoad" => "pageLoad",
                    "script" => "script",
                    other => {
                        return Err(WdpError::InvalidArgument(format!("Unknown timeout type: {other}")));
                    },
                };
                let ms = ms.clone();
                parameters.clear();
                parameters.insert(key.to_string(), ms);
            }
        },
        IMPLICITLY_WAIT => rename_ms(parameters, "implicit"),
        SET_SCRIPT_TIMEOUT => rename_ms(parameters, "script"),
        SWITCH_TO_WINDOW => {
            if let Some(name) = parameters.remove("name") {
                parameters.entry("handle").or_insert(name);
            }
        },
        SEND_KEYS_TO_ELEMENT | SET_ALERT_VALUE => {
            if !parameters.contains_key("text") {
                if let Some(text) = keys_text(parameters.get("value")) {
                    parameters.insert("text".to_string(), Value::from(text));
                }
            }
        },
        GET_CURRENT_WINDOW_SIZE
        | SET_CURRENT_WINDOW_SIZE
        | GET_CURRENT_WINDOW_POSITION
        | SET_CURRENT_WINDOW_POSITION
        | MAXIMIZE_CURRENT_WINDOW => {
            parameters.remove("windowHandle");
        },
        _ => {},
    }
    Ok(())
}

/// Map legacy locator strategies onto CSS selectors
fn amend_locator(parameters: &mut Map<String, Value>) -> Result<()> {
    let (Some(Value::String(using)), Some(Value::String(value))) =
        (parameters.get("using"), parameters.get("value"))
    else {
        return Ok(());
    };

    let selector = match using.as_str() {
        "id" => format!("#{}", css_escape(value)),
        "name" => format!("*[name='{}']", value.replace('\'', "\\'")),
        "class name" => {
            if value.split_whitespace().nth(1).is_some() {
                return Err(WdpError::InvalidArgument(format!(
                    "Compound class names not permitted: {value}"
                )));
            }
            format!(".{}", css_escape(value))
        },
        "tag name" => value.clone(),
        _ => return Ok(()),
    };

    parameters.insert("using".to_string(), Value::from("css selector"));
    parameters.insert("value".to_string(), Value::from(selector));
    Ok(())
}

/// Escape a CSS identifier; a leading digit becomes a code-point escape
pub fn css_escape(ident: &str) -> String {
    let escaped = CSS_SPECIAL.replace_all(ident, r"\${1}");
    let mut chars = escaped.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => format!("\\3{first} {}", chars.as_str()),
        _ => escaped.into_owned(),
    }
}

fn rename_ms(parameters: &mut Map<String, Value>, key: &str) {
    if let Some(ms) = parameters.remove("ms") {
        parameters.insert(key.to_string(), ms);
    }
}

/// Keystrokes are sent as an array of strings; W3C also wants them joined
fn keys_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Array(keys) => Some(
            keys.iter()
                .map(|key| match key {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// `{"value": ...}`; errors use the HTTP status registered for their state
pub(super) fn encode_response(response: &Response) -> (u16, Value) {
    match error_of(response) {
        Some(err) => {
            let state = response
                .state
                .as_deref()
                .filter(|state| *state != errors::SUCCESS_STATE)
                .unwrap_or(err.state());
            let mut value = err.to_json();
            value["error"] = Value::from(state);
            (errors::http_status_for_state(state), json!({ "value": value }))
        },
        None => (200, json!({ "value": response.value.to_json() })),
    }
}

/// Anything but 200 is an error described by the body's `error` token
pub(super) fn decode_response(http_status: u16, parsed: Option<Value>, text: &str) -> Result<Response> {
    if http_status == 200 {
        return Ok(decode_success(parsed, text));
    }

    let mut response = Response::default();

    match http_status {
        405 => {
            let message = error_body(parsed.as_ref())
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| text.to_string());
            set_error(&mut response, "unknown method", WebDriverError::from_state("unknown method", message));
            return Ok(response);
        },
        502 | 504 => {
            response.state = Some("unknown error".to_string());
            response.status = Some(errors::UNHANDLED_ERROR);
            response.value = ResponseValue::Json(Value::from(text));
            return Ok(response);
        },
        _ => {},
    }

    match parsed {
        Some(Value::Object(_)) => {
            let token = error_body(parsed.as_ref()).and_then(|body| {
                let state = body.get("error").and_then(Value::as_str)?;
                Some((body, state.to_string()))
            });
            let Some((body, state)) = token else {
                return Err(WdpError::Protocol {
                    reason: format!("Error body on HTTP {http_status} has no \"error\" field"),
                    content: text.to_string(),
                });
            };
            let error = WebDriverError::from_json(&Value::Object(body.clone())).unwrap_or_else(|| {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("An unknown error has occurred");
                WebDriverError::from_state(&state, message)
            });
            if let Some(Value::String(id)) = body.get("sessionId") {
                response.session_id = Some(id.clone());
            }
            set_error(&mut response, &state, error);
        },
        Some(_) => {
            return Err(WdpError::Protocol {
                reason: format!("Error body on HTTP {http_status} is not a JSON object"),
                content: text.to_string(),
            });
        },
        None => {
            tracing::warn!(http_status, "Error response without a JSON body");
            let status = status_from_http(http_status);
            let state = errors::to_state(status);
            let message = if text.is_empty() {
                format!("HTTP {http_status}")
            } else {
                text.to_string()
            };
            set_error(&mut response, state, WebDriverError::from_state(state, message));
        },
    }

    Ok(response)
}

fn decode_success(parsed: Option<Value>, text: &str) -> Response {
    let mut response = Response {
        status: Some(errors::SUCCESS),
        state: Some(errors::SUCCESS_STATE.to_string()),
        ..Response::default()
    };

    let value = match parsed {
        Some(Value::Object(mut body)) if body.contains_key("value") => {
            if let Some(Value::String(id)) = body.get("sessionId") {
                response.session_id = Some(id.clone());
            }
            body.remove("value").unwrap_or(Value::Null)
        },
        // Bare value without an envelope
        Some(value) => value,
        None if text.is_empty() => Value::Null,
        None => Value::from(text),
    };

    // New-session payloads carry the id inside the value
    if response.session_id.is_none() {
        if let Some(Value::String(id)) = value.get("sessionId") {
            response.session_id = Some(id.clone());
        }
    }

    response.value = ResponseValue::Json(value);
    response
}

/// The object holding `error`, unwrapping a `{"value": {...}}` envelope
fn error_body(parsed: Option<&Value>) -> Option<&Map<String, Value>> {
    let body = parsed?.as_object()?;
    match body.get("value") {
        Some(Value::Object(inner)) if inner.contains_key("error") => Some(inner),
        _ => Some(body),
    }
}

fn set_error(response: &mut Response, state: &str, error: WebDriverError) {
    response.state = Some(state.to_string());
    response.status = None;
    response.value = ResponseValue::Error(error);
}
