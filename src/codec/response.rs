//! Response ↔ HTTP response.
//!
//! Body parsing and status/state reconciliation are shared; the envelope
//! shape is delegated to the dialect modules.

use serde_json::Value;

use super::{legacy, w3c};
use crate::error::{Result, WdpError};
use crate::http::{HttpResponse, ALREADY_EXPIRED};
use crate::protocol::errors::{self, WebDriverError};
use crate::protocol::{Dialect, Response, ResponseValue};

/// Encodes and decodes [`Response`]s for one dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCodec {
    dialect: Dialect,
}

impl ResponseCodec {
    /// Codec for `dialect`
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Dialect this codec speaks
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Serialize a response. Caching is always disabled.
    pub fn encode(&self, response: &Response) -> HttpResponse {
        let (status, body) = match self.dialect {
            Dialect::Legacy => legacy::encode_response(response),
            Dialect::W3c => w3c::encode_response(response),
        };

        HttpResponse::new(status)
            .with_json(&body)
            .with_header("Cache-Control", "no-cache")
            .with_header("Expires", ALREADY_EXPIRED)
    }

    /// Parse a response.
    ///
    /// A body that fails to parse is fatal only when it was declared as JSON;
    /// otherwise the outcome is derived from the HTTP status alone.
    pub fn decode(&self, http: &HttpResponse) -> Result<Response> {
        let text = http.utf8_string();
        let content = text.trim();

        let parsed = if content.is_empty() {
            None
        } else {
            match serde_json::from_str::<Value>(content) {
                Ok(value) => Some(value),
                Err(e) if declares_json(http) => {
                    return Err(WdpError::MalformedResponseBody {
                        reason: e.to_string(),
                        content: content.to_string(),
                    });
                },
                Err(_) => {
                    tracing::warn!(
                        status = http.status,
                        "Response body is not JSON, falling back to HTTP status"
                    );
                    None
                },
            }
        };

        let mut response = match self.dialect {
            Dialect::Legacy => legacy::decode_response(http.status, parsed, content)?,
            Dialect::W3c => w3c::decode_response(http.status, parsed, content)?,
        };

        reconcile(&mut response, http.status, content)?;
        normalize_line_endings(&mut response.value);

        tracing::debug!(
            dialect = %self.dialect,
            http_status = http.status,
            status = ?response.status,
            state = ?response.state,
            "Decoded response"
        );
        Ok(response)
    }
}

fn declares_json(http: &HttpResponse) -> bool {
    http.header("Content-Type")
        .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
}

/// Fill whichever of status/state is missing from the other
fn reconcile(response: &mut Response, http_status: u16, content: &str) -> Result<()> {
    match (response.status, response.state.as_deref()) {
        (Some(status), None) => {
            response.state = Some(errors::to_state(status).to_string());
        },
        (None, Some(state)) => {
            response.status = Some(errors::to_status(state, Some(http_status)));
        },
        (None, None) => {
            let status = if (200..300).contains(&http_status) {
                errors::SUCCESS
            } else {
                status_from_http(http_status)
            };
            response.status = Some(status);
            response.state = Some(errors::to_state(status).to_string());
        },
        (Some(status), Some(state)) => {
            if !errors::is_consistent(status, state) {
                return Err(WdpError::Protocol {
                    reason: format!("Status {status} does not match state {state:?}"),
                    content: content.to_string(),
                });
            }
        },
    }
    Ok(())
}

fn normalize_line_endings(value: &mut ResponseValue) {
    match value {
        ResponseValue::Json(Value::String(text)) if text.contains("\r\n") => {
            *text = text.replace("\r\n", "\n");
        },
        ResponseValue::Error(err) if err.message.contains("\r\n") => {
            err.message = err.message.replace("\r\n", "\n");
        },
        _ => {},
    }
}

/// Status implied by a bare HTTP error status
pub(super) fn status_from_http(http_status: u16) -> i64 {
    if (400..500).contains(&http_status) {
        errors::UNKNOWN_COMMAND
    } else {
        errors::UNHANDLED_ERROR
    }
}

/// Status to put on the wire, derived from state when absent
pub(super) fn resolved_status(response: &Response) -> i64 {
    match (response.status, response.state.as_deref(), &response.value) {
        (Some(status), _, _) => status,
        (None, Some(state), _) => errors::to_status(state, None),
        (None, None, ResponseValue::Error(err)) => err.status(),
        (None, None, ResponseValue::Json(_)) => errors::SUCCESS,
    }
}

/// State token to put on the wire, derived from status when absent
pub(super) fn resolved_state(response: &Response) -> String {
    response
        .state
        .clone()
        .unwrap_or_else(|| errors::to_state(resolved_status(response)).to_string())
}

/// The error an outgoing response describes, if any
pub(super) fn error_of(response: &Response) -> Option<WebDriverError> {
    match &response.value {
        ResponseValue::Error(err) => Some(err.clone()),
        ResponseValue::Json(_) if !response.is_success() => response.clone().into_result().err(),
        ResponseValue::Json(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::JSON_UTF_8;
    use crate::protocol::ErrorKind;
    use serde_json::json;

    fn http(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(status)
            .with_header("Content-Type", JSON_UTF_8)
            .with_content(body.to_string())
    }

    #[test]
    fn test_encode_disables_caching() {
        let codec = ResponseCodec::new(Dialect::W3c);
        let http = codec.encode(&Response::success(json!(1)));
        assert_eq!(http.header("Cache-Control"), Some("no-cache"));
        assert_eq!(http.header("Expires"), Some(ALREADY_EXPIRED));
        assert_eq!(http.header("Content-Type"), Some(JSON_UTF_8));
    }

    #[test]
    fn test_legacy_status_only_derives_state() {
        let codec = ResponseCodec::new(Dialect::Legacy);
        let response = codec.decode(&http(500, r#"{"status": 7}"#)).unwrap();
        assert_eq!(response.status, Some(7));
        assert_eq!(response.state.as_deref(), Some("no such element"));
    }

    #[test]
    fn test_legacy_empty_200_is_success() {
        let codec = ResponseCodec::new(Dialect::Legacy);
        let response = codec.decode(&HttpResponse::new(200)).unwrap();
        assert!(response.is_success());
        assert_eq!(response.value, ResponseValue::Json(Value::Null));
    }

    #[test]
    fn test_legacy_empty_2xx_is_success() {
        let codec = ResponseCodec::new(Dialect::Legacy);
        let response = codec.decode(&HttpResponse::new(204)).unwrap();
        assert!(response.is_success());
        assert_eq!(response.status, Some(errors::SUCCESS));
        assert_eq!(response.state.as_deref(), Some("success"));
    }

    #[test]
    fn test_w3c_state_only_derives_status_with_http_hint() {
        let codec = ResponseCodec::new(Dialect::W3c);
        let body = r#"{"value": {"error": "invalid selector", "message": "bad"}}"#;
        let response = codec.decode(&http(400, body)).unwrap();
        assert_eq!(response.status, Some(errors::INVALID_SELECTOR_ERROR));
        assert_eq!(response.value.as_error().unwrap().kind, ErrorKind::InvalidSelector);
    }

    #[test]
    fn test_declared_json_parse_failure_is_fatal() {
        let codec = ResponseCodec::new(Dialect::W3c);
        let err = codec.decode(&http(200, "  {not json ")).unwrap_err();
        match err {
            WdpError::MalformedResponseBody { content, .. } => assert_eq!(content, "{not json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undeclared_non_json_falls_back_to_http_status() {
        let codec = ResponseCodec::new(Dialect::Legacy);
        let response = codec
            .decode(&HttpResponse::new(404).with_text("Not Found"))
            .unwrap();
        assert_eq!(response.status, Some(errors::UNKNOWN_COMMAND));
        assert_eq!(response.state.as_deref(), Some("unknown command"));
    }

    #[test]
    fn test_inconsistent_status_and_state_is_protocol_error() {
        let codec = ResponseCodec::new(Dialect::Legacy);
        let body = r#"{"status": 7, "state": "timeout", "value": null}"#;
        let err = codec.decode(&http(500, body)).unwrap_err();
        assert!(matches!(err, WdpError::Protocol { .. }));
        assert_eq!(err.content(), Some(body));
    }

    #[test]
    fn test_crlf_normalized() {
        let codec = ResponseCodec::new(Dialect::W3c);
        let response = codec.decode(&http(200, r#"{"value": "a\r\nb"}"#)).unwrap();
        assert_eq!(response.value, ResponseValue::Json(json!("a\nb")));
    }
}
