//! Decoded command results.

use serde_json::Value;

use super::errors::{self, WebDriverError, SUCCESS, SUCCESS_STATE};

/// Payload of a [`Response`]
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValue {
    /// Plain JSON result (or an error payload not yet reconstructed)
    Json(Value),
    /// Reconstructed WebDriver error
    Error(WebDriverError),
}

impl Default for ResponseValue {
    fn default() -> Self {
        ResponseValue::Json(Value::Null)
    }
}

impl ResponseValue {
    /// Value as JSON; errors render as W3C error objects
    pub fn to_json(&self) -> Value {
        match self {
            ResponseValue::Json(value) => value.clone(),
            ResponseValue::Error(err) => err.to_json(),
        }
    }

    /// The JSON value, if this is not an error
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseValue::Json(value) => Some(value),
            ResponseValue::Error(_) => None,
        }
    }

    /// The error, if this is one
    pub fn as_error(&self) -> Option<&WebDriverError> {
        match self {
            ResponseValue::Error(err) => Some(err),
            ResponseValue::Json(_) => None,
        }
    }
}

impl From<Value> for ResponseValue {
    fn from(value: Value) -> Self {
        ResponseValue::Json(value)
    }
}

impl From<WebDriverError> for ResponseValue {
    fn from(err: WebDriverError) -> Self {
        ResponseValue::Error(err)
    }
}

/// Result of one command.
///
/// `status` and `state` describe the same outcome in the two vocabularies;
/// the response codecs keep them consistent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Session the response belongs to
    pub session_id: Option<String>,
    /// Legacy numeric status, `0` on success
    pub status: Option<i64>,
    /// W3C state token, `"success"` on success
    pub state: Option<String>,
    /// Result or error
    pub value: ResponseValue,
}

impl Response {
    /// Successful response carrying `value`
    pub fn success(value: impl Into<Value>) -> Self {
        Self {
            session_id: None,
            status: Some(SUCCESS),
            state: Some(SUCCESS_STATE.to_string()),
            value: ResponseValue::Json(value.into()),
        }
    }

    /// Failed response carrying `error`
    pub fn error(error: WebDriverError) -> Self {
        Self {
            session_id: None,
            status: Some(error.status()),
            state: Some(error.state().to_string()),
            value: ResponseValue::Error(error),
        }
    }

    /// Attach a session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Whether the outcome is success, judged by status then state
    pub fn is_success(&self) -> bool {
        match (self.status, self.state.as_deref()) {
            (Some(status), _) => errors::is_success(status),
            (None, Some(state)) => state == SUCCESS_STATE,
            (None, None) => !matches!(self.value, ResponseValue::Error(_)),
        }
    }

    /// Convert into the result value or the WebDriver error it carries.
    ///
    /// An error response whose value is still plain JSON is turned into an
    /// error from its state token and any `message` field.
    pub fn into_result(self) -> std::result::Result<Value, WebDriverError> {
        if self.is_success() {
            return match self.value {
                ResponseValue::Json(value) => Ok(value),
                ResponseValue::Error(err) => Err(err),
            };
        }

        match self.value {
            ResponseValue::Error(err) => Err(err),
            ResponseValue::Json(value) => {
                let state = self
                    .state
                    .as_deref()
                    .or_else(|| self.status.map(errors::to_state))
                    .unwrap_or("unknown error");
                let message = match &value {
                    Value::String(text) => text.clone(),
                    other => other
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                };
                let mut err = WebDriverError::from_state(state, message);
                if !value.is_null() && !value.is_string() {
                    err.data = Some(value);
                }
                Err(err)
            },
        }
    }
}
