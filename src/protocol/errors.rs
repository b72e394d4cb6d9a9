//! WebDriver error taxonomy.
//!
//! Bridges three vocabularies for the same failures:
//!
//! | Vocabulary       | Example             | Used by                          |
//! |------------------|---------------------|----------------------------------|
//! | numeric status   | `7`                 | legacy JSON Wire Protocol bodies |
//! | state token      | `"no such element"` | W3C `error` field                |
//! | [`ErrorKind`]    | `NoSuchElement`     | typed [`WebDriverError`] values  |
//!
//! Several numeric codes share one state token (`32`, `51`, `52` and `19` are
//! all `"invalid selector"`), so state → status needs the canonical flags and,
//! when still ambiguous, the HTTP status as a hint.

use std::fmt;

use phf::phf_map;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Command completed
pub const SUCCESS: i64 = 0;
/// Session id unknown to the remote end
pub const NO_SUCH_SESSION: i64 = 6;
/// Element lookup failed
pub const NO_SUCH_ELEMENT: i64 = 7;
/// Frame lookup failed
pub const NO_SUCH_FRAME: i64 = 8;
/// No handler for the command
pub const UNKNOWN_COMMAND: i64 = 9;
/// Element reference no longer attached to the DOM
pub const STALE_ELEMENT_REFERENCE: i64 = 10;
/// Element not visible
pub const ELEMENT_NOT_VISIBLE: i64 = 11;
/// Element cannot be interacted with in its current state
pub const INVALID_ELEMENT_STATE: i64 = 12;
/// Catch-all server error
pub const UNHANDLED_ERROR: i64 = 13;
/// Element cannot be selected
pub const ELEMENT_NOT_SELECTABLE: i64 = 15;
/// Script raised
pub const JAVASCRIPT_ERROR: i64 = 17;
/// XPath evaluation failed
pub const XPATH_LOOKUP_ERROR: i64 = 19;
/// Operation timed out
pub const TIMEOUT: i64 = 21;
/// Window lookup failed
pub const NO_SUCH_WINDOW: i64 = 23;
/// Cookie domain does not match the page
pub const INVALID_COOKIE_DOMAIN: i64 = 24;
/// Cookie rejected
pub const UNABLE_TO_SET_COOKIE: i64 = 25;
/// A dialog blocked the command
pub const UNEXPECTED_ALERT_PRESENT: i64 = 26;
/// No dialog open
pub const NO_ALERT_PRESENT: i64 = 27;
/// Async script timed out
pub const ASYNC_SCRIPT_TIMEOUT: i64 = 28;
/// Coordinates outside the element
pub const INVALID_ELEMENT_COORDINATES: i64 = 29;
/// No input method available
pub const IME_NOT_AVAILABLE: i64 = 30;
/// Input method could not be activated
pub const IME_ENGINE_ACTIVATION_FAILED: i64 = 31;
/// Selector is malformed
pub const INVALID_SELECTOR_ERROR: i64 = 32;
/// Session could not be created
pub const SESSION_NOT_CREATED: i64 = 33;
/// Pointer target outside the viewport
pub const MOVE_TARGET_OUT_OF_BOUNDS: i64 = 34;
/// XPath is malformed
pub const INVALID_XPATH_SELECTOR: i64 = 51;
/// XPath selects something other than elements
pub const INVALID_XPATH_SELECTOR_RETURN_TYPER: i64 = 52;
/// Element cannot receive input
pub const ELEMENT_NOT_INTERACTABLE: i64 = 60;
/// Argument rejected
pub const INVALID_ARGUMENT: i64 = 61;
/// Cookie lookup failed
pub const NO_SUCH_COOKIE: i64 = 62;
/// Screenshot failed
pub const UNABLE_TO_CAPTURE_SCREEN: i64 = 63;
/// Another element would receive the click
pub const ELEMENT_CLICK_INTERCEPTED: i64 = 64;
/// Shadow root lookup failed
pub const NO_SUCH_SHADOW_ROOT: i64 = 65;
/// Method not allowed on this path
pub const METHOD_NOT_ALLOWED: i64 = 405;

/// State token of a successful response
pub const SUCCESS_STATE: &str = "success";

/// Semantic error kinds a response can be reconstructed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Another element would receive the click
    ElementClickIntercepted,
    /// Element cannot receive input
    ElementNotInteractable,
    /// Element cannot be selected
    ElementNotSelectable,
    /// Element not visible
    ElementNotVisible,
    /// Input method could not be activated
    ImeActivationFailed,
    /// No input method available
    ImeNotAvailable,
    /// Argument rejected
    InvalidArgument,
    /// Cookie domain does not match the page
    InvalidCookieDomain,
    /// Coordinates outside the element
    InvalidElementCoordinates,
    /// Element in the wrong state for the command
    InvalidElementState,
    /// Selector is malformed or selects non-elements
    InvalidSelector,
    /// Script raised
    JavascriptError,
    /// Pointer target outside the viewport
    MoveTargetOutOfBounds,
    /// No dialog open
    NoSuchAlert,
    /// Cookie lookup failed
    NoSuchCookie,
    /// Element lookup failed
    NoSuchElement,
    /// Frame lookup failed
    NoSuchFrame,
    /// Session id unknown to the remote end
    NoSuchSession,
    /// Shadow root lookup failed
    NoSuchShadowRoot,
    /// Window lookup failed
    NoSuchWindow,
    /// Async script timed out
    ScriptTimeout,
    /// Session could not be created
    SessionNotCreated,
    /// Element reference no longer attached to the DOM
    StaleElementReference,
    /// Operation timed out
    Timeout,
    /// Screenshot failed
    UnableToCaptureScreen,
    /// Cookie rejected
    UnableToSetCookie,
    /// A dialog blocked the command
    UnexpectedAlertOpen,
    /// No handler for the command or method
    UnsupportedCommand,
    /// Generic fallback for anything else
    WebDriver,
}

impl ErrorKind {
    /// Canonical legacy status code for this kind
    pub fn status(self) -> i64 {
        KNOWN_ERRORS
            .iter()
            .find(|e| e.kind == self && e.json_canonical)
            .map_or(UNHANDLED_ERROR, |e| e.status)
    }

    /// W3C state token for this kind
    pub fn state(self) -> &'static str {
        to_state(self.status())
    }

    /// HTTP status a W3C remote end answers with
    pub fn http_status(self) -> u16 {
        http_status_for_state(self.state())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state())
    }
}

struct KnownError {
    status: i64,
    state: &'static str,
    http: u16,
    kind: ErrorKind,
    /// Preferred status when going kind → status
    json_canonical: bool,
    /// Eligible when going state → status or status → state
    w3c_canonical: bool,
}

macro_rules! known {
    ($status:expr, $state:expr, $http:expr, $kind:ident, $json:expr, $w3c:expr) => {
        KnownError {
            status: $status,
            state: $state,
            http: $http,
            kind: ErrorKind::$kind,
            json_canonical: $json,
            w3c_canonical: $w3c,
        }
    };
}

static KNOWN_ERRORS: &[KnownError] = &[
    known!(ASYNC_SCRIPT_TIMEOUT, "script timeout", 500, ScriptTimeout, true, true),
    known!(ELEMENT_CLICK_INTERCEPTED, "element click intercepted", 400, ElementClickIntercepted, true, true),
    known!(ELEMENT_NOT_SELECTABLE, "element not selectable", 400, ElementNotSelectable, true, true),
    known!(ELEMENT_NOT_INTERACTABLE, "element not interactable", 400, ElementNotInteractable, true, true),
    known!(ELEMENT_NOT_VISIBLE, "element not visible", 400, ElementNotVisible, true, true),
    known!(IME_ENGINE_ACTIVATION_FAILED, "unsupported operation", 500, ImeActivationFailed, true, false),
    known!(IME_NOT_AVAILABLE, "unsupported operation", 500, ImeNotAvailable, true, false),
    known!(INVALID_ARGUMENT, "invalid argument", 400, InvalidArgument, true, true),
    known!(INVALID_COOKIE_DOMAIN, "invalid cookie domain", 400, InvalidCookieDomain, true, true),
    known!(INVALID_ELEMENT_COORDINATES, "invalid element coordinates", 400, InvalidElementCoordinates, true, true),
    known!(INVALID_ELEMENT_STATE, "invalid element state", 400, InvalidElementState, true, true),
    known!(INVALID_SELECTOR_ERROR, "invalid selector", 400, InvalidSelector, true, true),
    known!(INVALID_XPATH_SELECTOR, "invalid selector", 400, InvalidSelector, false, false),
    known!(INVALID_XPATH_SELECTOR_RETURN_TYPER, "invalid selector", 400, InvalidSelector, false, true),
    known!(JAVASCRIPT_ERROR, "javascript error", 500, JavascriptError, true, true),
    known!(METHOD_NOT_ALLOWED, "unknown method", 405, UnsupportedCommand, false, true),
    known!(METHOD_NOT_ALLOWED, "unsupported operation", 500, UnsupportedCommand, false, true),
    known!(MOVE_TARGET_OUT_OF_BOUNDS, "move target out of bounds", 500, MoveTargetOutOfBounds, true, true),
    known!(NO_ALERT_PRESENT, "no such alert", 404, NoSuchAlert, true, true),
    known!(NO_SUCH_COOKIE, "no such cookie", 404, NoSuchCookie, true, true),
    known!(NO_SUCH_ELEMENT, "no such element", 404, NoSuchElement, true, true),
    known!(NO_SUCH_FRAME, "no such frame", 404, NoSuchFrame, true, true),
    known!(NO_SUCH_SESSION, "invalid session id", 404, NoSuchSession, true, true),
    known!(NO_SUCH_SHADOW_ROOT, "no such shadow root", 404, NoSuchShadowRoot, true, true),
    known!(NO_SUCH_WINDOW, "no such window", 404, NoSuchWindow, true, true),
    known!(SESSION_NOT_CREATED, "session not created", 500, SessionNotCreated, true, true),
    known!(STALE_ELEMENT_REFERENCE, "stale element reference", 404, StaleElementReference, true, true),
    known!(TIMEOUT, "timeout", 500, Timeout, true, true),
    known!(XPATH_LOOKUP_ERROR, "invalid selector", 400, InvalidSelector, false, false),
    known!(UNABLE_TO_CAPTURE_SCREEN, "unable to capture screen", 500, UnableToCaptureScreen, true, true),
    known!(UNABLE_TO_SET_COOKIE, "unable to set cookie", 500, UnableToSetCookie, true, true),
    known!(UNEXPECTED_ALERT_PRESENT, "unexpected alert open", 500, UnexpectedAlertOpen, true, true),
    known!(UNHANDLED_ERROR, "unknown error", 500, WebDriver, true, true),
    known!(UNKNOWN_COMMAND, "unknown command", 404, UnsupportedCommand, true, true),
];

/// State token → error kind. Tokens missing here fall back to [`ErrorKind::WebDriver`].
static STATE_KINDS: phf::Map<&'static str, ErrorKind> = phf_map! {
    "element click intercepted" => ErrorKind::ElementClickIntercepted,
    "element not interactable" => ErrorKind::ElementNotInteractable,
    "element not selectable" => ErrorKind::ElementNotSelectable,
    "element not visible" => ErrorKind::ElementNotVisible,
    "invalid argument" => ErrorKind::InvalidArgument,
    "invalid cookie domain" => ErrorKind::InvalidCookieDomain,
    "invalid element coordinates" => ErrorKind::InvalidElementCoordinates,
    "invalid element state" => ErrorKind::InvalidElementState,
    "invalid selector" => ErrorKind::InvalidSelector,
    "invalid session id" => ErrorKind::NoSuchSession,
    "javascript error" => ErrorKind::JavascriptError,
    "move target out of bounds" => ErrorKind::MoveTargetOutOfBounds,
    "no such alert" => ErrorKind::NoSuchAlert,
    "no such cookie" => ErrorKind::NoSuchCookie,
    "no such element" => ErrorKind::NoSuchElement,
    "no such frame" => ErrorKind::NoSuchFrame,
    "no such shadow root" => ErrorKind::NoSuchShadowRoot,
    "no such window" => ErrorKind::NoSuchWindow,
    "script timeout" => ErrorKind::ScriptTimeout,
    "session not created" => ErrorKind::SessionNotCreated,
    "stale element reference" => ErrorKind::StaleElementReference,
    "timeout" => ErrorKind::Timeout,
    "unable to capture screen" => ErrorKind::UnableToCaptureScreen,
    "unable to set cookie" => ErrorKind::UnableToSetCookie,
    "unexpected alert open" => ErrorKind::UnexpectedAlertOpen,
    "unknown command" => ErrorKind::UnsupportedCommand,
    "unknown method" => ErrorKind::UnsupportedCommand,
    "unsupported operation" => ErrorKind::UnsupportedCommand,
    "unknown error" => ErrorKind::WebDriver,
};

/// Whether a legacy status denotes success
pub fn is_success(status: i64) -> bool {
    status == SUCCESS
}

/// Legacy status → W3C state token. Unknown codes map to `"unknown error"`.
pub fn to_state(status: i64) -> &'static str {
    if status == SUCCESS {
        return SUCCESS_STATE;
    }

    KNOWN_ERRORS
        .iter()
        .find(|e| e.status == status && e.w3c_canonical)
        .or_else(|| KNOWN_ERRORS.iter().find(|e| e.status == status))
        .map_or("unknown error", |e| e.state)
}

/// W3C state token → legacy status.
///
/// Among canonical candidates the lowest code wins, unless one of them
/// matches `http_status`. Unknown tokens map to [`UNHANDLED_ERROR`].
pub fn to_status(state: &str, http_status: Option<u16>) -> i64 {
    if state == SUCCESS_STATE {
        return SUCCESS;
    }

    let mut candidates: Vec<&KnownError> = KNOWN_ERRORS
        .iter()
        .filter(|e| e.state == state && e.w3c_canonical)
        .collect();
    candidates.sort_by_key(|e| e.status);

    let Some(first) = candidates.first() else {
        return UNHANDLED_ERROR;
    };

    http_status
        .and_then(|http| candidates.iter().find(|e| e.http == http))
        .unwrap_or(first)
        .status
}

/// HTTP status a W3C remote end uses for a state token
pub fn http_status_for_state(state: &str) -> u16 {
    if state == SUCCESS_STATE {
        return 200;
    }

    KNOWN_ERRORS
        .iter()
        .find(|e| e.state == state && e.w3c_canonical)
        .map_or(500, |e| e.http)
}

/// Error kind registered for a state token
pub fn kind_for_state(state: &str) -> Option<ErrorKind> {
    STATE_KINDS.get(state).copied()
}

/// Error kind for a legacy status code
pub fn kind_for_status(status: i64) -> ErrorKind {
    KNOWN_ERRORS
        .iter()
        .find(|e| e.status == status && e.json_canonical)
        .or_else(|| KNOWN_ERRORS.iter().find(|e| e.status == status))
        .map_or(ErrorKind::WebDriver, |e| e.kind)
}

/// Whether a status and state token describe the same outcome
pub fn is_consistent(status: i64, state: &str) -> bool {
    if status == SUCCESS || state == SUCCESS_STATE {
        return status == SUCCESS && state == SUCCESS_STATE;
    }

    to_state(status) == state
        || KNOWN_ERRORS
            .iter()
            .any(|e| e.status == status && e.state == state)
}

/// A WebDriver error reconstructed from, or destined for, the wire
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct WebDriverError {
    /// Semantic kind
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Remote stack trace, if the remote end sent one
    pub stacktrace: Option<String>,
    /// Extra structured data (e.g. `{"text": ...}` for unexpected alerts)
    pub data: Option<Value>,
}

impl WebDriverError {
    /// Create an error of a known kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stacktrace: None,
            data: None,
        }
    }

    /// Build from a state token.
    ///
    /// Tokens without a registered kind produce a generic
    /// [`ErrorKind::WebDriver`] error that still carries the message.
    pub fn from_state(state: &str, message: impl Into<String>) -> Self {
        let kind = kind_for_state(state).unwrap_or_else(|| {
            tracing::warn!(state, "Unrecognised error state, using generic error");
            ErrorKind::WebDriver
        });
        Self::new(kind, message)
    }

    /// Attach a remote stack trace
    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }

    /// Attach structured data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Legacy status code
    pub fn status(&self) -> i64 {
        self.kind.status()
    }

    /// W3C state token
    pub fn state(&self) -> &'static str {
        self.kind.state()
    }

    /// W3C error object: `{"error", "message", "stacktrace"[, "data"]}`
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("error".into(), Value::from(self.state()));
        obj.insert("message".into(), Value::from(self.message.as_str()));
        obj.insert(
            "stacktrace".into(),
            Value::from(self.stacktrace.as_deref().unwrap_or_default()),
        );
        if let Some(data) = &self.data {
            obj.insert("data".into(), data.clone());
        }
        Value::Object(obj)
    }

    /// Parse a W3C error object. Returns `None` when `error` is missing.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let state = obj.get("error")?.as_str()?;
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("An unknown error has occurred");

        let mut error = Self::from_state(state, message);
        error.stacktrace = obj
            .get("stacktrace")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        error.data = obj.get("data").filter(|d| !d.is_null()).cloned();
        Some(error)
    }
}
