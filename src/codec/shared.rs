//! Command bindings both dialects agree on.

use super::registry::RegistryBuilder;
use crate::http::HttpMethod::{self, Delete, Get, Post};
#[allow(clippy::wildcard_imports)]
use crate::protocol::names::*;

/// `(command name, method, path template)`
pub(super) type Binding = (&'static str, HttpMethod, &'static str);

pub(super) static SHARED_COMMANDS: &[Binding] = &[
    // Session lifecycle
    (STATUS, Get, "/status"),
    (GET_ALL_SESSIONS, Get, "/sessions"),
    (NEW_SESSION, Post, "/session"),
    (GET_CAPABILITIES, Get, "/session/{sessionId}"),
    (QUIT, Delete, "/session/{sessionId}"),
    // Navigation
    (GET_CURRENT_URL, Get, "/session/{sessionId}/url"),
    (GET, Post, "/session/{sessionId}/url"),
    (GO_BACK, Post, "/session/{sessionId}/back"),
    (GO_FORWARD, Post, "/session/{sessionId}/forward"),
    (REFRESH, Post, "/session/{sessionId}/refresh"),
    (GET_TITLE, Get, "/session/{sessionId}/title"),
    (GET_PAGE_SOURCE, Get, "/session/{sessionId}/source"),
    (SCREENSHOT, Get, "/session/{sessionId}/screenshot"),
    (ELEMENT_SCREENSHOT, Get, "/session/{sessionId}/element/{id}/screenshot"),
    // Element location
    (FIND_ELEMENT, Post, "/session/{sessionId}/element"),
    (FIND_ELEMENTS, Post, "/session/{sessionId}/elements"),
    (FIND_CHILD_ELEMENT, Post, "/session/{sessionId}/element/{id}/element"),
    (FIND_CHILD_ELEMENTS, Post, "/session/{sessionId}/element/{id}/elements"),
    // Element interaction and state
    (CLICK_ELEMENT, Post, "/session/{sessionId}/element/{id}/click"),
    (CLEAR_ELEMENT, Post, "/session/{sessionId}/element/{id}/clear"),
    (SEND_KEYS_TO_ELEMENT, Post, "/session/{sessionId}/element/{id}/value"),
    (GET_ELEMENT_TEXT, Get, "/session/{sessionId}/element/{id}/text"),
    (GET_ELEMENT_TAG_NAME, Get, "/session/{sessionId}/element/{id}/name"),
    (GET_ELEMENT_ATTRIBUTE, Get, "/session/{sessionId}/element/{id}/attribute/{name}"),
    (GET_ELEMENT_PROPERTY, Get, "/session/{sessionId}/element/{id}/property/{name}"),
    (
        GET_ELEMENT_VALUE_OF_CSS_PROPERTY,
        Get,
        "/session/{sessionId}/element/{id}/css/{propertyName}",
    ),
    (GET_ELEMENT_RECT, Get, "/session/{sessionId}/element/{id}/rect"),
    (IS_ELEMENT_SELECTED, Get, "/session/{sessionId}/element/{id}/selected"),
    (IS_ELEMENT_ENABLED, Get, "/session/{sessionId}/element/{id}/enabled"),
    (IS_ELEMENT_DISPLAYED, Get, "/session/{sessionId}/element/{id}/displayed"),
    (ELEMENT_EQUALS, Get, "/session/{sessionId}/element/{id}/equals/{other}"),
    // Cookies
    (GET_ALL_COOKIES, Get, "/session/{sessionId}/cookie"),
    (GET_COOKIE, Get, "/session/{sessionId}/cookie/{name}"),
    (ADD_COOKIE, Post, "/session/{sessionId}/cookie"),
    (DELETE_ALL_COOKIES, Delete, "/session/{sessionId}/cookie"),
    (DELETE_COOKIE, Delete, "/session/{sessionId}/cookie/{name}"),
    // Timeouts
    (SET_TIMEOUT, Post, "/session/{sessionId}/timeouts"),
    // Frames and windows
    (SWITCH_TO_FRAME, Post, "/session/{sessionId}/frame"),
    (SWITCH_TO_PARENT_FRAME, Post, "/session/{sessionId}/frame/parent"),
    (SWITCH_TO_WINDOW, Post, "/session/{sessionId}/window"),
    (CLOSE, Delete, "/session/{sessionId}/window"),
    (FULLSCREEN_CURRENT_WINDOW, Post, "/session/{sessionId}/window/fullscreen"),
    // Alerts
    (SET_ALERT_CREDENTIALS, Post, "/session/{sessionId}/alert/credentials"),
    // Touch (mobile)
    (TOUCH_SINGLE_TAP, Post, "/session/{sessionId}/touch/click"),
    (TOUCH_DOWN, Post, "/session/{sessionId}/touch/down"),
    (TOUCH_UP, Post, "/session/{sessionId}/touch/up"),
    (TOUCH_MOVE, Post, "/session/{sessionId}/touch/move"),
    (TOUCH_SCROLL, Post, "/session/{sessionId}/touch/scroll"),
    (TOUCH_DOUBLE_TAP, Post, "/session/{sessionId}/touch/doubleclick"),
    (TOUCH_LONG_PRESS, Post, "/session/{sessionId}/touch/longclick"),
    (TOUCH_FLICK, Post, "/session/{sessionId}/touch/flick"),
    // IME (mobile)
    (IME_GET_AVAILABLE_ENGINES, Get, "/session/{sessionId}/ime/available_engines"),
    (IME_GET_ACTIVE_ENGINE, Get, "/session/{sessionId}/ime/active_engine"),
    (IME_IS_ACTIVATED, Get, "/session/{sessionId}/ime/activated"),
    (IME_DEACTIVATE, Post, "/session/{sessionId}/ime/deactivate"),
    (IME_ACTIVATE_ENGINE, Post, "/session/{sessionId}/ime/activate"),
    // Orientation (mobile)
    (GET_SCREEN_ORIENTATION, Get, "/session/{sessionId}/orientation"),
    (SET_SCREEN_ORIENTATION, Post, "/session/{sessionId}/orientation"),
    // Logs and files
    (GET_LOG, Post, "/session/{sessionId}/se/log"),
    (GET_AVAILABLE_LOG_TYPES, Get, "/session/{sessionId}/se/log/types"),
    (UPLOAD_FILE, Post, "/session/{sessionId}/se/file"),
];

/// Register a binding table
pub(super) fn register(builder: &mut RegistryBuilder, bindings: &[Binding]) {
    for &(name, method, template) in bindings {
        builder.define(name, method, template);
    }
}
