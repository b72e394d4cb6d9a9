//! Logical command names shared by both dialects.
//!
//! A name identifies *what* a command does; each dialect's registry decides
//! which HTTP method and path carry it on the wire.

// Session lifecycle
/// Create a session
pub const NEW_SESSION: &str = "newSession";
/// Remote end readiness
pub const STATUS: &str = "status";
/// List active sessions
pub const GET_ALL_SESSIONS: &str = "getAllSessions";
/// Capabilities of a session
pub const GET_CAPABILITIES: &str = "getCapabilities";
/// End a session
pub const QUIT: &str = "quit";

// Navigation
/// Navigate to a URL
pub const GET: &str = "get";
/// Current page URL
pub const GET_CURRENT_URL: &str = "getCurrentUrl";
/// History back
pub const GO_BACK: &str = "goBack";
/// History forward
pub const GO_FORWARD: &str = "goForward";
/// Reload
pub const REFRESH: &str = "refresh";
/// Document title
pub const GET_TITLE: &str = "getTitle";
/// Serialized DOM
pub const GET_PAGE_SOURCE: &str = "getPageSource";
/// Viewport screenshot
pub const SCREENSHOT: &str = "screenshot";
/// Element screenshot
pub const ELEMENT_SCREENSHOT: &str = "elementScreenshot";
/// Print page to PDF
pub const PRINT_PAGE: &str = "printPage";

// Element location
/// Find one element
pub const FIND_ELEMENT: &str = "findElement";
/// Find all matching elements
pub const FIND_ELEMENTS: &str = "findElements";
/// Find one element below another
pub const FIND_CHILD_ELEMENT: &str = "findChildElement";
/// Find all matching elements below another
pub const FIND_CHILD_ELEMENTS: &str = "findChildElements";
/// Focused element
pub const GET_ACTIVE_ELEMENT: &str = "getActiveElement";
/// Shadow root of an element
pub const GET_ELEMENT_SHADOW_ROOT: &str = "getElementShadowRoot";
/// Find one element inside a shadow root
pub const FIND_ELEMENT_FROM_SHADOW_ROOT: &str = "findElementFromShadowRoot";
/// Find all matching elements inside a shadow root
pub const FIND_ELEMENTS_FROM_SHADOW_ROOT: &str = "findElementsFromShadowRoot";

// Element interaction and state
/// Click
pub const CLICK_ELEMENT: &str = "clickElement";
/// Clear an editable element
pub const CLEAR_ELEMENT: &str = "clearElement";
/// Submit the enclosing form
pub const SUBMIT_ELEMENT: &str = "submitElement";
/// Type into an element
pub const SEND_KEYS_TO_ELEMENT: &str = "sendKeysToElement";
/// Visible text
pub const GET_ELEMENT_TEXT: &str = "getElementText";
/// Tag name
pub const GET_ELEMENT_TAG_NAME: &str = "getElementTagName";
/// Attribute value
pub const GET_ELEMENT_ATTRIBUTE: &str = "getElementAttribute";
/// DOM property value
pub const GET_ELEMENT_PROPERTY: &str = "getElementProperty";
/// Computed CSS value
pub const GET_ELEMENT_VALUE_OF_CSS_PROPERTY: &str = "getElementValueOfCssProperty";
/// Position and size
pub const GET_ELEMENT_RECT: &str = "getElementRect";
/// Position only
pub const GET_ELEMENT_LOCATION: &str = "getElementLocation";
/// Position after scrolling into view
pub const GET_ELEMENT_LOCATION_ONCE_SCROLLED_INTO_VIEW: &str =
    "getElementLocationOnceScrolledIntoView";
/// Size only
pub const GET_ELEMENT_SIZE: &str = "getElementSize";
/// Checked / selected
pub const IS_ELEMENT_SELECTED: &str = "isElementSelected";
/// Enabled
pub const IS_ELEMENT_ENABLED: &str = "isElementEnabled";
/// Displayed
pub const IS_ELEMENT_DISPLAYED: &str = "isElementDisplayed";
/// Two references point at the same element
pub const ELEMENT_EQUALS: &str = "elementEquals";
/// Computed ARIA role
pub const GET_ELEMENT_ARIA_ROLE: &str = "getElementAriaRole";
/// Computed accessible name
pub const GET_ELEMENT_ACCESSIBLE_NAME: &str = "getElementAccessibleName";

// Script execution
/// Run a synchronous script
pub const EXECUTE_SCRIPT: &str = "executeScript";
/// Run an asynchronous script
pub const EXECUTE_ASYNC_SCRIPT: &str = "executeAsyncScript";

// Cookies
/// All cookies
pub const GET_ALL_COOKIES: &str = "getCookies";
/// One cookie by name
pub const GET_COOKIE: &str = "getCookie";
/// Add a cookie
pub const ADD_COOKIE: &str = "addCookie";
/// Delete one cookie
pub const DELETE_COOKIE: &str = "deleteCookie";
/// Delete all cookies
pub const DELETE_ALL_COOKIES: &str = "deleteAllCookies";

// Timeouts
/// Set one or more timeouts
pub const SET_TIMEOUT: &str = "setTimeout";
/// Read the timeouts
pub const GET_TIMEOUTS: &str = "getTimeouts";
/// Set the implicit wait
pub const IMPLICITLY_WAIT: &str = "implicitlyWait";
/// Set the script timeout
pub const SET_SCRIPT_TIMEOUT: &str = "setScriptTimeout";

// Frames and windows
/// Enter a frame
pub const SWITCH_TO_FRAME: &str = "switchToFrame";
/// Leave the current frame
pub const SWITCH_TO_PARENT_FRAME: &str = "switchToParentFrame";
/// Focus a window
pub const SWITCH_TO_WINDOW: &str = "switchToWindow";
/// Open a tab or window
pub const SWITCH_TO_NEW_WINDOW: &str = "newWindow";
/// Close the current window
pub const CLOSE: &str = "close";
/// Current window handle
pub const GET_CURRENT_WINDOW_HANDLE: &str = "getCurrentWindowHandle";
/// All window handles
pub const GET_WINDOW_HANDLES: &str = "getWindowHandles";
/// Window position and size
pub const GET_WINDOW_RECT: &str = "getWindowRect";
/// Move and resize the window
pub const SET_WINDOW_RECT: &str = "setWindowRect";
/// Window size
pub const GET_CURRENT_WINDOW_SIZE: &str = "getWindowSize";
/// Resize the window
pub const SET_CURRENT_WINDOW_SIZE: &str = "setWindowSize";
/// Window position
pub const GET_CURRENT_WINDOW_POSITION: &str = "getWindowPosition";
/// Move the window
pub const SET_CURRENT_WINDOW_POSITION: &str = "setWindowPosition";
/// Maximize
pub const MAXIMIZE_CURRENT_WINDOW: &str = "maximizeWindow";
/// Minimize
pub const MINIMIZE_CURRENT_WINDOW: &str = "minimizeWindow";
/// Fullscreen
pub const FULLSCREEN_CURRENT_WINDOW: &str = "fullscreenWindow";

// Alerts
/// Accept the open dialog
pub const ACCEPT_ALERT: &str = "acceptAlert";
/// Dismiss the open dialog
pub const DISMISS_ALERT: &str = "dismissAlert";
/// Dialog text
pub const GET_ALERT_TEXT: &str = "getAlertText";
/// Type into a prompt
pub const SET_ALERT_VALUE: &str = "setAlertValue";
/// Answer an auth prompt
pub const SET_ALERT_CREDENTIALS: &str = "setAlertCredentials";

// Input
/// Perform an action sequence
pub const ACTIONS: &str = "actions";
/// Release all pressed keys and buttons
pub const CLEAR_ACTIONS_STATE: &str = "clearActionState";
/// Move the mouse
pub const MOUSE_MOVE_TO: &str = "mouseMoveTo";
/// Press a mouse button
pub const MOUSE_DOWN: &str = "mouseButtonDown";
/// Release a mouse button
pub const MOUSE_UP: &str = "mouseButtonUp";
/// Click at the mouse position
pub const CLICK: &str = "mouseClick";
/// Double click at the mouse position
pub const DOUBLE_CLICK: &str = "mouseDoubleClick";
/// Type into the focused element
pub const SEND_KEYS_TO_ACTIVE_ELEMENT: &str = "sendKeysToActiveElement";

// Touch (mobile)
/// Tap an element
pub const TOUCH_SINGLE_TAP: &str = "touchSingleTap";
/// Finger down
pub const TOUCH_DOWN: &str = "touchDown";
/// Finger up
pub const TOUCH_UP: &str = "touchUp";
/// Finger move
pub const TOUCH_MOVE: &str = "touchMove";
/// Scroll
pub const TOUCH_SCROLL: &str = "touchScroll";
/// Double tap
pub const TOUCH_DOUBLE_TAP: &str = "touchDoubleTap";
/// Long press
pub const TOUCH_LONG_PRESS: &str = "touchLongPress";
/// Flick
pub const TOUCH_FLICK: &str = "touchFlick";

// IME (mobile)
/// Installed input methods
pub const IME_GET_AVAILABLE_ENGINES: &str = "imeGetAvailableEngines";
/// Active input method
pub const IME_GET_ACTIVE_ENGINE: &str = "imeGetActiveEngine";
/// Whether an input method is active
pub const IME_IS_ACTIVATED: &str = "imeIsActivated";
/// Deactivate the input method
pub const IME_DEACTIVATE: &str = "imeDeactivate";
/// Activate an input method
pub const IME_ACTIVATE_ENGINE: &str = "imeActivateEngine";

// Orientation (mobile)
/// Screen orientation
pub const GET_SCREEN_ORIENTATION: &str = "getScreenOrientation";
/// Rotate the screen
pub const SET_SCREEN_ORIENTATION: &str = "setScreenOrientation";

// Logs and files
/// Fetch log entries
pub const GET_LOG: &str = "getLog";
/// Available log types
pub const GET_AVAILABLE_LOG_TYPES: &str = "getAvailableLogTypes";
/// Upload a zipped file to the remote end
pub const UPLOAD_FILE: &str = "uploadFile";
