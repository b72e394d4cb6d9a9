//! End-to-end codec tests.
//!
//! Commands are pushed through encode and decode for both dialects, and
//! responses are decoded from the wire shapes real remote ends produce.

use serde_json::{json, Value};
use wdp::codec::{CommandCodec, ResponseCodec};
use wdp::http::{HttpMethod, HttpResponse};
use wdp::protocol::{names, Command, Dialect, ErrorKind, Response, WebDriverError};
use wdp::WdpError;

const DIALECTS: [Dialect; 2] = [Dialect::Legacy, Dialect::W3c];

/// Commands whose parameters neither dialect rewrites on encode
fn portable_commands() -> Vec<Command> {
    vec![
        Command::without_session(names::STATUS),
        Command::without_session(names::NEW_SESSION)
            .with_parameter("capabilities", json!({"alwaysMatch": {"browserName": "firefox"}})),
        Command::new("s1", names::QUIT),
        Command::new("s1", names::GET).with_parameter("url", "https://example.com/?q=a b"),
        Command::new("s1", names::GET_CURRENT_URL),
        Command::new("s1", names::GO_BACK),
        Command::new("s1", names::FIND_ELEMENT)
            .with_parameter("using", "css selector")
            .with_parameter("value", "div > p"),
        Command::new("s1", names::CLICK_ELEMENT).with_parameter("id", "el-1"),
        Command::new("s1", names::GET_ELEMENT_ATTRIBUTE)
            .with_parameter("id", "el-1")
            .with_parameter("name", "data-test id"),
        Command::new("s1", names::ADD_COOKIE)
            .with_parameter("cookie", json!({"name": "k", "value": "v", "secure": true})),
        Command::new("s1", names::DELETE_COOKIE).with_parameter("name", "k/with/slashes"),
        Command::new("s1", names::EXECUTE_SCRIPT)
            .with_parameter("script", "return arguments[0] + 1;")
            .with_parameter("args", json!([41])),
        Command::new("s1", names::ACCEPT_ALERT),
    ]
}

#[test]
fn test_encode_decode_round_trip_both_dialects() {
    for dialect in DIALECTS {
        let codec = CommandCodec::new(dialect);
        for command in portable_commands() {
            let request = codec.encode(&command).unwrap();
            let decoded = codec.decode(&request).unwrap();
            assert_eq!(decoded, command, "{dialect}: {}", request.uri);
        }
    }
}

#[test]
fn test_execute_script_path_depends_on_dialect() {
    let command = Command::new("abc", names::EXECUTE_SCRIPT)
        .with_parameter("script", "return 1")
        .with_parameter("args", json!([]));

    let legacy = CommandCodec::new(Dialect::Legacy).encode(&command).unwrap();
    let w3c = CommandCodec::new(Dialect::W3c).encode(&command).unwrap();

    assert_eq!(legacy.uri, "/session/abc/execute");
    assert_eq!(w3c.uri, "/session/abc/execute/sync");

    // Each dialect refuses the other's path
    assert!(matches!(
        CommandCodec::new(Dialect::W3c).decode(&legacy),
        Err(WdpError::UnknownRoute { .. })
    ));
    assert!(matches!(
        CommandCodec::new(Dialect::Legacy).decode(&w3c),
        Err(WdpError::UnknownRoute { .. })
    ));
}

#[test]
fn test_encoding_is_idempotent() {
    let codec = CommandCodec::new(Dialect::W3c);
    let command = Command::new("s1", names::ADD_COOKIE).with_parameter(
        "cookie",
        json!({"name": "session", "value": "ünïcödé", "path": "/", "httpOnly": false}),
    );

    let first = codec.encode(&command).unwrap();
    let second = codec.encode(&command).unwrap();

    assert_eq!(first.method, second.method);
    assert_eq!(first.uri, second.uri);
    assert_eq!(first.content, second.content);
    assert_eq!(
        first.headers.iter().collect::<Vec<_>>(),
        second.headers.iter().collect::<Vec<_>>()
    );
    assert_eq!(
        first.header("Content-Length"),
        Some(first.content.len().to_string().as_str())
    );
}

#[test]
fn test_equal_length_candidates_resolve_to_first_registered() {
    let codec = CommandCodec::builder(Dialect::W3c)
        .define("vendorThing", HttpMethod::Get, "/vendor/{kind}/thing")
        .define("vendorX", HttpMethod::Get, "/vendor/x/{what}")
        .build();

    assert_eq!(codec.resolve(HttpMethod::Get, "/vendor/x/thing"), Some("vendorThing"));
    assert_eq!(codec.resolve(HttpMethod::Get, "/vendor/x/other"), Some("vendorX"));
    assert_eq!(codec.resolve(HttpMethod::Get, "/vendor/y/thing"), Some("vendorThing"));
}

#[test]
fn test_codec_is_shared_across_threads() {
    let codec = CommandCodec::new(Dialect::Legacy);
    let expected = codec
        .encode(&Command::new("s1", names::GET).with_parameter("url", "about:blank"))
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let request = codec
                        .encode(&Command::new("s1", names::GET).with_parameter("url", "about:blank"))
                        .unwrap();
                    assert_eq!(request.content, expected.content);
                    assert_eq!(codec.decode(&request).unwrap().name, names::GET);
                }
            });
        }
    });
}

#[test]
fn test_legacy_status_only_error_is_reconciled() {
    let http = HttpResponse::new(500).with_content(r#"{"status": 7}"#);
    let response = ResponseCodec::new(Dialect::Legacy).decode(&http).unwrap();

    assert_eq!(response.status, Some(7));
    assert_eq!(response.state.as_deref(), Some("no such element"));
    assert!(!response.is_success());
}

#[test]
fn test_w3c_error_body_becomes_exception() {
    let http = HttpResponse::new(404)
        .with_header("Content-Type", "application/json")
        .with_content(r#"{"error":"no such element","message":"x"}"#);
    let response = ResponseCodec::new(Dialect::W3c).decode(&http).unwrap();

    assert_eq!(response.state.as_deref(), Some("no such element"));
    assert_eq!(response.status, Some(7));

    let err = response.value.as_error().unwrap();
    assert_eq!(err.kind, ErrorKind::NoSuchElement);
    assert_eq!(err.message, "x");
}

#[test]
fn test_w3c_unknown_error_token_keeps_message() {
    let http = HttpResponse::new(500)
        .with_content(r#"{"value":{"error":"vendor specific failure","message":"kept"}}"#);
    let response = ResponseCodec::new(Dialect::W3c).decode(&http).unwrap();

    let err = response.into_result().unwrap_err();
    assert_eq!(err.kind, ErrorKind::WebDriver);
    assert_eq!(err.message, "kept");
}

#[test]
fn test_response_survives_the_wire() {
    for dialect in DIALECTS {
        let codec = ResponseCodec::new(dialect);

        let ok = Response::success(json!({"ready": true})).with_session_id("s1");
        let decoded = codec.decode(&codec.encode(&ok)).unwrap();
        assert!(decoded.is_success(), "{dialect}");
        assert_eq!(decoded.into_result().unwrap(), json!({"ready": true}));

        let failed = Response::error(WebDriverError::new(ErrorKind::StaleElementReference, "detached"));
        let decoded = codec.decode(&codec.encode(&failed)).unwrap();
        assert_eq!(decoded.status, Some(10), "{dialect}");
        assert_eq!(decoded.state.as_deref(), Some("stale element reference"));

        let err = decoded.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::StaleElementReference);
        assert_eq!(err.message, "detached");
    }
}

#[test]
fn test_string_values_have_unix_line_endings() {
    let http = HttpResponse::new(200).with_content(r#"{"value": "line one\r\nline two"}"#);
    for dialect in DIALECTS {
        let response = ResponseCodec::new(dialect).decode(&http).unwrap();
        assert_eq!(response.value.to_json(), Value::from("line one\nline two"));
    }
}
