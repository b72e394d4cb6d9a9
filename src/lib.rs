//! # WDP - WebDriver wire protocol layer
//!
//! Encodes driver commands into HTTP requests, decodes HTTP responses into
//! results, and routes incoming HTTP requests to handlers, for both WebDriver
//! wire dialects.
//!
//! ## Features
//!
//! - **Two dialects**: legacy JSON Wire (numeric `status`) and W3C (`error` tokens + HTTP status)
//! - **Error taxonomy**: bidirectional mapping between legacy codes, W3C tokens and HTTP statuses
//! - **Command registry**: built once, frozen, extensible with vendor commands
//! - **Routing toolkit**: URL templates, composable routes, filters
//! - **Memoized bodies**: compute-once buffers that spill to disk past a threshold
//!
//! ## Architecture
//!
//! ```text
//! local end                                          remote end
//!
//! Command ─CommandCodec::encode─> HttpRequest ───────> Route ─> CommandRoute
//!                                                                  │ decode
//!                                                                  v
//!                                                           CommandHandler
//!                                                                  │ encode
//! Response <─ResponseCodec::decode─ HttpResponse <─────────────────┘
//! ```
//!
//! ### Status Reconciliation
//!
//! A decoded [`Response`] always carries both a legacy `status` and a W3C
//! `state`. Whichever the wire supplied is kept; the other is derived:
//!
//! | Wire supplies | Derived            | Example                       |
//! |---------------|--------------------|-------------------------------|
//! | status only   | `to_state(status)` | `7` → `"no such element"`     |
//! | state only    | `to_status(state)` | `"no such element"` → `7`     |
//! | neither       | from HTTP status   | `200` → success, `404` → `9`  |
//!
//! ## Quick Start
//!
//! ### Encoding a Command
//!
//! ```rust,ignore
//! use wdp::codec::CommandCodec;
//! use wdp::protocol::{names, Command, Dialect};
//!
//! let codec = CommandCodec::new(Dialect::W3c);
//! let request = codec.encode(&Command::new("abc", names::GET).with_parameter("url", "https://example.com"))?;
//! assert_eq!(request.uri, "/session/abc/url");
//! ```
//!
//! ### Decoding a Response
//!
//! ```rust,ignore
//! use wdp::codec::ResponseCodec;
//! use wdp::http::HttpResponse;
//! use wdp::protocol::Dialect;
//!
//! let http = HttpResponse::new(404).with_content(r#"{"value":{"error":"no such element","message":"gone"}}"#);
//! let response = ResponseCodec::new(Dialect::W3c).decode(&http)?;
//! assert_eq!(response.status, Some(7));
//! ```
//!
//! ### Serving Commands
//!
//! ```rust,ignore
//! use wdp::protocol::{Command, Response};
//! use wdp::server::{Server, ServerConfig};
//!
//! let server = Server::for_commands(ServerConfig::default(), |command: Command| {
//!     Response::success(command.name)
//! });
//! server.run().await?;
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod routing;
pub mod server;

// Re-exports for convenience
pub use client::RemoteExecutor;
pub use codec::{CommandCodec, ResponseCodec};
pub use config::Config;
pub use error::{Result, WdpError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MemoizedContent};
pub use protocol::{Command, Dialect, ErrorKind, Response, SessionId, WebDriverError};
pub use routing::{Filter, HttpHandler, Route, UrlTemplate};
pub use server::{CommandRoute, Server, ServerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
