//! Dialect-specific codecs between the message model and HTTP.
//!
//! # Codecs
//!
//! | Codec             | Encode                     | Decode                     |
//! |-------------------|----------------------------|----------------------------|
//! | [`CommandCodec`]  | `Command` → `HttpRequest`  | `HttpRequest` → `Command`  |
//! | [`ResponseCodec`] | `Response` → `HttpResponse`| `HttpResponse` → `Response`|
//!
//! Both come in two closed variants selected by [`Dialect`](crate::protocol::Dialect).
//! The dialects share most command bindings and differ in a handful of paths:
//!
//! ```text
//! command               legacy                          w3c
//! executeScript         POST /session/{id}/execute      POST /session/{id}/execute/sync
//! executeAsyncScript    POST /session/{id}/execute_async POST /session/{id}/execute/async
//! getAlertText          GET  /session/{id}/alert_text   GET  /session/{id}/alert/text
//! acceptAlert           POST /session/{id}/accept_alert POST /session/{id}/alert/accept
//! getCurrentWindowHandle GET /session/{id}/window_handle GET /session/{id}/window
//! ```
//!
//! # Registry
//!
//! Bindings are collected in a [`RegistryBuilder`] and frozen into a
//! [`CommandRegistry`]. The default registries are built once per process and
//! shared by every [`CommandCodec::new`]; [`CommandCodec::builder`] adds
//! vendor commands on top of them.
//!
//! # Decode Tie-Break
//!
//! When several specs match a request, the one with the fewest path segments
//! wins, then the earliest registered.

mod command;
mod legacy;
mod registry;
mod response;
mod shared;
mod w3c;

pub use command::{CommandCodec, CommandCodecBuilder};
pub use registry::{CommandRegistry, CommandSpec, PathSegment, RegistryBuilder};
pub use response::ResponseCodec;
pub use w3c::css_escape;
