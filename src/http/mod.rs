//! Transport-neutral HTTP message model.
//!
//! Every other subsystem speaks in these types: the command codec produces
//! [`HttpRequest`]s, the response codec consumes [`HttpResponse`]s and the
//! router dispatches on both. They carry no I/O; the `server` and `client`
//! modules convert them to and from axum / reqwest at the edges.
//!
//! # Shape
//!
//! ```text
//! HttpRequest                          HttpResponse
//! ├── method   GET | POST | DELETE     ├── status   u16
//! ├── uri      path only, no host      ├── headers  multimap
//! ├── headers  multimap (ordered)      ├── content  bytes
//! ├── query    multimap                └── attributes
//! ├── content  bytes
//! ├── attributes  out-of-band, never serialized
//! └── context     route-prefix stack
//! ```

mod content;
mod context;
mod message;

pub use content::{MemoizedContent, DEFAULT_MEMORY_THRESHOLD};
pub use context::{relative_to_context, RequestContext};
pub use message::{Attributes, Headers, HttpMethod, HttpRequest, HttpResponse};

/// `Content-Type` value for every JSON body this crate produces.
pub const JSON_UTF_8: &str = "application/json; charset=utf-8";

/// An `Expires` value that is already in the past.
pub const ALREADY_EXPIRED: &str = "Thu, 01 Jan 1970 00:00:00 GMT";
