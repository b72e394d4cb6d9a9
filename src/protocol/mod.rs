//! Dialect-independent WebDriver message model.
//!
//! A driver builds a [`Command`]; a [`CommandCodec`](crate::codec::CommandCodec)
//! turns it into an HTTP request for one of the two wire [`Dialect`]s. The
//! remote end answers with a [`Response`], whose `status` (legacy numeric code)
//! and `state` (W3C error token) are kept consistent by the
//! [`errors`] taxonomy.
//!
//! ## Message Flow
//!
//! ```text
//! Driver                               Remote end
//!   |                                      |
//!   |  Command ──encode──> HttpRequest ───>|  decode ──> Command
//!   |                                      |              │ handler
//!   |  Response <──decode── HttpResponse <─|  encode <── Response
//! ```
//!
//! ## Dialects
//!
//! | Dialect  | Errors signalled by        | Envelope                              |
//! |----------|----------------------------|---------------------------------------|
//! | `Legacy` | numeric `status` in body   | `{"sessionId", "status", "value"}`    |
//! | `W3c`    | HTTP status + `error` token| `{"value": ...}`                      |

mod command;
mod dialect;
pub mod errors;
pub mod names;
mod response;

pub use command::{Command, SessionId};
pub use dialect::Dialect;
pub use errors::{ErrorKind, WebDriverError};
pub use response::{Response, ResponseValue};
