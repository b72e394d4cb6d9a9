//! Command dispatch: decode the request, run a handler, encode the answer.

use std::sync::Arc;

use crate::codec::{CommandCodec, ResponseCodec};
use crate::error::WdpError;
use crate::http::{HttpRequest, HttpResponse};
use crate::protocol::{Command, Dialect, ErrorKind, Response, WebDriverError};
use crate::routing::{HttpHandler, Routable, Route};

/// Executes a decoded command
pub trait CommandHandler: Send + Sync {
    /// Run `command` and produce its response
    fn handle(&self, command: Command) -> Response;
}

impl<F> CommandHandler for F
where
    F: Fn(Command) -> Response + Send + Sync,
{
    fn handle(&self, command: Command) -> Response {
        self(command)
    }
}

/// Serves every command registered for one dialect
#[derive(Clone)]
pub struct CommandRoute {
    commands: CommandCodec,
    responses: ResponseCodec,
    handler: Arc<dyn CommandHandler>,
}

impl CommandRoute {
    /// Route using the default bindings for `dialect`
    pub fn new(dialect: Dialect, handler: impl CommandHandler + 'static) -> Self {
        Self::with_codec(dialect.command_codec(), handler)
    }

    /// Route using a custom command codec
    pub fn with_codec(commands: CommandCodec, handler: impl CommandHandler + 'static) -> Self {
        Self {
            responses: ResponseCodec::new(commands.dialect()),
            commands,
            handler: Arc::new(handler),
        }
    }

    /// Dialect spoken by this route
    pub fn dialect(&self) -> crate::protocol::Dialect {
        self.commands.dialect()
    }

    /// As a composable [`Route`]
    pub fn into_route(self) -> Route {
        Route::new(self)
    }
}

impl HttpHandler for CommandRoute {
    fn execute(&self, request: &HttpRequest) -> HttpResponse {
        let response = match self.commands.decode(request) {
            Ok(command) => {
                let session_id = command.session_id.clone();
                let mut response = self.handler.handle(command);
                if response.session_id.is_none() {
                    response.session_id = session_id.map(|id| id.as_str().to_string());
                }
                response
            },
            Err(err) => {
                tracing::warn!(request = %request, error = %err, "Unable to decode command");
                Response::error(decode_failure(&err))
            },
        };
        self.responses.encode(&response)
    }
}

impl Routable for CommandRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        self.commands.resolve(request.method, &request.uri).is_some()
    }
}

fn decode_failure(err: &WdpError) -> WebDriverError {
    let kind = match err {
        WdpError::UnknownRoute { .. } | WdpError::UnsupportedCommand { .. } => {
            ErrorKind::UnsupportedCommand
        },
        WdpError::InvalidArgument(_) | WdpError::Json(_) => ErrorKind::InvalidArgument,
        _ => ErrorKind::WebDriver,
    };
    WebDriverError::new(kind, err.to_string())
}
