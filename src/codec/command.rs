//! Command ↔ HTTP request.

use std::sync::Arc;

use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use super::registry::{split_path, CommandRegistry, CommandSpec, PathSegment, RegistryBuilder};
use super::{legacy, shared, w3c};
use crate::error::{Result, WdpError};
use crate::http::{HttpMethod, HttpRequest, JSON_UTF_8};
use crate::protocol::{Command, Dialect, SessionId};

/// Unreserved characters (RFC 3986) stay as-is; everything else is escaped
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Reserved path parameter filled from [`Command::session_id`]
const SESSION_ID: &str = "sessionId";

static LEGACY_REGISTRY: Lazy<Arc<CommandRegistry>> =
    Lazy::new(|| Arc::new(default_bindings(Dialect::Legacy).freeze()));

static W3C_REGISTRY: Lazy<Arc<CommandRegistry>> =
    Lazy::new(|| Arc::new(default_bindings(Dialect::W3c).freeze()));

fn default_bindings(dialect: Dialect) -> RegistryBuilder {
    let mut builder = RegistryBuilder::new();
    shared::register(&mut builder, shared::SHARED_COMMANDS);
    match dialect {
        Dialect::Legacy => legacy::register(&mut builder),
        Dialect::W3c => w3c::register(&mut builder),
    }
    builder
}

/// Encodes and decodes [`Command`]s for one dialect.
///
/// Cheap to clone; clones share the frozen registry.
///
/// # Example
///
/// ```rust,ignore
/// use wdp::codec::CommandCodec;
/// use wdp::protocol::{names, Command, Dialect};
///
/// let codec = CommandCodec::new(Dialect::W3c);
/// let request = codec.encode(&Command::new("abc", names::EXECUTE_SCRIPT)
///     .with_parameter("script", "return 1")
///     .with_parameter("args", serde_json::json!([])))?;
/// assert_eq!(request.uri, "/session/abc/execute/sync");
/// ```
#[derive(Debug, Clone)]
pub struct CommandCodec {
    dialect: Dialect,
    registry: Arc<CommandRegistry>,
}

impl CommandCodec {
    /// Codec with the default bindings for `dialect`
    pub fn new(dialect: Dialect) -> Self {
        let registry = match dialect {
            Dialect::Legacy => Arc::clone(&LEGACY_REGISTRY),
            Dialect::W3c => Arc::clone(&W3C_REGISTRY),
        };
        Self { dialect, registry }
    }

    /// Start from the default bindings and add custom commands
    pub fn builder(dialect: Dialect) -> CommandCodecBuilder {
        CommandCodecBuilder {
            dialect,
            bindings: default_bindings(dialect),
        }
    }

    /// Dialect this codec speaks
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Whether `name` (or an alias of it) can be encoded
    pub fn is_supported(&self, name: &str) -> bool {
        self.registry.lookup(name).is_some()
    }

    /// Spec a command name encodes through
    pub fn spec(&self, name: &str) -> Option<&CommandSpec> {
        self.registry.lookup(name).map(|(_, spec)| spec)
    }

    /// Command a method and path decode to, without touching the body
    pub fn resolve(&self, method: HttpMethod, path: &str) -> Option<&str> {
        self.registry
            .resolve(method, &split_path(path))
            .map(|(name, _)| name)
    }

    /// The frozen registry
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Build the HTTP request for a command
    pub fn encode(&self, command: &Command) -> Result<HttpRequest> {
        let (name, spec) =
            self.registry
                .lookup(&command.name)
                .ok_or_else(|| WdpError::UnsupportedCommand {
                    name: command.name.clone(),
                })?;

        let mut parameters = command.parameters.clone();
        match self.dialect {
            Dialect::Legacy => legacy::amend_parameters(&command.name, &mut parameters)?,
            Dialect::W3c => w3c::amend_parameters(&command.name, &mut parameters)?,
        }

        let mut uri = String::new();
        for segment in spec.segments() {
            uri.push('/');
            match segment {
                PathSegment::Literal(literal) => uri.push_str(literal),
                PathSegment::Param(key) if key == SESSION_ID => {
                    let session_id = command.session_id.as_ref().ok_or_else(|| {
                        WdpError::InvalidArgument(format!(
                            "Session id is required for command {}",
                            command.name
                        ))
                    })?;
                    push_segment(&mut uri, SESSION_ID, session_id.as_str(), &command.name)?;
                },
                PathSegment::Param(key) => {
                    let value = parameters.remove(key).ok_or_else(|| {
                        WdpError::InvalidArgument(format!(
                            "Missing required parameter \"{key}\" for command {}",
                            command.name
                        ))
                    })?;
                    push_segment(&mut uri, key, &path_value(&value), &command.name)?;
                },
            }
        }
        if uri.is_empty() {
            uri.push('/');
        }

        let mut request = HttpRequest::new(spec.method(), uri);
        match spec.method() {
            HttpMethod::Post => {
                let body = serde_json::to_vec(&Value::Object(parameters))?;
                request = request
                    .with_header("Content-Type", JSON_UTF_8)
                    .with_header("Content-Length", body.len().to_string())
                    .with_content(body);
            },
            HttpMethod::Get => {
                request = request.with_header("Cache-Control", "no-cache");
            },
            HttpMethod::Delete => {},
        }

        tracing::debug!(
            dialect = %self.dialect,
            command = %command.name,
            resolved = name,
            method = %request.method,
            path = %request.uri,
            "Encoded command"
        );
        Ok(request)
    }

    /// Recover the command an HTTP request carries.
    ///
    /// Path parameters are inserted first and body keys merged over them, so
    /// a body key with the same name as a path parameter replaces it.
    pub fn decode(&self, request: &HttpRequest) -> Result<Command> {
        let parts = split_path(&request.uri);
        let (name, spec) = self
            .registry
            .resolve(request.method, &parts)
            .ok_or_else(|| WdpError::UnknownRoute {
                method: request.method,
                path: request.uri.clone(),
            })?;

        let mut parameters = Map::new();
        for (segment, part) in spec.segments().iter().zip(&parts) {
            if let PathSegment::Param(key) = segment {
                let value = percent_decode_str(part).decode_utf8().map_err(|e| {
                    WdpError::InvalidArgument(format!("Path segment {part:?} is not UTF-8: {e}"))
                })?;
                parameters.insert(key.clone(), Value::from(value.into_owned()));
            }
        }

        if !request.content.iter().all(u8::is_ascii_whitespace) {
            let body: Value = serde_json::from_slice(&request.content).map_err(|e| {
                WdpError::InvalidArgument(format!("Request body is not valid JSON: {e}"))
            })?;
            match body {
                Value::Object(map) => parameters.extend(map),
                Value::Null => {},
                other => {
                    return Err(WdpError::InvalidArgument(format!(
                        "Request body must be a JSON object, got {other}"
                    )));
                },
            }
        }

        let session_id = match parameters.remove(SESSION_ID) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(SessionId::from(id)),
            Some(other) => {
                return Err(WdpError::InvalidArgument(format!(
                    "Session id must be a string, got {other}"
                )));
            },
        };

        tracing::debug!(
            dialect = %self.dialect,
            command = name,
            method = %request.method,
            path = %request.uri,
            "Decoded command"
        );
        Ok(Command {
            session_id,
            name: name.to_string(),
            parameters,
        })
    }
}

/// Render a parameter as a path segment; strings are used unquoted
/// Append one encoded path segment.
///
/// Empty values would vanish from the path on decode, and bare dot segments
/// get normalised away by URL parsers, so both are guarded here.
fn push_segment(uri: &mut String, key: &str, value: &str, command: &str) -> Result<()> {
    match value {
        "" => {
            return Err(WdpError::InvalidArgument(format!(
                "Path parameter \"{key}\" for command {command} must not be empty"
            )));
        },
        "." | ".." => uri.extend(std::iter::repeat("%2E").take(value.len())),
        _ => uri.extend(utf8_percent_encode(value, PATH_SEGMENT)),
    }
    Ok(())
}

fn path_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Adds custom bindings on top of a dialect's defaults, then freezes them
#[derive(Debug, Clone)]
pub struct CommandCodecBuilder {
    dialect: Dialect,
    bindings: RegistryBuilder,
}

impl CommandCodecBuilder {
    /// Bind (or rebind) a command name
    pub fn define(mut self, name: impl Into<String>, method: HttpMethod, template: &str) -> Self {
        self.bindings.define(name, method, template);
        self
    }

    /// Encode `name` through the spec registered for `target`
    pub fn alias(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.bindings.alias(name, target);
        self
    }

    /// Freeze the registry
    pub fn build(self) -> CommandCodec {
        CommandCodec {
            dialect: self.dialect,
            registry: Arc::new(self.bindings.freeze()),
        }
    }
}
