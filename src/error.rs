//! Protocol layer error types.
//!
//! # Error Classification
//!
//! Structural failures of the codecs and router are [`WdpError`] values and are
//! always raised to the caller:
//!
//! - **Encode side**: [`WdpError::UnsupportedCommand`], [`WdpError::InvalidArgument`]
//! - **Decode side**: [`WdpError::UnknownRoute`], [`WdpError::MalformedResponseBody`],
//!   [`WdpError::Protocol`]
//!
//! WebDriver semantic errors (`no such element`, `timeout`, ...) are *not*
//! represented here. They travel inside a [`Response`](crate::protocol::Response)
//! as a [`WebDriverError`](crate::protocol::WebDriverError) value.

use thiserror::Error;

use crate::http::HttpMethod;

/// Protocol layer errors.
#[derive(Error, Debug)]
pub enum WdpError {
    /// No command spec is registered under this name.
    #[error("Unsupported command: {name}")]
    UnsupportedCommand {
        /// Name of the command that could not be encoded.
        name: String,
    },

    /// No command spec matches an incoming method and path.
    #[error("Unable to find command matching {method} {path}")]
    UnknownRoute {
        /// HTTP method of the request.
        method: HttpMethod,
        /// Request path.
        path: String,
    },

    /// A required path or body parameter is missing or unparsable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A body declared as JSON failed to parse.
    #[error("Malformed response body: {reason}")]
    MalformedResponseBody {
        /// Parser diagnostic.
        reason: String,
        /// The offending raw content.
        content: String,
    },

    /// A decoded response could not be reconciled with the error taxonomy.
    #[error("Protocol error: {reason}")]
    Protocol {
        /// What was inconsistent.
        reason: String,
        /// The offending raw content.
        content: String,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Server-side error.
    #[error("Server error: {0}")]
    Server(String),

    /// Network communication error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, WdpError>;

impl WdpError {
    /// Raw content attached to a decode failure, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            WdpError::MalformedResponseBody { content, .. } | WdpError::Protocol { content, .. } => {
                Some(content)
            },
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WdpError {
    fn from(err: reqwest::Error) -> Self {
        WdpError::Network(err.to_string())
    }
}

impl From<toml::de::Error> for WdpError {
    fn from(err: toml::de::Error) -> Self {
        WdpError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_route_names_method_and_path() {
        let err = WdpError::UnknownRoute {
            method: HttpMethod::Post,
            path: "/session/1/nope".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to find command matching POST /session/1/nope"
        );
    }

    #[test]
    fn test_decode_errors_carry_content() {
        let err = WdpError::MalformedResponseBody {
            reason: "expected value".to_string(),
            content: "{oops".to_string(),
        };
        assert_eq!(err.content(), Some("{oops"));
        assert!(WdpError::InvalidArgument("x".into()).content().is_none());
    }
}
