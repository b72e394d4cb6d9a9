//! Wire dialect selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{CommandCodec, ResponseCodec};
use crate::error::{Result, WdpError};

/// One of the two wire protocols a session speaks.
///
/// Chosen once, when the session is created, and fixed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Legacy JSON Wire Protocol: numeric status codes in the body
    #[serde(alias = "oss", alias = "jsonwire")]
    Legacy,
    /// W3C WebDriver: HTTP status plus `error` token
    #[default]
    W3c,
}

impl Dialect {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Legacy => "legacy",
            Dialect::W3c => "w3c",
        }
    }

    /// Command codec with this dialect's default registry
    pub fn command_codec(self) -> CommandCodec {
        CommandCodec::new(self)
    }

    /// Response codec for this dialect
    pub fn response_codec(self) -> ResponseCodec {
        ResponseCodec::new(self)
    }

    /// Guess the dialect from a new-session response body.
    ///
    /// W3C payloads nest `capabilities` under `value` and carry no top-level
    /// numeric `status`.
    pub fn detect(body: &Value) -> Self {
        let nested_caps = body
            .get("value")
            .and_then(|v| v.get("capabilities"))
            .is_some();
        if nested_caps {
            return Dialect::W3c;
        }

        match body.get("status") {
            Some(status) if status.is_number() => Dialect::Legacy,
            _ => Dialect::W3c,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = WdpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w3c" => Ok(Dialect::W3c),
            "legacy" | "oss" | "jsonwire" => Ok(Dialect::Legacy),
            other => Err(WdpError::InvalidArgument(format!("Unknown dialect: {other}"))),
        }
    }
}
