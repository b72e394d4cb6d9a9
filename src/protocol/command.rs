//! Commands and session identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque session identifier, compared by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One driver operation and its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Target session; absent for pre-session commands such as `newSession`
    #[serde(rename = "sessionId", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Logical command name, see [`names`](super::names)
    pub name: String,
    /// Named arguments
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl Command {
    /// Create a command bound to a session
    pub fn new(session_id: impl Into<SessionId>, name: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            name: name.into(),
            parameters: Map::new(),
        }
    }

    /// Create a pre-session command
    pub fn without_session(name: impl Into<String>) -> Self {
        Self {
            session_id: None,
            name: name.into(),
            parameters: Map::new(),
        }
    }

    /// Add or replace a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Replace all parameters
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Look up a parameter
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.session_id {
            Some(id) => write!(f, "[{id}, {}]", self.name),
            None => write!(f, "[null, {}]", self.name),
        }
    }
}
