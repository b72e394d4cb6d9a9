//! Local-end executor: sends encoded commands to a remote end.
//!
//! ```rust,ignore
//! use wdp::client::RemoteExecutor;
//! use wdp::protocol::{names, Command, Dialect};
//!
//! let executor = RemoteExecutor::new("http://localhost:4444/wd/hub", Dialect::W3c)?;
//! let response = executor
//!     .execute(&Command::new("abc", names::GET).with_parameter("url", "https://example.com"))
//!     .await?;
//! ```

use std::time::Duration;

use reqwest::Client;

use crate::codec::{CommandCodec, ResponseCodec};
use crate::config::ClientSection;
use crate::error::{Result, WdpError};
use crate::http::HttpResponse;
use crate::protocol::{Command, Dialect, Response};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends commands over HTTP in one fixed dialect
#[derive(Debug, Clone)]
pub struct RemoteExecutor {
    base_url: String,
    commands: CommandCodec,
    responses: ResponseCodec,
    client: Client,
}

impl RemoteExecutor {
    /// Executor for `base_url` with the default bindings for `dialect`
    pub fn new(base_url: impl Into<String>, dialect: Dialect) -> Result<Self> {
        Self::with_codec(base_url, dialect.command_codec(), DEFAULT_TIMEOUT)
    }

    /// Executor from the `[client]` config section
    pub fn from_config(section: &ClientSection) -> Result<Self> {
        Self::with_codec(
            section.base_url.as_str(),
            section.dialect.command_codec(),
            Duration::from_secs(section.timeout_secs),
        )
    }

    /// Executor with a custom command codec
    pub fn with_codec(
        base_url: impl Into<String>,
        commands: CommandCodec,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WdpError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            responses: ResponseCodec::new(commands.dialect()),
            commands,
            client,
        })
    }

    /// Remote end URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dialect this executor speaks
    pub fn dialect(&self) -> Dialect {
        self.commands.dialect()
    }

    /// Send one command and decode the answer.
    ///
    /// Transport and decode failures are `Err`; a WebDriver error reported by
    /// the remote end is an `Ok` response, see [`Response::into_result`].
    pub async fn execute(&self, command: &Command) -> Result<Response> {
        let request = self.commands.encode(command)?;
        let url = format!("{}{}", self.base_url, request.uri);

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .query(&request.query);
        for (name, value) in request.headers.iter() {
            // reqwest computes the length of the body itself
            if !name.eq_ignore_ascii_case("content-length") {
                builder = builder.header(name, value);
            }
        }
        if !request.content.is_empty() {
            builder = builder.body(request.content.clone());
        }

        let reply = builder.send().await?;
        let mut http = HttpResponse::new(reply.status().as_u16());
        for (name, value) in reply.headers() {
            if let Ok(value) = value.to_str() {
                http.headers.add(name.as_str(), value);
            }
        }
        http.content = reply.bytes().await?;

        tracing::debug!(
            command = %command.name,
            url = %url,
            status = http.status,
            "Remote end answered"
        );
        self.responses.decode(&http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let executor = RemoteExecutor::new("http://localhost:4444/wd/hub/", Dialect::Legacy).unwrap();
        assert_eq!(executor.base_url(), "http://localhost:4444/wd/hub");
        assert_eq!(executor.dialect(), Dialect::Legacy);
    }

    #[test]
    fn test_from_config() {
        let section = ClientSection {
            base_url: "http://grid:4444".to_string(),
            timeout_secs: 5,
            dialect: Dialect::W3c,
        };
        let executor = RemoteExecutor::from_config(&section).unwrap();
        assert_eq!(executor.base_url(), "http://grid:4444");
        assert_eq!(executor.dialect(), Dialect::W3c);
    }

    #[tokio::test]
    async fn test_unsupported_command_fails_before_sending() {
        let executor = RemoteExecutor::new("http://127.0.0.1:9", Dialect::W3c).unwrap();
        let result = executor.execute(&Command::new("s1", "noSuchCommand")).await;
        assert!(matches!(result, Err(WdpError::UnsupportedCommand { .. })));
    }
}
