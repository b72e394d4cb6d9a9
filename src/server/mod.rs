//! WebDriver remote-end HTTP server.
//!
//! Any [`HttpHandler`](crate::routing::HttpHandler), typically a
//! [`Route`](crate::routing::Route) tree, can be served over axum:
//! - `/health` answers with the crate version
//! - every other request is dispatched to the handler
//!
//! [`CommandRoute`] is the usual leaf: it decodes the request into a
//! [`Command`](crate::protocol::Command), runs a [`CommandHandler`] and encodes
//! the [`Response`](crate::protocol::Response) in the same dialect.
//!
//! # Example
//!
//! ```rust,ignore
//! use wdp::protocol::{Command, Response};
//! use wdp::server::{Server, ServerConfig};
//!
//! let config = ServerConfig::default().with_port(4444);
//! let server = Server::for_commands(config, |command: Command| Response::success(command.name));
//! server.run().await?;
//! ```

mod bridge;
mod config;
mod dispatch;

pub use bridge::{health_check, into_axum, HealthResponse};
pub use config::ServerConfig;
pub use dispatch::{CommandHandler, CommandRoute};

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::{Result, WdpError};
use crate::routing::{handler, Handler, HttpHandler};

/// HTTP server for a handler tree
#[derive(Clone)]
pub struct Server {
    config: ServerConfig,
    handler: Handler,
}

impl Server {
    /// Serve the `root` handler with `config`
    pub fn new(config: ServerConfig, root: impl HttpHandler + 'static) -> Self {
        Self {
            config,
            handler: handler(root),
        }
    }

    /// Serve every registered command of the configured dialect
    pub fn for_commands(config: ServerConfig, commands: impl CommandHandler + 'static) -> Self {
        let route = CommandRoute::new(config.dialect, commands);
        Self::new(config, route)
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The axum router for this server
    pub fn router(&self) -> Router {
        into_axum(self.handler.clone(), &self.config)
    }

    /// Bind the configured address and serve until the process stops
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| WdpError::Server(format!("Failed to bind to {addr}: {e}")))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        tracing::info!(
            dialect = %self.config.dialect,
            "WebDriver server listening on http://{}",
            addr.map_or_else(|| self.config.addr.to_string(), |a| a.to_string())
        );

        axum::serve(listener, self.router())
            .await
            .map_err(|e| WdpError::Server(format!("Server error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Command, Dialect, Response};

    #[test]
    fn test_for_commands_uses_config_dialect() {
        let config = ServerConfig::default().with_dialect(Dialect::Legacy);
        let server = Server::for_commands(config, |command: Command| Response::success(command.name));
        assert_eq!(server.config().dialect, Dialect::Legacy);
        let _router = server.router();
    }

    #[tokio::test]
    async fn test_bind_failure_is_server_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let server = Server::for_commands(
            ServerConfig::default().with_addr(addr),
            |_: Command| Response::success(serde_json::Value::Null),
        );
        assert!(matches!(server.run().await, Err(WdpError::Server(_))));
    }
}
