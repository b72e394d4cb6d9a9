//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

use crate::config::ServerSection;
use crate::error::Result;
use crate::protocol::Dialect;

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind address
    pub addr: SocketAddr,
    /// Dialect spoken by command routes built from this config
    pub dialect: Dialect,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable request logging
    pub logging: bool,
    /// CORS enabled
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 4444)),
            dialect: Dialect::W3c,
            max_body_size: 10 * 1024 * 1024, // 10MB
            logging: true,
            cors_enabled: false,
        }
    }
}

impl ServerConfig {
    /// Build from the `[server]` section of a [`Config`](crate::config::Config)
    pub fn from_section(section: &ServerSection) -> Result<Self> {
        Ok(Self {
            addr: section.listen_addr()?,
            dialect: section.dialect,
            max_body_size: section.max_body_size,
            cors_enabled: section.cors,
            ..Self::default()
        })
    }

    /// Create with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        self
    }

    /// Bind to all interfaces
    pub fn bind_all(mut self) -> Self {
        let port = self.addr.port();
        self.addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        self
    }

    /// Set address directly
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Set the dialect
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set max body size
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Disable logging
    pub fn without_logging(mut self) -> Self {
        self.logging = false;
        self
    }

    /// Enable permissive CORS
    pub fn with_cors(mut self) -> Self {
        self.cors_enabled = true;
        self
    }
}
