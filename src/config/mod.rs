//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for `wdp serve`)
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 4444
//! dialect = "w3c"
//!
//! [client]
//! base_url = "http://localhost:4444/wd/hub"
//! dialect = "legacy"
//!
//! [content]
//! memory_threshold = 65536
//!
//! [logging]
//! level = "wdp=debug"
//! json = false
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WdpError};
use crate::http::DEFAULT_MEMORY_THRESHOLD;
use crate::protocol::Dialect;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Remote executor settings
    #[serde(default)]
    pub client: ClientSection,

    /// Body buffering settings
    #[serde(default)]
    pub content: ContentSection,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WdpError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| WdpError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load `~/.config/wdp/config.toml` if it exists, else defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Platform config path: `<config dir>/wdp/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wdp").join("config.toml"))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server settings
        if let Ok(host) = std::env::var("WDP_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("WDP_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(dialect) = std::env::var("WDP_DIALECT") {
            match dialect.parse() {
                Ok(dialect) => {
                    config.server.dialect = dialect;
                    config.client.dialect = dialect;
                },
                Err(e) => tracing::warn!("Ignoring WDP_DIALECT: {e}"),
            }
        }

        // Client settings
        if let Ok(url) = std::env::var("WDP_REMOTE_URL") {
            config.client.base_url = url;
        }

        // Logging
        if let Ok(level) = std::env::var("WDP_LOG") {
            config.logging.level = level;
        }

        config
    }

    /// Merge with another config (other takes precedence where it differs
    /// from the defaults)
    pub fn merge(self, other: Self) -> Self {
        fn pick<T: PartialEq>(base: T, other: T, default: T) -> T {
            if other == default {
                base
            } else {
                other
            }
        }

        let server = ServerSection::default();
        let client = ClientSection::default();
        let content = ContentSection::default();
        let logging = LoggingSection::default();

        Self {
            server: ServerSection {
                host: pick(self.server.host, other.server.host, server.host),
                port: pick(self.server.port, other.server.port, server.port),
                dialect: pick(self.server.dialect, other.server.dialect, server.dialect),
                max_body_size: pick(
                    self.server.max_body_size,
                    other.server.max_body_size,
                    server.max_body_size,
                ),
                cors: pick(self.server.cors, other.server.cors, server.cors),
            },
            client: ClientSection {
                base_url: pick(self.client.base_url, other.client.base_url, client.base_url),
                timeout_secs: pick(
                    self.client.timeout_secs,
                    other.client.timeout_secs,
                    client.timeout_secs,
                ),
                dialect: pick(self.client.dialect, other.client.dialect, client.dialect),
            },
            content: ContentSection {
                memory_threshold: pick(
                    self.content.memory_threshold,
                    other.content.memory_threshold,
                    content.memory_threshold,
                ),
            },
            logging: LoggingSection {
                level: pick(self.logging.level, other.logging.level, logging.level),
                json: pick(self.logging.json, other.logging.json, logging.json),
            },
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Dialect spoken by the command route
    pub dialect: Dialect,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Permissive CORS headers
    pub cors: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4444,
            dialect: Dialect::W3c,
            max_body_size: 10 * 1024 * 1024, // 10 MB
            cors: false,
        }
    }
}

impl ServerSection {
    /// Get the full listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = if self.host == "localhost" {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|e| WdpError::Config(format!("Invalid host {:?}: {e}", self.host)))?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// `[client]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    /// Remote end URL, including any path prefix such as `/wd/hub`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Dialect negotiated with the remote end
    pub dialect: Dialect,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4444".to_string(),
            timeout_secs: 60,
            dialect: Dialect::W3c,
        }
    }
}

/// `[content]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSection {
    /// Bytes kept in memory before a buffered body spills to disk
    pub memory_threshold: usize,
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "wdp=info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 4444);
        assert_eq!(config.server.dialect, Dialect::W3c);
        assert_eq!(config.content.memory_threshold, 64 * 1024);
        assert_eq!(config.logging.level, "wdp=info");
    }

    #[test]
    fn test_listen_addr() {
        let section = ServerSection::default();
        assert_eq!(section.listen_addr().unwrap().to_string(), "127.0.0.1:4444");

        let bad = ServerSection {
            host: "not a host".to_string(),
            ..ServerSection::default()
        };
        assert!(matches!(bad.listen_addr(), Err(WdpError::Config(_))));
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [server]
            port = 9515
            dialect = "legacy"

            [client]
            base_url = "http://grid:4444/wd/hub"

            [logging]
            json = true
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9515);
        assert_eq!(config.server.dialect, Dialect::Legacy);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.client.base_url, "http://grid:4444/wd/hub");
        assert!(config.logging.json);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[content]\nmemory_threshold = 1024").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.content.memory_threshold, 1024);

        assert!(matches!(
            Config::from_file("/definitely/not/here.toml"),
            Err(WdpError::Config(_))
        ));
    }

    #[test]
    fn test_merge_prefers_non_default_values() {
        let mut base = Config::default();
        base.server.port = 9000;
        base.logging.level = "wdp=debug".to_string();

        let mut other = Config::default();
        other.server.dialect = Dialect::Legacy;

        let merged = base.merge(other);
        assert_eq!(merged.server.port, 9000);
        assert_eq!(merged.server.dialect, Dialect::Legacy);
        assert_eq!(merged.logging.level, "wdp=debug");
    }
}
