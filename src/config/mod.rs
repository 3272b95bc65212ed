//! Configuration management for `faleproxy.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                     |
//! |-----------|---------------------------------------------|
//! | `[serve]` | Proxy server settings (interface, port)     |
//! | `[fetch]` | Upstream requests (timeout, user agent)     |
//!
//! The config file is optional: defaults apply when it is absent, and CLI
//! arguments override file values.

use crate::cli::{Cli, Commands};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),
}

/// Root configuration structure representing faleproxy.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy server settings
    pub serve: ServeConfig,

    /// Upstream fetch settings
    pub fetch: FetchConfig,
}

/// `[serve]` section: proxy server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3001,
        }
    }
}

/// `[fetch]` section: upstream request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with upstream requests.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: concat!("faleproxy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProxyConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Reads the config file when it exists, otherwise starts from defaults.
    /// Serve arguments override the file values.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = if cli.config.exists() {
            Self::from_path(&cli.config)?
        } else {
            Self::default()
        };

        if let Commands::Serve { interface, port } = &cli.command {
            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
        }

        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(toml::from_str(&raw)?)
    }
}
