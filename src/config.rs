//! # Configuration Management
//!
//! Centralized configuration for the packet bridge.
//!
//! This module provides structured configuration for the relay: listen and
//! connect endpoints, the packet catalog location, and logging options.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Environment-specific overrides via `apply_env()`
//! - Direct instantiation with defaults, then CLI overrides on top

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default listen port, matching the game's own default.
pub const DEFAULT_LISTEN_PORT: u16 = 25565;

/// Max allowed frame size (id + payload). Length prefixes claiming more
/// than this are rejected before allocation.
pub const MAX_FRAME_SIZE: usize = 2 * 1024 * 1024;

/// Default location of the packet catalog.
pub const DEFAULT_CATALOG_PATH: &str = "data/packets.csv";

/// Main bridge configuration structure that contains all configurable
/// settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProxyConfig {
    /// Listener configuration
    #[serde(default)]
    pub listen: ListenConfig,

    /// Target server configuration
    #[serde(default)]
    pub connect: ConnectConfig,

    /// Packet catalog location
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProxyConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| BridgeError::Config(format!("failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BridgeError::Config(format!("failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| BridgeError::Config(format!("failed to parse TOML: {e}")))
    }

    /// Apply overrides from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("PACKET_BRIDGE_LISTEN_HOST") {
            self.listen.host = host;
        }
        if let Ok(port) = std::env::var("PACKET_BRIDGE_LISTEN_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                self.listen.port = val;
            }
        }
        if let Ok(host) = std::env::var("PACKET_BRIDGE_CONNECT_HOST") {
            self.connect.host = host;
        }
        if let Ok(port) = std::env::var("PACKET_BRIDGE_CONNECT_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                self.connect.port = val;
            }
        }
        if let Ok(path) = std::env::var("PACKET_BRIDGE_CATALOG") {
            self.catalog.path = PathBuf::from(path);
        }
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration
    /// is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.listen.validate());
        errors.extend(self.connect.validate());
        errors.extend(self.catalog.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::Config(format!(
                "configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    /// Address to listen on
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_LISTEN_PORT,
        }
    }
}

impl ListenConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.host.is_empty() {
            errors.push("listen host cannot be empty".to_string());
        }
        errors
    }
}

/// Target server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ConnectConfig {
    /// Host to connect to
    pub host: String,

    /// Port to connect to
    pub port: u16,
}

impl ConnectConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.host.is_empty() {
            errors.push("connect host cannot be empty".to_string());
        }
        if self.port == 0 {
            errors.push("connect port cannot be 0".to_string());
        }
        errors
    }
}

/// Packet catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Path to the catalog CSV file
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.path.as_os_str().is_empty() {
            errors.push("catalog path cannot be empty".to_string());
        }
        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log filter directive, e.g. "info" or "packet_bridge=debug"
    pub level: String,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.level.is_empty() {
            errors.push("log level cannot be empty".to_string());
        }
        errors
    }
}
