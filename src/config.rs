//! # Configuration Management
//!
//! This module provides configuration management for the file transfer service.
//! Configuration is read from an optional JSON file at startup, with defaults for
//! every setting; command-line flags on the server binary override both.
//!
//! ## Configuration Sources
//!
//! 1. **JSON file**: passed with `--config`; missing fields take their defaults
//! 2. **Defaults**: used as-is when no file is given
//!
//! ## Configuration Options
//!
//! - `storage_dir`: Directory holding one regular file per stored object
//! - `listen_addr`: Address the RPC server binds to
//! - `max_transfer_connections`: Shared upload + download admission capacity (default: 10)
//! - `max_list_connections`: Listing admission capacity (default: 100)
//! - `download_chunk_size`: Bytes per outbound download message (default: 1KB)
//! - `logging`: Log level and output format
//!
//! ## Example
//!
//! ```json
//! {
//!   "storage_dir": "/var/lib/memenow/storage",
//!   "listen_addr": "127.0.0.1:50051",
//!   "logging": { "level": "debug", "json": true }
//! }
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LISTEN_ADDR, DEFAULT_LOG_LEVEL, DEFAULT_STORAGE_DIR, DOWNLOAD_CHUNK_SIZE,
    MAX_LIST_CONNECTIONS, MAX_TRANSFER_CONNECTIONS,
};
use crate::errors::{AppError, AppResult};

/// Configuration structure for the file transfer service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory backing the object store. Created on startup if absent.
    pub storage_dir: PathBuf,

    /// Socket address the server listens on.
    pub listen_addr: String,

    /// Capacity of the pool shared by upload and download calls.
    pub max_transfer_connections: usize,

    /// Capacity of the pool used by listing calls.
    pub max_list_connections: usize,

    /// Size of each chunk emitted by a download.
    pub download_chunk_size: usize,

    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit one JSON object per line instead of human-readable output.
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_transfer_connections: MAX_TRANSFER_CONNECTIONS,
            max_list_connections: MAX_LIST_CONNECTIONS,
            download_chunk_size: DOWNLOAD_CHUNK_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file with fallback to defaults.
    ///
    /// With no path the defaults are returned unchanged. With a path, the file
    /// must exist and parse; absent fields keep their default values.
    ///
    /// # Errors
    ///
    /// - `AppError::Config` if the file cannot be read or is not valid JSON
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&raw)
            .map_err(|e| AppError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_transfer_connections == 0 {
            return Err(AppError::config("max_transfer_connections must be at least 1"));
        }
        if self.max_list_connections == 0 {
            return Err(AppError::config("max_list_connections must be at least 1"));
        }
        if self.download_chunk_size == 0 {
            return Err(AppError::config("download_chunk_size must be at least 1"));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| {
                AppError::config(format!("invalid listen_addr {:?}: {}", self.listen_addr, e))
            })
    }
}
