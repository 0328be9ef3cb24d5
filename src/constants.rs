//! # Application Constants
//!
//! This module defines application-wide constants used throughout the file transfer service.
//! Centralizing constants keeps the server, the client driver and the tests in agreement
//! on limits and wire-visible strings.
//!
//! ## Storage
//!
//! Default location of the flat object directory.
//!
//! ## Admission Limits
//!
//! Capacities of the two admission pools. Uploads and downloads share one pool.
//!
//! ## Wire Strings
//!
//! Messages surfaced to RPC callers.

/// Default storage directory, created on startup if absent
pub const DEFAULT_STORAGE_DIR: &str = "./storage";

/// Default listening address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:50051";

/// Default server endpoint used by the client driver
pub const DEFAULT_SERVER_ENDPOINT: &str = "http://127.0.0.1:50051";

/// Concurrent upload + download sessions (one shared pool)
pub const MAX_TRANSFER_CONNECTIONS: usize = 10;

/// Concurrent catalog queries
pub const MAX_LIST_CONNECTIONS: usize = 100;

/// Size of each outbound download chunk (1KB)
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024;

/// Size of each chunk the client driver sends on upload (1KB)
pub const UPLOAD_CHUNK_SIZE: usize = 1024;

/// Default log level when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Acknowledgment returned by a committed upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Service name reported in logs
pub const SERVICE_NAME: &str = "memenow-storage-grpc";
