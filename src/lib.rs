//! # MemeNow Storage - gRPC File Transfer
//!
//! A bidirectional file transfer service built with Rust and tonic.
//! Clients push file content in chunks, pull it back in chunks, and list the
//! flat catalog of stored files. Objects live as plain files in one directory.
//!
//! ## Architecture
//!
//! The service follows a modular architecture with clear separation of concerns:
//! - **Server**: Binds the generated gRPC service to the handlers
//! - **Handlers**: Upload, download and catalog sessions, independent of the transport
//! - **Admission**: Two bounded pools limiting concurrent transfers and listings
//! - **Storage**: Filename-keyed object store over a local directory
//! - **Middleware**: Request validation
//! - **Models / Protocol**: Domain types and wire messages
//!
//! ## Core Features
//!
//! - Client-streaming uploads committed with a single write
//! - Server-streaming downloads in fixed 1KB chunks
//! - One shared admission budget for uploads and downloads (10), a separate one for listings (100)
//! - Slots released on every exit path, including client disconnects
//! - Structured errors with numeric status codes
//!
//! ## RPC Surface
//!
//! ```text
//! UploadFile   (stream UploadFileRequest) -> UploadFileResponse
//! DownloadFile (DownloadFileRequest)      -> stream DownloadFileResponse
//! ListFiles    (ListFilesRequest)         -> ListFilesResponse
//! ```

pub mod admission;
pub mod config;
pub mod constants;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod utils;

pub use admission::{AdmissionController, AdmissionSlot, Pool};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use handlers::FileTransferService;
pub use storage::{FsObjectStore, ObjectStore};
