//! # Transfer Handlers
//!
//! Transport-agnostic core of the service. [`FileTransferService`] owns the
//! object store and the admission controller and exposes the three operations:
//!
//! - **Upload** (`upload`): accumulate a chunk stream and commit it as one object
//! - **Download** (`download`): stream a stored object back in fixed-size chunks
//! - **List** (`list`): enumerate stored objects with their metadata
//!
//! ## Request Flow
//!
//! ```text
//! RPC call → acquire admission slot → session against the store → release slot
//! ```
//!
//! The slot is held by value for the whole call, so it is returned on every exit
//! path, including a client disconnecting mid-stream.
//!
//! Inbound chunks arrive as a `Stream` of `AppResult<UploadChunk>`, outbound
//! chunks leave as a [`DownloadStream`]; the RPC layer in `server` adapts tonic
//! streams to these.

use std::sync::Arc;

use crate::admission::AdmissionController;
use crate::config::Config;
use crate::storage::ObjectStore;

pub mod download;
pub mod list;
pub mod upload;

pub use download::{DownloadSession, DownloadStream};
pub use upload::{UploadOutcome, UploadSession};

/// Shared state every call handler runs against.
///
/// Cloning is cheap; clones share the same store and admission pools.
#[derive(Clone)]
pub struct FileTransferService {
    store: Arc<dyn ObjectStore>,
    admission: Arc<AdmissionController>,
    download_chunk_size: usize,
}

impl FileTransferService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        admission: Arc<AdmissionController>,
        download_chunk_size: usize,
    ) -> Self {
        Self {
            store,
            admission,
            download_chunk_size,
        }
    }

    /// Builds the service with a fresh admission controller sized from `config`.
    pub fn from_config(store: Arc<dyn ObjectStore>, config: &Config) -> Self {
        let admission = AdmissionController::new(
            config.max_transfer_connections,
            config.max_list_connections,
        );
        Self::new(store, Arc::new(admission), config.download_chunk_size)
    }

    pub fn admission(&self) -> &Arc<AdmissionController> {
        &self.admission
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::storage::FsObjectStore;
    use tempfile::TempDir;

    /// Service over a fresh temporary directory with reference pool sizes.
    pub async fn fs_service() -> (TempDir, FileTransferService) {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path()).await.unwrap();
        let service = FileTransferService::from_config(Arc::new(store), &Config::default());
        (dir, service)
    }
}
