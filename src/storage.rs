//! # Object Store
//!
//! Flat, filename-keyed persistence over one directory of the local filesystem.
//! Every stored object is a regular file named exactly by its filename; there
//! are no subdirectories and no sidecar metadata files.
//!
//! ## Write Semantics
//!
//! `put` writes the whole object with a single call, so an object is either its
//! previous version or fully replaced. Concurrent writers to one name are not
//! serialized: the last write to land wins.
//!
//! ## Metadata
//!
//! Timestamps are read from filesystem metadata at listing time. Nothing is
//! tracked independently of the directory itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncRead;

use crate::errors::{AppError, AppResult};
use crate::models::ObjectInfo;
use crate::utils::to_utc;

/// Read cursor over one stored object's bytes.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Persistence contract the transfer handlers run against.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates or replaces `name` with `content` in one write.
    async fn put(&self, name: &str, content: &[u8]) -> AppResult<()>;

    /// Opens `name` for reading.
    ///
    /// Returns `AppError::NotFound` if no such object exists.
    async fn open(&self, name: &str) -> AppResult<ObjectReader>;

    /// Enumerates every entry, in directory order.
    ///
    /// Any failure aborts the whole listing; partial results are never returned.
    async fn list(&self) -> AppResult<Vec<ObjectInfo>>;
}

/// Object store backed by a local directory.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Opens the store at `root`, creating the directory if it does not exist.
    pub async fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::internal("failed to create storage directory", e))?;

        tracing::debug!(root = %root.display(), "object store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, name: &str, content: &[u8]) -> AppResult<()> {
        fs::write(self.object_path(name), content)
            .await
            .map_err(|e| AppError::internal("failed to save file", e))
    }

    async fn open(&self, name: &str) -> AppResult<ObjectReader> {
        match fs::File::open(self.object_path(name)).await {
            Ok(file) => Ok(Box::new(file) as ObjectReader),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::not_found("file not found")),
            Err(e) => Err(AppError::internal("failed to open file", e)),
        }
    }

    async fn list(&self) -> AppResult<Vec<ObjectInfo>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| AppError::internal("failed to list files", e))?;

        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::internal("failed to list files", e))?
        {
            let modified = entry
                .metadata()
                .await
                .and_then(|metadata| metadata.modified())
                .map_err(|e| AppError::internal("failed to get file info", e))?;

            objects.push(ObjectInfo::new(
                entry.file_name().to_string_lossy().into_owned(),
                to_utc(modified),
            ));
        }

        Ok(objects)
    }
}
