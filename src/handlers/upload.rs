//! # Upload Session
//!
//! Server side of a client-streaming upload.
//!
//! ## Upload Lifecycle
//!
//! ```text
//! Receiving → Finalizing → Committed | Rejected | Failed
//! ```
//!
//! - **Receiving**: chunks are appended in arrival order. Each chunk's filename
//!   replaces the previous one, so the last filename seen is the one committed.
//! - **Finalizing**: with no usable filename the session is rejected; otherwise
//!   the whole buffer is written to the store in a single call.
//! - **Committed**: the caller gets a human-readable acknowledgment.
//!
//! A transport error while receiving ends the session immediately as `Failed`;
//! nothing is written in that case.

use futures::{Stream, StreamExt};

use super::FileTransferService;
use crate::admission::Pool;
use crate::constants::UPLOAD_SUCCESS_MESSAGE;
use crate::errors::{AppError, AppResult};
use crate::middleware::ValidationMiddleware;
use crate::models::{UploadChunk, UploadReceipt};
use crate::storage::ObjectStore;

/// Accumulating state of one upload call (the `Receiving` state).
#[derive(Debug, Default)]
pub struct UploadSession {
    filename: String,
    buffer: Vec<u8>,
    chunks: u64,
}

/// Terminal state of an upload session.
#[derive(Debug)]
pub enum UploadOutcome {
    Committed(UploadReceipt),
    /// The session never carried a usable filename. Nothing was written.
    Rejected(AppError),
    /// The store write failed.
    Failed(AppError),
}

impl UploadOutcome {
    pub fn into_result(self) -> AppResult<UploadReceipt> {
        match self {
            UploadOutcome::Committed(receipt) => Ok(receipt),
            UploadOutcome::Rejected(error) | UploadOutcome::Failed(error) => Err(error),
        }
    }
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one chunk and adopts its filename.
    pub fn accept(&mut self, chunk: UploadChunk) {
        if !self.filename.is_empty() && chunk.filename != self.filename {
            tracing::debug!(
                previous = %self.filename,
                current = %chunk.filename,
                "upload target changed mid-stream"
            );
        }
        self.filename = chunk.filename;
        self.buffer.extend_from_slice(&chunk.content);
        self.chunks += 1;
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Runs `Finalizing` and returns the terminal state.
    pub async fn finalize(self, store: &dyn ObjectStore) -> UploadOutcome {
        if let Err(error) = ValidationMiddleware::validate_filename(&self.filename) {
            return UploadOutcome::Rejected(error);
        }

        if let Err(error) = store.put(&self.filename, &self.buffer).await {
            return UploadOutcome::Failed(error);
        }

        tracing::info!(
            filename = %self.filename,
            bytes = self.buffer.len(),
            chunks = self.chunks,
            "upload committed"
        );

        UploadOutcome::Committed(UploadReceipt {
            bytes: self.buffer.len() as u64,
            chunks: self.chunks,
            filename: self.filename,
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        })
    }
}

impl FileTransferService {
    /// Handles one upload call.
    ///
    /// Holds a transfer slot from before the first chunk is read until the
    /// session reaches a terminal state.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the last chunk carried no valid filename
    /// - `Transport` if the inbound stream failed
    /// - `Internal` if the store write failed
    pub async fn upload<S>(&self, chunks: S) -> AppResult<UploadReceipt>
    where
        S: Stream<Item = AppResult<UploadChunk>> + Send,
    {
        let _slot = self.admission.acquire(Pool::Transfer).await?;

        let mut chunks = std::pin::pin!(chunks);
        let mut session = UploadSession::new();
        while let Some(chunk) = chunks.next().await {
            session.accept(chunk?);
        }

        session.finalize(self.store.as_ref()).await.into_result()
    }
}
