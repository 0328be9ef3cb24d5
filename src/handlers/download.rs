//! # Download Session
//!
//! Server side of a server-streaming download.
//!
//! ## Download Lifecycle
//!
//! ```text
//! Open → Streaming → Closed | Failed
//! ```
//!
//! - **Open**: the object is opened for reading. A missing object is `NotFound`,
//!   any other I/O failure is `Internal`.
//! - **Streaming**: fixed-size chunks are read and emitted in file order. Every
//!   chunk is full except possibly the last one.
//! - **Closed**: the stream ends after the last chunk, with no trailing message.
//!
//! The admission slot travels inside the stream, so it is released when the
//! stream finishes, fails, or is dropped by a disconnecting client.

use std::pin::Pin;

use futures::Stream;
use tokio::io::AsyncReadExt;
use tracing::Instrument;

use super::FileTransferService;
use crate::admission::{AdmissionSlot, Pool};
use crate::errors::{AppError, AppResult};
use crate::middleware::ValidationMiddleware;
use crate::storage::{ObjectReader, ObjectStore};

/// Lazy, finite, non-restartable sequence of outbound chunks.
pub type DownloadStream = Pin<Box<dyn Stream<Item = AppResult<Vec<u8>>> + Send>>;

/// Open read cursor over one stored object.
pub struct DownloadSession {
    filename: String,
    reader: ObjectReader,
    chunk_size: usize,
    chunks: u64,
    bytes: u64,
}

impl DownloadSession {
    /// The `Open` state.
    ///
    /// A name the flat store could never hold was never uploaded, so it is
    /// reported as `NotFound` like any other absent object.
    pub async fn open(
        store: &dyn ObjectStore,
        filename: &str,
        chunk_size: usize,
    ) -> AppResult<Self> {
        if let Err(error) = ValidationMiddleware::validate_filename(filename) {
            tracing::debug!(filename, error = %error, "unstorable name requested");
            return Err(AppError::not_found("file not found"));
        }
        let reader = store.open(filename).await?;

        Ok(Self {
            filename: filename.to_string(),
            reader,
            chunk_size: chunk_size.max(1),
            chunks: 0,
            bytes: 0,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Reads the next chunk, or `None` at end of file.
    ///
    /// Short reads from the underlying file are coalesced so that every chunk
    /// but the last is exactly `chunk_size` bytes.
    pub async fn next_chunk(&mut self) -> AppResult<Option<Vec<u8>>> {
        let mut chunk = vec![0u8; self.chunk_size];
        let mut filled = 0;

        while filled < chunk.len() {
            let read = self
                .reader
                .read(&mut chunk[filled..])
                .await
                .map_err(|e| AppError::internal("failed to read file", e))?;
            if read == 0 {
                break;
            }
            filled += read;
        }

        if filled == 0 {
            return Ok(None);
        }

        chunk.truncate(filled);
        self.chunks += 1;
        self.bytes += filled as u64;
        Ok(Some(chunk))
    }

    /// Turns the session into its outbound stream, holding `slot` until the
    /// stream terminates or is dropped.
    pub fn into_stream(self, slot: AdmissionSlot) -> DownloadStream {
        let span = tracing::Span::current();

        Box::pin(futures::stream::unfold(Some((self, slot)), move |state| {
            async move {
                let (mut session, slot) = state?;
                match session.next_chunk().await {
                    Ok(Some(chunk)) => Some((Ok(chunk), Some((session, slot)))),
                    Ok(None) => {
                        tracing::info!(
                            filename = %session.filename,
                            bytes = session.bytes,
                            chunks = session.chunks,
                            "download completed"
                        );
                        None
                    }
                    Err(error) => {
                        tracing::error!(
                            filename = %session.filename,
                            bytes = session.bytes,
                            error = %error,
                            "download failed mid-stream"
                        );
                        Some((Err(error), None))
                    }
                }
            }
            .instrument(span.clone())
        }))
    }
}

impl FileTransferService {
    /// Handles one download call.
    ///
    /// The transfer slot is taken before the object is opened. On success it is
    /// moved into the returned stream; on failure it is released before returning.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such object exists, including names the store
    ///   cannot hold (empty, `.`, `..`, or containing a separator)
    /// - `Internal` if the object cannot be opened; read failures surface as
    ///   an `Err` item on the stream
    pub async fn download(&self, filename: &str) -> AppResult<DownloadStream> {
        let slot = self.admission.acquire(Pool::Transfer).await?;
        let session =
            DownloadSession::open(self.store.as_ref(), filename, self.download_chunk_size).await?;
        Ok(session.into_stream(slot))
    }
}
