//! Catalog query: metadata-only enumeration of the store.

use super::FileTransferService;
use crate::admission::Pool;
use crate::errors::AppResult;
use crate::models::ObjectInfo;

impl FileTransferService {
    /// Lists every stored object under a slot from the listing pool.
    ///
    /// Order follows directory enumeration and is not sorted. Any enumeration
    /// or stat failure fails the whole call.
    pub async fn list(&self) -> AppResult<Vec<ObjectInfo>> {
        let _slot = self.admission.acquire(Pool::List).await?;
        let objects = self.store.list().await?;

        tracing::debug!(count = objects.len(), "catalog listed");
        Ok(objects)
    }
}
