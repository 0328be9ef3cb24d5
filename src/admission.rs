//! # Admission Control
//!
//! Two independently sized pools bound how much work runs at once:
//!
//! - **Transfer**: shared by uploads *and* downloads. A burst of downloads can
//!   take every slot an upload would need, and vice versa.
//! - **List**: catalog queries only.
//!
//! A call acquires an [`AdmissionSlot`] before doing any work and holds it until
//! the call ends. The slot is returned when it is dropped, so success, a handled
//! error, a transport abort and task cancellation all release it exactly once.
//!
//! Waiters queue on a fair semaphore. There is no timeout: a waiter blocks until
//! capacity frees up or its own call is dropped.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pool {
    Transfer,
    List,
}

impl Pool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pool::Transfer => "transfer",
            Pool::List => "list",
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket held for the lifetime of one call.
#[must_use = "dropping the slot releases it immediately"]
pub struct AdmissionSlot {
    pool: Pool,
    _permit: OwnedSemaphorePermit,
}

impl AdmissionSlot {
    pub fn pool(&self) -> Pool {
        self.pool
    }

    /// Returns the slot to its pool. Never blocks.
    pub fn release(self) {}
}

impl fmt::Debug for AdmissionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionSlot")
            .field("pool", &self.pool)
            .finish()
    }
}

impl Drop for AdmissionSlot {
    fn drop(&mut self) {
        tracing::trace!(pool = %self.pool, "admission slot released");
    }
}

/// Process-wide owner of both pools. Built once at startup and shared by handle.
#[derive(Debug)]
pub struct AdmissionController {
    transfer: Arc<Semaphore>,
    list: Arc<Semaphore>,
    transfer_capacity: usize,
    list_capacity: usize,
}

impl AdmissionController {
    pub fn new(transfer_capacity: usize, list_capacity: usize) -> Self {
        Self {
            transfer: Arc::new(Semaphore::new(transfer_capacity)),
            list: Arc::new(Semaphore::new(list_capacity)),
            transfer_capacity,
            list_capacity,
        }
    }

    fn semaphore(&self, pool: Pool) -> &Arc<Semaphore> {
        match pool {
            Pool::Transfer => &self.transfer,
            Pool::List => &self.list,
        }
    }

    /// Waits until `pool` has a free slot and takes it.
    pub async fn acquire(&self, pool: Pool) -> AppResult<AdmissionSlot> {
        let semaphore = self.semaphore(pool);

        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                tracing::debug!(
                    pool = %pool,
                    capacity = self.capacity(pool),
                    "admission pool exhausted, waiting"
                );
                semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::internal("admission pool closed", e))?
            }
            Err(TryAcquireError::Closed) => {
                return Err(AppError::internal("admission pool closed", pool));
            }
        };

        Ok(AdmissionSlot {
            pool,
            _permit: permit,
        })
    }

    /// Takes a slot only if one is free right now.
    pub fn try_acquire(&self, pool: Pool) -> Option<AdmissionSlot> {
        self.semaphore(pool)
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| AdmissionSlot {
                pool,
                _permit: permit,
            })
    }

    pub fn capacity(&self, pool: Pool) -> usize {
        match pool {
            Pool::Transfer => self.transfer_capacity,
            Pool::List => self.list_capacity,
        }
    }

    pub fn available(&self, pool: Pool) -> usize {
        self.semaphore(pool).available_permits()
    }

    /// Slots currently held in `pool`.
    pub fn in_use(&self, pool: Pool) -> usize {
        self.capacity(pool) - self.available(pool)
    }
}
