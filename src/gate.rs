//! Shared admission control for the batch.
//!
//! One `AdmissionGate` is built per run and handed to both dispatch sites.
//! Files and translation units draw from separate semaphores of the same
//! capacity: an open file never waits on a unit permit while holding one of
//! its own, so nested dispatch cannot starve itself, and the number of
//! translation calls in flight stays at or below the configured worker count
//! no matter how many files are open.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{Result, SubtranError};

#[derive(Debug, Clone)]
pub struct AdmissionGate {
    files: Arc<Semaphore>,
    units: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    pub fn new(workers: usize) -> Self {
        let capacity = workers.max(1);
        Self {
            files: Arc::new(Semaphore::new(capacity)),
            units: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a slot to open one more file.
    pub async fn admit_file(&self) -> Result<OwnedSemaphorePermit> {
        Arc::clone(&self.files)
            .acquire_owned()
            .await
            .map_err(|e| SubtranError::Admission(e.to_string()))
    }

    /// Wait for a slot to run one more translation unit.
    pub async fn admit_unit(&self) -> Result<OwnedSemaphorePermit> {
        Arc::clone(&self.units)
            .acquire_owned()
            .await
            .map_err(|e| SubtranError::Admission(e.to_string()))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Refuse all further admissions. Waiters fail with an admission error.
    #[cfg(test)]
    pub(crate) fn close(&self) {
        self.files.close();
        self.units.close();
    }
}
