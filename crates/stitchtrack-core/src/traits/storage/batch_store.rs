//! `IBatchStore` trait: batch rows and their phase audit trail.

use std::sync::Arc;

use crate::errors::StorageError;
use crate::types::{
    BatchFilter, BatchId, BatchRecord, BatchView, CreateOutcome, NewBatch, PhaseEvent, PhaseUpdate,
};

/// Batch persistence used by the phase machine.
///
/// Every call is a short unit of work. Implementations must make
/// `update_phase_and_status` a compare-and-set on the row revision.
pub trait IBatchStore: Send + Sync {
    fn find_by_barcode(&self, barcode: &str) -> Result<Option<BatchRecord>, StorageError>;

    fn find_by_id(&self, batch_id: BatchId) -> Result<Option<BatchRecord>, StorageError>;

    /// Insert at `(Cutting, Pending)`. A taken barcode yields
    /// `CreateOutcome::AlreadyExists` and leaves the existing row alone.
    fn create(&self, batch: &NewBatch) -> Result<CreateOutcome, StorageError>;

    /// Apply `update.to` if the row is still at `update.expected_revision`,
    /// bump the revision and append a phase event, atomically.
    /// Returns `false` when the revision moved or the row is gone.
    fn update_phase_and_status(&self, update: &PhaseUpdate) -> Result<bool, StorageError>;

    /// Batches joined with their reference names, newest first.
    fn list_batches(&self, filter: &BatchFilter) -> Result<Vec<BatchView>, StorageError>;

    /// Returns `false` if no such batch existed.
    fn delete_batch(&self, batch_id: BatchId) -> Result<bool, StorageError>;

    /// Phase events for a batch, oldest first.
    fn phase_history(&self, batch_id: BatchId) -> Result<Vec<PhaseEvent>, StorageError>;
}

// ─── Arc blanket impl ───────────────────────────────────────────────

impl<T: IBatchStore + ?Sized> IBatchStore for Arc<T> {
    fn find_by_barcode(&self, barcode: &str) -> Result<Option<BatchRecord>, StorageError> {
        (**self).find_by_barcode(barcode)
    }
    fn find_by_id(&self, batch_id: BatchId) -> Result<Option<BatchRecord>, StorageError> {
        (**self).find_by_id(batch_id)
    }
    fn create(&self, batch: &NewBatch) -> Result<CreateOutcome, StorageError> {
        (**self).create(batch)
    }
    fn update_phase_and_status(&self, update: &PhaseUpdate) -> Result<bool, StorageError> {
        (**self).update_phase_and_status(update)
    }
    fn list_batches(&self, filter: &BatchFilter) -> Result<Vec<BatchView>, StorageError> {
        (**self).list_batches(filter)
    }
    fn delete_batch(&self, batch_id: BatchId) -> Result<bool, StorageError> {
        (**self).delete_batch(batch_id)
    }
    fn phase_history(&self, batch_id: BatchId) -> Result<Vec<PhaseEvent>, StorageError> {
        (**self).phase_history(batch_id)
    }
}
