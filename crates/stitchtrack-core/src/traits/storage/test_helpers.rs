//! `MemoryStore`, an in-memory test double for both storage traits.
//!
//! Used by core tests to exercise the phase machine and intake without a
//! database. Contention and lost compare-and-set races can be injected.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::errors::StorageError;
use crate::types::{
    BatchFilter, BatchId, BatchRecord, BatchView, CreateOutcome, NewBatch, PhaseEvent,
    PhaseState, PhaseUpdate, ReferenceEntry, ReferenceKind,
};

use super::batch_store::IBatchStore;
use super::reference_store::IReferenceStore;

#[derive(Default)]
struct Tables {
    batches: BTreeMap<i64, BatchRecord>,
    events: Vec<PhaseEvent>,
    references: HashMap<ReferenceKind, Vec<ReferenceEntry>>,
    next_batch_id: i64,
    next_event_id: i64,
    next_reference_id: i64,
}

/// In-memory implementation of `IBatchStore` and `IReferenceStore`.
///
/// Event timestamps are a logical clock (1, 2, 3, ...), not wall time.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    busy_writes: AtomicU32,
    lost_races: AtomicU32,
    write_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` writes (batch or reference) fail with `StorageError::DbBusy`.
    pub fn inject_contention(&self, n: u32) {
        self.busy_writes.store(n, Ordering::SeqCst);
    }

    /// The next `n` compare-and-set updates report a moved revision.
    pub fn inject_conflicts(&self, n: u32) {
        self.lost_races.store(n, Ordering::SeqCst);
    }

    /// Number of mutating calls that reached the store, failed ones included.
    pub fn write_count(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Force a batch into `state` without going through the machine.
    pub fn set_state(&self, batch_id: BatchId, state: PhaseState) {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(record) = tables.batches.get_mut(&batch_id.0) {
            record.state = state;
            record.revision += 1;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|_| StorageError::PoolPoisoned { role: "memory" })
    }

    fn begin_write(&self) -> Result<(), StorageError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.busy_writes) {
            return Err(StorageError::DbBusy);
        }
        Ok(())
    }
}

/// Decrement `counter` if positive; true if it was.
fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn reference_name(tables: &Tables, kind: ReferenceKind, id: i64) -> Option<String> {
    tables
        .references
        .get(&kind)?
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.name.clone())
}

impl IBatchStore for MemoryStore {
    fn find_by_barcode(&self, barcode: &str) -> Result<Option<BatchRecord>, StorageError> {
        let tables = self.lock()?;
        Ok(tables.batches.values().find(|b| b.barcode == barcode).cloned())
    }

    fn find_by_id(&self, batch_id: BatchId) -> Result<Option<BatchRecord>, StorageError> {
        Ok(self.lock()?.batches.get(&batch_id.0).cloned())
    }

    fn create(&self, batch: &NewBatch) -> Result<CreateOutcome, StorageError> {
        self.begin_write()?;
        let mut tables = self.lock()?;
        if let Some(existing) = tables.batches.values().find(|b| b.barcode == batch.barcode) {
            return Ok(CreateOutcome::AlreadyExists(existing.batch_id));
        }
        tables.next_batch_id += 1;
        let id = BatchId(tables.next_batch_id);
        tables.batches.insert(
            id.0,
            BatchRecord {
                batch_id: id,
                barcode: batch.barcode.clone(),
                brand_id: batch.brand_id,
                model_id: batch.model_id,
                size_id: batch.size_id,
                color_id: batch.color_id,
                quantity: batch.quantity,
                layers: batch.layers,
                serial: batch.serial,
                state: PhaseState::INITIAL,
                revision: 0,
            },
        );
        Ok(CreateOutcome::Created(id))
    }

    fn update_phase_and_status(&self, update: &PhaseUpdate) -> Result<bool, StorageError> {
        self.begin_write()?;
        if take_one(&self.lost_races) {
            return Ok(false);
        }
        let mut tables = self.lock()?;
        let Some(record) = tables.batches.get_mut(&update.batch_id.0) else {
            return Ok(false);
        };
        if record.revision != update.expected_revision {
            return Ok(false);
        }
        record.state = update.to;
        record.revision += 1;

        tables.next_event_id += 1;
        let id = tables.next_event_id;
        tables.events.push(PhaseEvent {
            id,
            batch_id: update.batch_id,
            trigger: update.trigger,
            from: update.from,
            to: update.to,
            created_at: id,
        });
        Ok(true)
    }

    fn list_batches(&self, filter: &BatchFilter) -> Result<Vec<BatchView>, StorageError> {
        let tables = self.lock()?;
        let views = tables
            .batches
            .values()
            .rev()
            .map(|b| BatchView {
                batch_id: b.batch_id,
                barcode: b.barcode.clone(),
                brand_name: reference_name(&tables, ReferenceKind::Brand, b.brand_id),
                model_name: reference_name(&tables, ReferenceKind::Model, b.model_id),
                size_value: reference_name(&tables, ReferenceKind::Size, b.size_id),
                color_name: reference_name(&tables, ReferenceKind::Color, b.color_id),
                quantity: b.quantity,
                layers: b.layers,
                serial: b.serial_code(),
                phase: b.state.phase,
                status: b.state.status,
            })
            .filter(|v| filter.matches(v))
            .collect();
        Ok(views)
    }

    fn delete_batch(&self, batch_id: BatchId) -> Result<bool, StorageError> {
        self.begin_write()?;
        let mut tables = self.lock()?;
        let removed = tables.batches.remove(&batch_id.0).is_some();
        tables.events.retain(|e| e.batch_id != batch_id);
        Ok(removed)
    }

    fn phase_history(&self, batch_id: BatchId) -> Result<Vec<PhaseEvent>, StorageError> {
        let tables = self.lock()?;
        Ok(tables
            .events
            .iter()
            .filter(|e| e.batch_id == batch_id)
            .cloned()
            .collect())
    }
}

impl IReferenceStore for MemoryStore {
    fn get_or_create(&self, kind: ReferenceKind, name: &str) -> Result<i64, StorageError> {
        self.begin_write()?;
        let mut tables = self.lock()?;
        if let Some(entry) = tables
            .references
            .get(&kind)
            .and_then(|entries| entries.iter().find(|e| e.name == name))
        {
            return Ok(entry.id);
        }
        tables.next_reference_id += 1;
        let id = tables.next_reference_id;
        tables.references.entry(kind).or_default().push(ReferenceEntry {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>, StorageError> {
        let tables = self.lock()?;
        let mut entries = tables.references.get(&kind).cloned().unwrap_or_default();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Phase, Status, Trigger};

    fn new_batch(barcode: &str) -> NewBatch {
        NewBatch {
            barcode: barcode.to_string(),
            brand_id: 1,
            model_id: 2,
            size_id: 3,
            color_id: 4,
            quantity: 10,
            layers: 2,
            serial: 1,
        }
    }

    #[test]
    fn create_is_idempotent_on_barcode() {
        let store = MemoryStore::new();
        let first = store.create(&new_batch("A")).unwrap();
        let second = store.create(&new_batch("A")).unwrap();
        assert!(first.is_created());
        assert_eq!(second, CreateOutcome::AlreadyExists(first.batch_id()));
    }

    #[test]
    fn stale_revision_is_rejected() {
        let store = MemoryStore::new();
        let id = store.create(&new_batch("A")).unwrap().batch_id();
        let update = PhaseUpdate {
            batch_id: id,
            expected_revision: 0,
            from: PhaseState::INITIAL,
            to: PhaseState::new(Phase::Cutting, Status::InProgress),
            trigger: Trigger::ScanIn,
        };
        assert!(store.update_phase_and_status(&update).unwrap());
        assert!(!store.update_phase_and_status(&update).unwrap());
        assert_eq!(store.phase_history(id).unwrap().len(), 1);
    }

    #[test]
    fn injected_contention_is_consumed() {
        let store = MemoryStore::new();
        store.inject_contention(1);
        assert_eq!(store.create(&new_batch("A")), Err(StorageError::DbBusy));
        assert!(store.create(&new_batch("A")).is_ok());
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn reference_ids_are_stable() {
        let store = MemoryStore::new();
        let a = store.get_or_create(ReferenceKind::Brand, "acme").unwrap();
        let b = store.get_or_create(ReferenceKind::Brand, "acme").unwrap();
        assert_eq!(a, b);
        let found = store.search_references(ReferenceKind::Brand, "CM").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn reference_upserts_count_as_writes() {
        let store = MemoryStore::new();
        store.get_or_create(ReferenceKind::Size, "xl").unwrap();
        assert_eq!(store.write_count(), 1);

        store.inject_contention(1);
        assert_eq!(store.get_or_create(ReferenceKind::Size, "xl"), Err(StorageError::DbBusy));
        assert_eq!(store.get_or_create(ReferenceKind::Size, "xl").unwrap(), 1);
        assert_eq!(store.write_count(), 3);
    }
}
