use tracing::{debug, info, warn};

use super::outcome::ScanOutcome;
use super::transition::{plan, Plan};
use crate::encoding;
use crate::errors::{StorageError, TrackError, TrackResult};
use crate::retry::{Attempt, RetryPolicy};
use crate::traits::IBatchStore;
use crate::types::{
    BatchAttributes, BatchFilter, BatchId, BatchRecord, BatchView, CreateOutcome, NewBatch, Phase,
    PhaseEvent, PhaseState, PhaseUpdate, ScanMode, Trigger,
};

/// Applies scans and admin edits to batches held in `S`.
///
/// Holds no state of its own besides the store handle, so several
/// machines (one per station) can share a database.
pub struct PhaseMachine<S> {
    store: S,
    retry: RetryPolicy,
}

impl<S: IBatchStore> PhaseMachine<S> {
    pub fn new(store: S, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Find a batch by scanned code. Surrounding whitespace is ignored;
    /// a code that is not a well-formed barcode is a decode error.
    pub fn lookup(&self, barcode: &str) -> TrackResult<Option<BatchRecord>> {
        let code = barcode.trim();
        encoding::decode(code)?;
        let found = self.read("find_by_barcode", || self.store.find_by_barcode(code))?;
        debug!(barcode = %code, found = found.is_some(), "batch lookup");
        Ok(found)
    }

    pub fn view(&self, barcode: &str) -> TrackResult<ScanOutcome> {
        Ok(match self.lookup(barcode)? {
            Some(record) => ScanOutcome::Viewed(record),
            None => ScanOutcome::NotFound {
                barcode: barcode.trim().to_string(),
            },
        })
    }

    /// Persist a new batch at `(Cutting, Pending)`. A barcode that is
    /// already taken is reported, not overwritten.
    pub fn register(&self, batch: &NewBatch) -> TrackResult<CreateOutcome> {
        let outcome = self
            .retry
            .run("create_batch", |_| self.store.create(batch).map(Attempt::Done))?;
        match outcome {
            CreateOutcome::Created(id) => {
                info!(batch_id = %id, barcode = %batch.barcode, "batch created")
            }
            CreateOutcome::AlreadyExists(id) => {
                warn!(batch_id = %id, barcode = %batch.barcode, "barcode already registered, skipped")
            }
        }
        Ok(outcome)
    }

    /// Encode `attrs` and register the result.
    pub fn register_attributes(
        &self,
        attrs: &BatchAttributes,
        model_id: i64,
    ) -> TrackResult<CreateOutcome> {
        let batch = NewBatch::from_attributes(attrs, model_id)?;
        self.register(&batch)
    }

    /// Apply one scanner event.
    pub fn scan(&self, barcode: &str, mode: ScanMode, target: Phase) -> TrackResult<ScanOutcome> {
        let code = barcode.trim();
        encoding::decode(code)?;

        let outcome = self.retry.run("scan", |attempt| {
            let Some(record) = self.store.find_by_barcode(code)? else {
                return Ok(Attempt::Done(ScanOutcome::NotFound {
                    barcode: code.to_string(),
                }));
            };
            let (to, trigger) = match plan(record.state, mode, target) {
                Plan::Read => return Ok(Attempt::Done(ScanOutcome::Viewed(record))),
                Plan::Terminal => return Ok(Attempt::Done(ScanOutcome::AlreadyCompleted(record))),
                Plan::Same => return Ok(Attempt::Done(ScanOutcome::Unchanged(record))),
                Plan::Move { to, trigger } => (to, trigger),
            };
            match self.apply(record, to, trigger)? {
                Some((from, batch)) => {
                    info!(
                        batch_id = %batch.batch_id,
                        barcode = %code,
                        mode = %mode,
                        from = %from,
                        to = %batch.state,
                        attempt,
                        "batch transitioned"
                    );
                    Ok(Attempt::Done(ScanOutcome::Transitioned { mode, from, batch }))
                }
                None => Ok(Attempt::Conflict),
            }
        })?;

        if outcome.is_not_found() {
            warn!(barcode = %code, mode = %mode, "scanned barcode not registered");
        }
        Ok(outcome)
    }

    /// Like [`Self::scan`], with the target phase as the operator typed it.
    /// VIEW ignores the target.
    pub fn scan_named(&self, barcode: &str, mode: ScanMode, target: &str) -> TrackResult<ScanOutcome> {
        if !mode.mutates() {
            return self.view(barcode);
        }
        let phase = target
            .parse::<Phase>()
            .map_err(|e| TrackError::InvalidTransition {
                target: target.to_string(),
                reason: e.to_string(),
            })?;
        self.scan(barcode, mode, phase)
    }

    /// Set phase and status directly, as the admin table does. Returns the
    /// updated record, or `None` if the batch does not exist.
    pub fn override_state(
        &self,
        batch_id: BatchId,
        state: PhaseState,
    ) -> TrackResult<Option<BatchRecord>> {
        if !state.is_consistent() {
            return Err(TrackError::InvalidTransition {
                target: state.to_string(),
                reason: "only Packaging can be Completed".to_string(),
            });
        }

        self.retry.run("override_state", |_| {
            let Some(record) = self.store.find_by_id(batch_id)? else {
                return Ok(Attempt::Done(None));
            };
            if record.state == state {
                return Ok(Attempt::Done(Some(record)));
            }
            match self.apply(record, state, Trigger::Override)? {
                Some((from, batch)) => {
                    info!(batch_id = %batch_id, from = %from, to = %state, "batch state overridden");
                    Ok(Attempt::Done(Some(batch)))
                }
                None => Ok(Attempt::Conflict),
            }
        })
    }

    pub fn list(&self, filter: &BatchFilter) -> TrackResult<Vec<BatchView>> {
        self.read("list_batches", || self.store.list_batches(filter))
    }

    /// Administrative delete. Returns `false` if the batch was already gone.
    pub fn delete(&self, batch_id: BatchId) -> TrackResult<bool> {
        let removed = self
            .retry
            .run("delete_batch", |_| self.store.delete_batch(batch_id).map(Attempt::Done))?;
        if removed {
            info!(batch_id = %batch_id, "batch deleted");
        }
        Ok(removed)
    }

    pub fn history(&self, batch_id: BatchId) -> TrackResult<Vec<PhaseEvent>> {
        self.read("phase_history", || self.store.phase_history(batch_id))
    }

    /// One compare-and-set. `None` means another writer got there first.
    fn apply(
        &self,
        record: BatchRecord,
        to: PhaseState,
        trigger: Trigger,
    ) -> Result<Option<(PhaseState, BatchRecord)>, StorageError> {
        let update = PhaseUpdate {
            batch_id: record.batch_id,
            expected_revision: record.revision,
            from: record.state,
            to,
            trigger,
        };
        if !self.store.update_phase_and_status(&update)? {
            return Ok(None);
        }
        let from = record.state;
        let batch = BatchRecord {
            state: to,
            revision: record.revision + 1,
            ..record
        };
        Ok(Some((from, batch)))
    }

    fn read<T>(
        &self,
        operation: &'static str,
        mut f: impl FnMut() -> Result<T, StorageError>,
    ) -> TrackResult<T> {
        self.retry.run(operation, |_| f().map(Attempt::Done))
    }
}
