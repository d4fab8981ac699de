//! SqliteStore: owns the connection pool and implements the storage traits.

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use stitchtrack_core::config::{StitchConfig, StoreConfig};
use stitchtrack_core::errors::StorageError;
use stitchtrack_core::traits::{IBatchStore, IReferenceStore};
use stitchtrack_core::types::{
    BatchFilter, BatchId, BatchRecord, BatchView, CreateOutcome, NewBatch, PhaseEvent,
    PhaseUpdate, ReferenceEntry, ReferenceKind,
};
use tracing::{debug, info};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{batch_ops, event_ops, reference_ops};
use crate::to_storage_err;

/// One store handle per station. Several handles may point at the same
/// database file; they coordinate through SQLite locking.
pub struct SqliteStore {
    pool: ConnectionPool,
}

impl SqliteStore {
    /// Open (or create) the database described by `config` and bring its
    /// schema up to date.
    pub fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        Self::open_path(Path::new(&config.db_path), config)
    }

    pub fn open_path(path: &Path, config: &StoreConfig) -> Result<Self, StorageError> {
        let pool = ConnectionPool::open(path, config)?;
        let store = Self::with_pool(pool)?;
        info!(path = %path.display(), "batch store opened");
        Ok(store)
    }

    pub fn from_config(config: &StitchConfig) -> Result<Self, StorageError> {
        Self::open(&config.store)
    }

    /// Private in-memory database. Separate calls do not share data.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let pool = ConnectionPool::open_in_memory(StoreConfig::default().busy_timeout_ms)?;
        Self::with_pool(pool)
    }

    fn with_pool(pool: ConnectionPool) -> Result<Self, StorageError> {
        let applied = pool.with_writer(migrations::run_migrations)?;
        debug!(applied, "migrations checked");
        Ok(Self { pool })
    }

    pub fn schema_version(&self) -> Result<u32, StorageError> {
        self.pool.with_reader(migrations::current_version)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run `f` in a `BEGIN IMMEDIATE` transaction on the writer. Rolled
    /// back if `f` fails.
    fn immediate<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        self.pool.with_writer(|conn| {
            let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
                .map_err(to_storage_err)?;
            let out = f(&tx)?;
            tx.commit().map_err(to_storage_err)?;
            Ok(out)
        })
    }
}

impl IBatchStore for SqliteStore {
    fn find_by_barcode(&self, barcode: &str) -> Result<Option<BatchRecord>, StorageError> {
        self.pool
            .with_reader(|conn| batch_ops::find_by_barcode(conn, barcode))
    }

    fn find_by_id(&self, batch_id: BatchId) -> Result<Option<BatchRecord>, StorageError> {
        self.pool.with_reader(|conn| batch_ops::find_by_id(conn, batch_id))
    }

    fn create(&self, batch: &NewBatch) -> Result<CreateOutcome, StorageError> {
        self.immediate(|conn| batch_ops::insert_batch(conn, batch))
    }

    fn update_phase_and_status(&self, update: &PhaseUpdate) -> Result<bool, StorageError> {
        self.immediate(|conn| {
            if !batch_ops::compare_and_set_state(conn, update)? {
                return Ok(false);
            }
            event_ops::insert_event(conn, update)?;
            Ok(true)
        })
    }

    fn list_batches(&self, filter: &BatchFilter) -> Result<Vec<BatchView>, StorageError> {
        let mut views = self.pool.with_reader(batch_ops::list_views)?;
        views.retain(|v| filter.matches(v));
        Ok(views)
    }

    fn delete_batch(&self, batch_id: BatchId) -> Result<bool, StorageError> {
        self.immediate(|conn| batch_ops::delete_batch(conn, batch_id))
    }

    fn phase_history(&self, batch_id: BatchId) -> Result<Vec<PhaseEvent>, StorageError> {
        self.pool
            .with_reader(|conn| event_ops::list_events(conn, batch_id))
    }
}

impl IReferenceStore for SqliteStore {
    fn get_or_create(&self, kind: ReferenceKind, name: &str) -> Result<i64, StorageError> {
        self.pool
            .with_writer(|conn| reference_ops::get_or_create(conn, kind, name))
    }

    fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>, StorageError> {
        self.pool.with_reader(|conn| reference_ops::list(conn, kind))
    }
}
