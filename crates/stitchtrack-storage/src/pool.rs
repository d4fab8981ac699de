//! ConnectionPool: one writer + a read pool with round-robin selection.
//!
//! The only place in this crate that holds `Mutex<Connection>`.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use stitchtrack_core::config::StoreConfig;
use stitchtrack_core::errors::StorageError;
use tracing::debug;

use crate::pragmas::{configure_connection, configure_readonly_connection};
use crate::to_storage_err;

const DEFAULT_READ_POOL_SIZE: usize = 2;

/// Connections to one database file: 1 writer + N read-only readers.
pub struct ConnectionPool {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_index: AtomicUsize,
}

impl ConnectionPool {
    /// Open a file-backed pool. The writer is opened (and the file
    /// created) before any reader.
    pub fn open(path: &Path, config: &StoreConfig) -> Result<Self, StorageError> {
        let pool_size = if config.read_pool_size == 0 {
            DEFAULT_READ_POOL_SIZE
        } else {
            config.read_pool_size
        };

        let writer = Connection::open(path).map_err(to_storage_err)?;
        configure_connection(&writer, config.busy_timeout_ms)?;

        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(to_storage_err)?;
            configure_readonly_connection(&reader, config.busy_timeout_ms)?;
            readers.push(Mutex::new(reader));
        }
        debug!(path = %path.display(), readers = pool_size, "connection pool opened");

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            read_index: AtomicUsize::new(0),
        })
    }

    /// Single in-memory connection; reads go through the writer.
    pub fn open_in_memory(busy_timeout_ms: u64) -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(to_storage_err)?;
        configure_connection(&writer, busy_timeout_ms)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            read_index: AtomicUsize::new(0),
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self
            .writer
            .lock()
            .map_err(|_| StorageError::PoolPoisoned { role: "writer" })?;
        f(&conn)
    }

    /// Falls back to the writer when there are no readers (in-memory mode).
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }
        let index = self.read_index.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index]
            .lock()
            .map_err(|_| StorageError::PoolPoisoned { role: "reader" })?;
        f(&conn)
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    pub fn is_wal_mode(&self) -> Result<bool, StorageError> {
        self.with_writer(|conn| {
            let mode: String = conn
                .pragma_query_value(None, "journal_mode", |row| row.get(0))
                .map_err(to_storage_err)?;
            Ok(mode.eq_ignore_ascii_case("wal"))
        })
    }
}
