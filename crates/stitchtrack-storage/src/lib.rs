//! # stitchtrack-storage
//!
//! SQLite persistence for Stitchtrack.
//! Implements `IBatchStore` and `IReferenceStore`.
//! Single write connection + read pool (WAL mode).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;

pub use engine::SqliteStore;

use rusqlite::ffi::ErrorCode;
use stitchtrack_core::errors::StorageError;

/// Map a rusqlite error onto the core storage error. Busy and locked
/// failures keep their identity so the retry loop can recognise them.
pub fn to_storage_err(e: rusqlite::Error) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(inner, _) => match inner.code {
            ErrorCode::DatabaseBusy => StorageError::DbBusy,
            ErrorCode::DatabaseLocked => StorageError::DbLocked,
            _ => StorageError::SqliteError {
                message: e.to_string(),
            },
        },
        _ => StorageError::SqliteError {
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn busy_and_locked_are_contention() {
        assert_eq!(to_storage_err(failure(rusqlite::ffi::SQLITE_BUSY)), StorageError::DbBusy);
        assert_eq!(to_storage_err(failure(rusqlite::ffi::SQLITE_LOCKED)), StorageError::DbLocked);
    }

    #[test]
    fn constraint_is_a_data_error() {
        let err = to_storage_err(failure(rusqlite::ffi::SQLITE_CONSTRAINT));
        assert!(!err.is_contention());
    }
}
