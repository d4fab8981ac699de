//! Storage-layer errors for batch and reference persistence.

use super::error_code::{self, TrackErrorCode};

/// Errors that can occur in the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Database busy (another station is writing)")]
    DbBusy,

    #[error("Database table locked")]
    DbLocked,

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("{role} connection lock poisoned")]
    PoolPoisoned { role: &'static str },
}

impl StorageError {
    /// Lock and serialization conflicts. These are the only storage
    /// failures the retry loop is allowed to retry.
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::DbBusy | Self::DbLocked)
    }
}

impl TrackErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::DbLocked => error_code::DB_LOCKED,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptRow { .. } => error_code::CORRUPT_ROW,
            _ => error_code::STORAGE_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_busy_and_locked_are_contention() {
        assert!(StorageError::DbBusy.is_contention());
        assert!(StorageError::DbLocked.is_contention());
        assert!(!StorageError::SqliteError {
            message: "constraint failed".into()
        }
        .is_contention());
        assert!(!StorageError::PoolPoisoned { role: "writer" }.is_contention());
    }
}
