//! SQLite PRAGMA configuration for store connections.
//! Must be called on every connection immediately after opening.

use rusqlite::Connection;
use stitchtrack_core::errors::StorageError;

use crate::to_storage_err;

/// Configure a read-write connection.
///
/// - WAL so scanning stations can read while another one writes
/// - busy_timeout bounds how long a statement waits on a lock
/// - foreign keys on, since batches reference the lookup tables
pub fn configure_connection(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
        "
    ))
    .map_err(to_storage_err)
}

/// Same as [`configure_connection`] plus `query_only`.
pub fn configure_readonly_connection(
    conn: &Connection,
    busy_timeout_ms: u64,
) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
        PRAGMA query_only = ON;
        "
    ))
    .map_err(to_storage_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_busy_timeout_from_config() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, 1234).unwrap();
        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 1234);
    }

    #[test]
    fn enables_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        configure_connection(&conn, 5000).unwrap();
        let fk: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn readonly_connection_refuses_writes() {
        let conn = Connection::open_in_memory().unwrap();
        configure_readonly_connection(&conn, 5000).unwrap();
        assert!(conn.execute_batch("CREATE TABLE t (x INTEGER)").is_err());
    }
}
