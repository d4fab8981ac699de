//! Migration runner: forward-only, one `BEGIN IMMEDIATE` transaction per
//! version, tracked with `PRAGMA user_version`.

mod v001_initial_schema;

use rusqlite::Connection;
use stitchtrack_core::errors::StorageError;
use tracing::{debug, info, warn};

use crate::to_storage_err;

pub const LATEST_VERSION: u32 = 1;

type MigrationFn = fn(&Connection) -> Result<(), StorageError>;

const MIGRATIONS: [(u32, &str, MigrationFn); 1] =
    [(1, "initial_schema", v001_initial_schema::migrate)];

pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_storage_err)
}

/// Run pending migrations. Returns how many were applied.
///
/// Safe to call from several processes at once: the version is re-read
/// after the write lock is taken, so each migration runs exactly once.
pub fn run_migrations(conn: &Connection) -> Result<u32, StorageError> {
    let current = current_version(conn)?;
    if current >= LATEST_VERSION {
        debug!("database schema is up to date (v{current})");
        return Ok(0);
    }
    info!("running migrations: v{current} → v{LATEST_VERSION}");

    let mut applied = 0;
    for &(version, name, migrate_fn) in &MIGRATIONS {
        if version <= current {
            continue;
        }

        conn.execute_batch("BEGIN IMMEDIATE").map_err(to_storage_err)?;
        let result = current_version(conn).and_then(|now| {
            if now >= version {
                return Ok(false);
            }
            migrate_fn(conn)?;
            conn.pragma_update(None, "user_version", version)
                .map_err(to_storage_err)?;
            Ok(true)
        });

        match result {
            Ok(ran) => {
                conn.execute_batch("COMMIT").map_err(to_storage_err)?;
                if ran {
                    info!("applied migration v{version:03}: {name}");
                    applied += 1;
                } else {
                    debug!("migration v{version:03} already applied by another connection");
                }
            }
            Err(e) => {
                warn!("migration v{version:03} failed: {e}, rolling back");
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StorageError::MigrationFailed {
                    version,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(applied)
}
