//! Raw SQL operations for the brand / model / size / color tables.

use rusqlite::{params, Connection};
use stitchtrack_core::errors::StorageError;
use stitchtrack_core::types::{ReferenceEntry, ReferenceKind};

use crate::to_storage_err;

/// Insert `name` unless present; either way return its id. The no-op
/// update makes `RETURNING` yield the existing row on conflict.
pub fn get_or_create(conn: &Connection, kind: ReferenceKind, name: &str) -> Result<i64, StorageError> {
    let (table, id, col) = (kind.table(), kind.id_column(), kind.name_column());
    conn.query_row(
        &format!(
            "INSERT INTO {table} ({col}) VALUES (?1)
             ON CONFLICT({col}) DO UPDATE SET {col} = excluded.{col}
             RETURNING {id}"
        ),
        params![name],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

pub fn list(conn: &Connection, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>, StorageError> {
    let (table, id, col) = (kind.table(), kind.id_column(), kind.name_column());
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {id}, {col} FROM {table} ORDER BY {col}"))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ReferenceEntry {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}
