//! Raw SQL operations for the batches table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use stitchtrack_core::errors::StorageError;
use stitchtrack_core::types::{
    BatchId, BatchRecord, BatchView, CreateOutcome, NewBatch, Phase, PhaseState, PhaseUpdate,
    Status,
};

use crate::to_storage_err;

const BATCH_COLUMNS: &str = "batch_id, barcode, brand_id, model_id, size_id, color_id, \
     quantity, layers, serial, current_phase, status, revision";

/// Parse a stored phase id / status label pair.
pub(crate) fn decode_state(
    table: &'static str,
    phase_id: i64,
    status: &str,
) -> Result<PhaseState, StorageError> {
    let phase = Phase::from_id(phase_id).ok_or_else(|| StorageError::CorruptRow {
        table,
        message: format!("unknown phase id {phase_id}"),
    })?;
    let status = status.parse::<Status>().map_err(|e| StorageError::CorruptRow {
        table,
        message: e.to_string(),
    })?;
    Ok(PhaseState::new(phase, status))
}

fn narrow<T: TryFrom<i64>>(column: &str, value: i64) -> Result<T, StorageError> {
    T::try_from(value).map_err(|_| StorageError::CorruptRow {
        table: "batches",
        message: format!("{column} out of range: {value}"),
    })
}

fn parse_serial(serial: &str) -> Result<u16, StorageError> {
    serial.parse().map_err(|_| StorageError::CorruptRow {
        table: "batches",
        message: format!("serial {serial:?} is not numeric"),
    })
}

struct RawBatch {
    batch_id: i64,
    barcode: String,
    brand_id: i64,
    model_id: i64,
    size_id: i64,
    color_id: i64,
    quantity: i64,
    layers: i64,
    serial: String,
    phase: i64,
    status: String,
    revision: i64,
}

impl RawBatch {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            batch_id: row.get(0)?,
            barcode: row.get(1)?,
            brand_id: row.get(2)?,
            model_id: row.get(3)?,
            size_id: row.get(4)?,
            color_id: row.get(5)?,
            quantity: row.get(6)?,
            layers: row.get(7)?,
            serial: row.get(8)?,
            phase: row.get(9)?,
            status: row.get(10)?,
            revision: row.get(11)?,
        })
    }

    fn into_record(self) -> Result<BatchRecord, StorageError> {
        Ok(BatchRecord {
            batch_id: BatchId(self.batch_id),
            state: decode_state("batches", self.phase, &self.status)?,
            quantity: narrow("quantity", self.quantity)?,
            layers: narrow("layers", self.layers)?,
            serial: parse_serial(&self.serial)?,
            barcode: self.barcode,
            brand_id: self.brand_id,
            model_id: self.model_id,
            size_id: self.size_id,
            color_id: self.color_id,
            revision: self.revision,
        })
    }
}

fn find_one(
    conn: &Connection,
    filter: &str,
    param: &dyn rusqlite::ToSql,
) -> Result<Option<BatchRecord>, StorageError> {
    conn.prepare_cached(&format!("SELECT {BATCH_COLUMNS} FROM batches WHERE {filter} = ?1"))
        .and_then(|mut stmt| stmt.query_row(&[param], RawBatch::read).optional())
        .map_err(to_storage_err)?
        .map(RawBatch::into_record)
        .transpose()
}

pub fn find_by_barcode(conn: &Connection, barcode: &str) -> Result<Option<BatchRecord>, StorageError> {
    find_one(conn, "barcode", &barcode)
}

pub fn find_by_id(conn: &Connection, batch_id: BatchId) -> Result<Option<BatchRecord>, StorageError> {
    find_one(conn, "batch_id", &batch_id.0)
}

/// Insert at `(Cutting, Pending)`; a taken barcode is left alone.
/// Call inside a write transaction so the fallback lookup sees the
/// conflicting row.
pub fn insert_batch(conn: &Connection, batch: &NewBatch) -> Result<CreateOutcome, StorageError> {
    let initial = PhaseState::INITIAL;
    let inserted = conn
        .execute(
            "INSERT INTO batches
                (barcode, brand_id, model_id, size_id, color_id, quantity, layers, serial,
                 current_phase, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(barcode) DO NOTHING",
            params![
                batch.barcode,
                batch.brand_id,
                batch.model_id,
                batch.size_id,
                batch.color_id,
                batch.quantity,
                batch.layers,
                format!("{:03}", batch.serial),
                initial.phase.id(),
                initial.status.as_str(),
            ],
        )
        .map_err(to_storage_err)?;
    if inserted == 1 {
        return Ok(CreateOutcome::Created(BatchId(conn.last_insert_rowid())));
    }

    let existing: i64 = conn
        .query_row(
            "SELECT batch_id FROM batches WHERE barcode = ?1",
            params![batch.barcode],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;
    Ok(CreateOutcome::AlreadyExists(BatchId(existing)))
}

/// Compare-and-set on `revision`. Returns `false` if the row moved on
/// (or is gone). Does not write the audit event.
pub fn compare_and_set_state(conn: &Connection, update: &PhaseUpdate) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE batches
             SET current_phase = ?1, status = ?2, revision = revision + 1, updated_at = unixepoch()
             WHERE batch_id = ?3 AND revision = ?4",
            params![
                update.to.phase.id(),
                update.to.status.as_str(),
                update.batch_id.0,
                update.expected_revision,
            ],
        )
        .map_err(to_storage_err)?;
    Ok(changed == 1)
}

/// Every batch joined with its reference names, newest first.
pub fn list_views(conn: &Connection) -> Result<Vec<BatchView>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT b.batch_id, b.barcode, br.brand_name, m.model_name, s.size_value,
                    c.color_name, b.quantity, b.layers, b.serial, b.current_phase, b.status
             FROM batches b
             LEFT JOIN brands br ON br.brand_id = b.brand_id
             LEFT JOIN models m  ON m.model_id  = b.model_id
             LEFT JOIN sizes s   ON s.size_id   = b.size_id
             LEFT JOIN colors c  ON c.color_id  = b.color_id
             ORDER BY b.batch_id DESC",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, i64>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, i64>(9)?,
                row.get::<_, String>(10)?,
            ))
        })
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)?;

    rows.into_iter()
        .map(
            |(id, barcode, brand, model, size, color, quantity, layers, serial, phase, status)|
             -> Result<BatchView, StorageError> {
                let state = decode_state("batches", phase, &status)?;
                Ok(BatchView {
                    batch_id: BatchId(id),
                    barcode,
                    brand_name: brand,
                    model_name: model,
                    size_value: size,
                    color_name: color,
                    quantity: narrow("quantity", quantity)?,
                    layers: narrow("layers", layers)?,
                    serial,
                    phase: state.phase,
                    status: state.status,
                })
            },
        )
        .collect()
}

/// Events go with the batch (`ON DELETE CASCADE`).
pub fn delete_batch(conn: &Connection, batch_id: BatchId) -> Result<bool, StorageError> {
    let deleted = conn
        .execute("DELETE FROM batches WHERE batch_id = ?1", params![batch_id.0])
        .map_err(to_storage_err)?;
    Ok(deleted == 1)
}
