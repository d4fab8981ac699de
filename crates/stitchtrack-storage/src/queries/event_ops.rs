//! Raw SQL operations for the phase_events audit table.

use rusqlite::{params, Connection, Row};
use stitchtrack_core::errors::StorageError;
use stitchtrack_core::types::{BatchId, PhaseEvent, PhaseUpdate, Trigger};

use super::batch_ops::decode_state;
use crate::to_storage_err;

/// Append one event. Returns the assigned event_id.
pub fn insert_event(conn: &Connection, update: &PhaseUpdate) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO phase_events
            (batch_id, mode, from_phase, from_status, to_phase, to_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            update.batch_id.0,
            update.trigger.as_str(),
            update.from.phase.id(),
            update.from.status.as_str(),
            update.to.phase.id(),
            update.to.status.as_str(),
        ],
    )
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

struct RawEvent {
    event_id: i64,
    batch_id: i64,
    mode: String,
    from_phase: i64,
    from_status: String,
    to_phase: i64,
    to_status: String,
    created_at: i64,
}

impl RawEvent {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            event_id: row.get(0)?,
            batch_id: row.get(1)?,
            mode: row.get(2)?,
            from_phase: row.get(3)?,
            from_status: row.get(4)?,
            to_phase: row.get(5)?,
            to_status: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_event(self) -> Result<PhaseEvent, StorageError> {
        let trigger = Trigger::parse(&self.mode).ok_or_else(|| StorageError::CorruptRow {
            table: "phase_events",
            message: format!("unknown mode {:?}", self.mode),
        })?;
        Ok(PhaseEvent {
            id: self.event_id,
            batch_id: BatchId(self.batch_id),
            trigger,
            from: decode_state("phase_events", self.from_phase, &self.from_status)?,
            to: decode_state("phase_events", self.to_phase, &self.to_status)?,
            created_at: self.created_at,
        })
    }
}

/// Events for one batch, oldest first.
pub fn list_events(conn: &Connection, batch_id: BatchId) -> Result<Vec<PhaseEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT event_id, batch_id, mode, from_phase, from_status, to_phase, to_status, created_at
             FROM phase_events WHERE batch_id = ?1 ORDER BY event_id",
        )
        .map_err(to_storage_err)?;
    let raw = stmt
        .query_map(params![batch_id.0], RawEvent::read)
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)?;
    raw.into_iter().map(RawEvent::into_event).collect()
}
