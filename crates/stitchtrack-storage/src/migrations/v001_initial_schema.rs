//! v001: lookup tables, production phases, batches, phase events.

use rusqlite::Connection;
use stitchtrack_core::errors::StorageError;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS brands (
            brand_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            brand_name TEXT NOT NULL UNIQUE
        ) STRICT;

        CREATE TABLE IF NOT EXISTS models (
            model_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            model_name TEXT NOT NULL UNIQUE
        ) STRICT;

        CREATE TABLE IF NOT EXISTS sizes (
            size_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            size_value TEXT NOT NULL UNIQUE
        ) STRICT;

        CREATE TABLE IF NOT EXISTS colors (
            color_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            color_name TEXT NOT NULL UNIQUE
        ) STRICT;

        CREATE TABLE IF NOT EXISTS production_phases (
            phase_id   INTEGER PRIMARY KEY,
            phase_name TEXT NOT NULL UNIQUE
        ) STRICT;

        INSERT OR IGNORE INTO production_phases (phase_id, phase_name)
        VALUES (1, 'Cutting'), (2, 'Sewing'), (3, 'Packaging');

        CREATE TABLE IF NOT EXISTS batches (
            batch_id      INTEGER PRIMARY KEY AUTOINCREMENT,
            barcode       TEXT NOT NULL UNIQUE,
            brand_id      INTEGER NOT NULL REFERENCES brands(brand_id),
            model_id      INTEGER NOT NULL REFERENCES models(model_id),
            size_id       INTEGER NOT NULL REFERENCES sizes(size_id),
            color_id      INTEGER NOT NULL REFERENCES colors(color_id),
            quantity      INTEGER NOT NULL CHECK (quantity BETWEEN 1 AND 999),
            layers        INTEGER NOT NULL CHECK (layers BETWEEN 1 AND 99),
            serial        TEXT NOT NULL CHECK (length(serial) = 3),
            current_phase INTEGER NOT NULL DEFAULT 1
                          REFERENCES production_phases(phase_id),
            status        TEXT NOT NULL DEFAULT 'Pending'
                          CHECK (status IN ('Pending', 'In Progress', 'Completed')),
            revision      INTEGER NOT NULL DEFAULT 0,
            created_at    INTEGER NOT NULL DEFAULT (unixepoch()),
            updated_at    INTEGER NOT NULL DEFAULT (unixepoch()),
            CHECK (status <> 'Completed' OR current_phase = 3)
        ) STRICT;

        CREATE TABLE IF NOT EXISTS phase_events (
            event_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_id    INTEGER NOT NULL REFERENCES batches(batch_id) ON DELETE CASCADE,
            mode        TEXT NOT NULL CHECK (mode IN ('IN', 'OUT', 'OVERRIDE')),
            from_phase  INTEGER NOT NULL,
            from_status TEXT NOT NULL,
            to_phase    INTEGER NOT NULL,
            to_status   TEXT NOT NULL,
            created_at  INTEGER NOT NULL DEFAULT (unixepoch())
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_phase_events_batch
            ON phase_events(batch_id, event_id);
        ",
    )
    .map_err(to_storage_err)
}
