//! v001 -- Initial schema creation.
//!
//! Creates the three core tables: `queue`, `snapshot`, and `meta`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Offline submission queue
-- ----------------------------------------------------------------
-- FIFO order is the AUTOINCREMENT rowid: rows are replayed in
-- ascending id and removed only once the remote write succeeds.
CREATE TABLE IF NOT EXISTS queue (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    record    TEXT NOT NULL,               -- VisitRecord JSON
    queued_at TEXT NOT NULL                -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Cached remote snapshot (offline fallback)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS snapshot (
    id         INTEGER PRIMARY KEY CHECK (id = 1),
    buildings  TEXT NOT NULL,              -- JSON array of Building
    logs       TEXT NOT NULL,              -- JSON array of VisitRecord
    fetched_at TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Device metadata
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
