//! SQLite storage for templates, zones, sessions and zone data.
//!
//! Handlers open a short-lived connection per request with [`open`]; the
//! schema is created on first use. Finalized signatures wait in
//! `archive_outbox` until the archive worker has written their receipt.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS templates (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    property_name TEXT,
    document_url  TEXT,
    updated_at    TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS zones (
    id          TEXT NOT NULL,
    template_id TEXT NOT NULL REFERENCES templates(id) ON DELETE CASCADE,
    zone_type   TEXT NOT NULL,
    label       TEXT NOT NULL,
    role        TEXT NOT NULL,
    page_number INTEGER NOT NULL,
    x_position  REAL NOT NULL,
    y_position  REAL NOT NULL,
    width       REAL NOT NULL,
    height      REAL NOT NULL,
    is_required INTEGER NOT NULL,
    sort_order  INTEGER NOT NULL,
    field_key   TEXT,
    PRIMARY KEY (template_id, id)
);
CREATE TABLE IF NOT EXISTS sessions (
    id               TEXT PRIMARY KEY,
    template_id      TEXT NOT NULL REFERENCES templates(id),
    owner_name       TEXT NOT NULL,
    property_address TEXT NOT NULL,
    commission_rate  REAL,
    status           TEXT NOT NULL,
    signer_ip        TEXT,
    signed_at        TEXT,
    field_values     TEXT NOT NULL DEFAULT '{}',
    created_at       TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS zone_data (
    session_id TEXT NOT NULL REFERENCES sessions(id),
    zone_id    TEXT NOT NULL,
    value      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (session_id, zone_id)
);
CREATE TABLE IF NOT EXISTS archive_outbox (
    session_id TEXT PRIMARY KEY,
    record     TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// How long a write waits for concurrent readers before failing with
/// `database is locked`.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    init(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
pub fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    init(&conn).expect("schema");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn writer_waits_for_a_short_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.sqlite");
        let reader = open(&path).unwrap();
        let writer = open(&path).unwrap();

        reader.execute_batch("BEGIN").unwrap();
        let count: i64 = reader
            .query_row("SELECT count(*) FROM templates", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        let release = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            reader.execute_batch("COMMIT").unwrap();
        });

        writer
            .execute(
                "INSERT INTO templates (id, name, updated_at) VALUES ('t1', 'Mandat', '2025-03-15T10:00:00Z')",
                [],
            )
            .unwrap();
        release.join().unwrap();
    }
}
