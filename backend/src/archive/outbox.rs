//! Finalized signatures waiting for their receipt.
//!
//! A row is written in the same transaction that marks the session signed,
//! so a record reaches the worker only once the signature is committed. The
//! worker deletes the row after the receipt is on disk.

use chrono::Utc;
use common::error::ArchiveError;
use common::model::session::FinalizedSignature;
use common::signing::SignatureArchive;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::ServiceError;

/// `SignatureArchive` handed to `SigningFlow::finalize` inside the finalize
/// transaction.
pub struct OutboxArchive<'a> {
    conn: &'a Connection,
}

impl<'a> OutboxArchive<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        OutboxArchive { conn }
    }
}

impl SignatureArchive for OutboxArchive<'_> {
    fn archive(&mut self, record: &FinalizedSignature) -> Result<(), ArchiveError> {
        enqueue(self.conn, record).map_err(|e| ArchiveError(e.to_string()))
    }
}

pub fn enqueue(conn: &Connection, record: &FinalizedSignature) -> Result<(), ServiceError> {
    let body = serde_json::to_string(record).map_err(|e| ServiceError::Corrupt(e.to_string()))?;
    let inserted = conn.execute(
        "INSERT INTO archive_outbox (session_id, record, created_at) VALUES (?1, ?2, ?3)",
        params![&record.session_id, body, Utc::now().to_rfc3339()],
    );
    match inserted {
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => Err(
            ServiceError::Conflict(format!("session {} is already queued for archival", record.session_id)),
        ),
        other => other.map(|_| ()).map_err(ServiceError::from),
    }
}

/// Records still waiting, oldest first.
pub fn pending(conn: &Connection) -> Result<Vec<FinalizedSignature>, ServiceError> {
    let mut stmt = conn.prepare("SELECT session_id, record FROM archive_outbox ORDER BY rowid")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    let mut records = Vec::new();
    for row in rows {
        let (session_id, body) = row?;
        let record = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Corrupt(format!("outbox record of session {}: {}", session_id, e)))?;
        records.push(record);
    }
    Ok(records)
}

pub fn is_pending(conn: &Connection, session_id: &str) -> Result<bool, ServiceError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM archive_outbox WHERE session_id = ?1",
            params![session_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn remove(conn: &Connection, session_id: &str) -> Result<(), ServiceError> {
    conn.execute("DELETE FROM archive_outbox WHERE session_id = ?1", params![session_id])?;
    Ok(())
}
