//! Tracks the archival of finalized signatures.
//!
//! - `ArchiveState`: clonable, shared as `web::Data` in `main.rs`. Holds the
//!   outcome of every receipt written since start-up and the sender side of
//!   the wake-up channel.
//! - `start_archive_worker`: the long-running task draining the outbox.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::jobs::ArchiveStatus;
use common::model::session::FinalizedSignature;
use log::{error, info};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

use super::outbox;
use crate::db;
use crate::error::ServiceError;

/// Capacity of the wake-up channel.
pub const ARCHIVE_QUEUE_SIZE: usize = 100;

#[derive(Clone)]
pub struct ArchiveState {
    /// Session id to receipt outcome. Written only by the worker.
    pub statuses: Arc<RwLock<HashMap<String, ArchiveStatus>>>,
    pub tx: mpsc::Sender<String>,
}

impl ArchiveState {
    pub fn new() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(ARCHIVE_QUEUE_SIZE);
        let state = ArchiveState {
            statuses: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Wakes the worker once an outbox row is committed.
    pub fn notify(&self, session_id: &str) {
        match self.tx.try_send(session_id.to_string()) {
            // A full channel already holds a wake-up that drains every row
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => {
                error!("archive worker stopped; session {} stays in the outbox", session_id)
            }
        }
    }
}

/// Drains the outbox at start-up, then again on every wake-up, until every
/// sender is dropped.
///
/// Each record becomes `{archive_dir}/{session_id}.json` and leaves the
/// outbox. A failed write keeps the row, so the next drain retries it.
pub async fn start_archive_worker(
    statuses: Arc<RwLock<HashMap<String, ArchiveStatus>>>,
    database_path: PathBuf,
    archive_dir: PathBuf,
    mut rx: mpsc::Receiver<String>,
) {
    drain_outbox(&statuses, &database_path, &archive_dir).await;
    while rx.recv().await.is_some() {
        drain_outbox(&statuses, &database_path, &archive_dir).await;
    }
}

async fn drain_outbox(
    statuses: &RwLock<HashMap<String, ArchiveStatus>>,
    database_path: &Path,
    archive_dir: &Path,
) {
    let records = match with_db(database_path, |conn| outbox::pending(conn)) {
        Ok(records) => records,
        Err(e) => {
            error!("archive outbox unreadable: {}", e);
            return;
        }
    };
    for record in records {
        let status = match write_receipt(archive_dir, &record).await {
            Ok(path) => {
                if let Err(e) = with_db(database_path, |conn| outbox::remove(conn, &record.session_id)) {
                    error!("session {} left in the outbox: {}", record.session_id, e);
                }
                info!(
                    "session {} signed by {} ({} zone(s)); receipt {}",
                    record.session_id,
                    record.owner_name,
                    record.zone_data.len(),
                    path
                );
                ArchiveStatus::Archived(path)
            }
            Err(e) => {
                error!("receipt for session {} not written: {}", record.session_id, e);
                ArchiveStatus::Failed(e.to_string())
            }
        };
        statuses.write().await.insert(record.session_id, status);
    }
}

// The connection never lives across an await point.
fn with_db<T>(
    database_path: &Path,
    op: impl FnOnce(&rusqlite::Connection) -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let conn = db::open(database_path)?;
    op(&conn)
}

pub(crate) fn receipt_path(archive_dir: &Path, session_id: &str) -> PathBuf {
    archive_dir.join(format!("{}.json", session_id))
}

async fn write_receipt(archive_dir: &Path, record: &FinalizedSignature) -> std::io::Result<String> {
    let path = receipt_path(archive_dir, &record.session_id);
    let body = serde_json::to_vec_pretty(record)?;
    tokio::fs::create_dir_all(archive_dir).await?;
    tokio::fs::write(&path, body).await?;
    Ok(path.display().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::DateTime;
    use common::model::session::SignatureZoneData;

    pub(crate) fn record(session_id: &str) -> FinalizedSignature {
        FinalizedSignature {
            session_id: session_id.into(),
            template_id: "mandat-1".into(),
            owner_name: "Claire Martin".into(),
            property_address: "12 rue des Lilas".into(),
            signer_ip: Some("198.51.100.23".into()),
            signed_at: DateTime::from_timestamp(1_742_036_400, 0).unwrap(),
            zone_data: vec![SignatureZoneData {
                session_id: session_id.into(),
                zone_id: "z1".into(),
                value: "15/03/2025".into(),
            }],
        }
    }

    #[actix_web::test]
    async fn worker_writes_one_receipt_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let database_path = dir.path().join("signatures.sqlite");
        let archive_dir = dir.path().join("archive");
        // Left over from a previous run, found by the start-up drain
        outbox::enqueue(&db::open(&database_path).unwrap(), &record("s1")).unwrap();

        let (state, rx) = ArchiveState::new();
        let statuses = state.statuses.clone();
        outbox::enqueue(&db::open(&database_path).unwrap(), &record("s2")).unwrap();
        state.notify("s2");
        drop(state);
        start_archive_worker(statuses.clone(), database_path.clone(), archive_dir.clone(), rx).await;

        for id in ["s1", "s2"] {
            let receipt = std::fs::read_to_string(receipt_path(&archive_dir, id)).unwrap();
            let parsed: FinalizedSignature = serde_json::from_str(&receipt).unwrap();
            assert_eq!(parsed, record(id));
            assert!(matches!(
                statuses.read().await.get(id),
                Some(ArchiveStatus::Archived(_))
            ));
        }
        let conn = db::open(&database_path).unwrap();
        assert!(outbox::pending(&conn).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn failed_write_keeps_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let database_path = dir.path().join("signatures.sqlite");
        // A file where the archive directory should be
        let archive_dir = dir.path().join("archive");
        std::fs::write(&archive_dir, b"not a directory").unwrap();
        outbox::enqueue(&db::open(&database_path).unwrap(), &record("s3")).unwrap();

        let (state, rx) = ArchiveState::new();
        let statuses = state.statuses.clone();
        drop(state);
        start_archive_worker(statuses.clone(), database_path.clone(), archive_dir, rx).await;

        assert!(matches!(
            statuses.read().await.get("s3"),
            Some(ArchiveStatus::Failed(_))
        ));
        let conn = db::open(&database_path).unwrap();
        assert!(outbox::is_pending(&conn, "s3").unwrap());
    }

    #[test]
    fn notify_without_worker_is_harmless() {
        let (state, rx) = ArchiveState::new();
        drop(rx);
        state.notify("s4");
    }
}
