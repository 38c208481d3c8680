use actix_web::{web, Responder};
use common::jobs::ArchiveStatus;
use rusqlite::Connection;

use super::{respond, store};
use crate::archive::outbox;
use crate::archive::state::{receipt_path, ArchiveState};
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

pub(crate) async fn process(
    session_id: web::Path<String>,
    config: web::Data<Config>,
    state: web::Data<ArchiveState>,
) -> impl Responder {
    let known = state.statuses.read().await.get(session_id.as_str()).cloned();
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|conn| receipt_status(&conn, &config, &session_id, known));
    respond(&session_id, result)
}

/// Outcome seen by the worker since start-up, then the outbox, then the
/// receipt file left by an earlier run.
pub fn receipt_status(
    conn: &Connection,
    config: &Config,
    session_id: &str,
    known: Option<ArchiveStatus>,
) -> Result<ArchiveStatus, ServiceError> {
    if let Some(status) = known {
        return Ok(status);
    }
    if outbox::is_pending(conn, session_id)? {
        return Ok(ArchiveStatus::Pending);
    }
    let path = receipt_path(&config.archive_dir, session_id);
    if path.is_file() {
        return Ok(ArchiveStatus::Archived(path.display().to_string()));
    }
    // Unknown session or not signed yet
    store::load_session(conn, session_id)?;
    Err(ServiceError::NotFound(format!("receipt of session {}", session_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::state::tests::record;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            archive_dir: dir.path().join("archive"),
            ..Config::default()
        };
        let conn = db::open_in_memory();

        outbox::enqueue(&conn, &record("s1")).unwrap();
        assert_eq!(receipt_status(&conn, &config, "s1", None).unwrap(), ArchiveStatus::Pending);

        outbox::remove(&conn, "s1").unwrap();
        std::fs::create_dir_all(&config.archive_dir).unwrap();
        let path = receipt_path(&config.archive_dir, "s1");
        std::fs::write(&path, b"{}").unwrap();
        assert_eq!(
            receipt_status(&conn, &config, "s1", None).unwrap(),
            ArchiveStatus::Archived(path.display().to_string())
        );

        let failed = ArchiveStatus::Failed("disk full".into());
        assert_eq!(receipt_status(&conn, &config, "s1", Some(failed.clone())).unwrap(), failed);
    }

    #[test]
    fn unknown_session_has_no_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            archive_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let conn = db::open_in_memory();
        assert!(matches!(
            receipt_status(&conn, &config, "missing", None),
            Err(ServiceError::NotFound(_))
        ));
    }
}
