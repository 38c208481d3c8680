use actix_web::{web, HttpRequest, Responder};
use chrono::Utc;
use common::model::session::FinalizedSignature;
use common::signing::SigningFlow;
use log::info;
use rusqlite::Connection;

use super::{load_bundle, respond, store};
use crate::archive::outbox::OutboxArchive;
use crate::archive::state::ArchiveState;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

pub async fn process(
    req: HttpRequest,
    config: web::Data<Config>,
    archive: web::Data<ArchiveState>,
    session_id: web::Path<String>,
) -> impl Responder {
    let signer_ip = req.peer_addr().map(|addr| addr.ip().to_string());
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|mut conn| finalize_session(&mut conn, &session_id, signer_ip, &archive));
    respond(&session_id, result)
}

/// Closes the session and queues its archival.
///
/// The status update and the outbox row commit together; the worker is only
/// woken after the commit. If anything fails the transaction is rolled back,
/// nothing reaches the worker and the signer may retry.
pub fn finalize_session(
    conn: &mut Connection,
    session_id: &str,
    signer_ip: Option<String>,
    archive: &ArchiveState,
) -> Result<FinalizedSignature, ServiceError> {
    let tx = conn.transaction()?;
    let bundle = load_bundle(&tx, session_id)?;
    let mut flow = SigningFlow::for_submission(bundle.template, bundle.session, bundle.zone_data)?;
    let signed_at = Utc::now();

    store::mark_signed(&tx, session_id, signed_at, signer_ip.as_deref())?;
    let record = flow.finalize(signed_at, signer_ip, &mut OutboxArchive::new(&tx))?;
    tx.commit()?;
    archive.notify(session_id);

    info!(
        "session {} finalized with {} zone(s) from {}",
        session_id,
        record.zone_data.len(),
        record.signer_ip.as_deref().unwrap_or("unknown address")
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::outbox;
    use crate::services::templates::save::save_template;
    use common::editor::ZoneEditor;
    use common::model::session::{SessionStatus, SignatureSession, SignatureZoneData};
    use common::model::template::SignatureTemplate;
    use common::model::zone::ZoneType;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::time::Duration;

    /// A viewed session whose only owner zone is already completed.
    fn ready_to_finalize(conn: &mut Connection) {
        let mut editor = ZoneEditor::new(SignatureTemplate::new("mandat-1", "Mandat"));
        let zone_id = editor.add_zone(ZoneType::Text).id.clone();
        save_template(conn, &editor.into_template()).unwrap();
        let session = SignatureSession::new("sess-1", "mandat-1", "Claire Martin", "12 rue des Lilas");
        store::insert_session(conn, &session).unwrap();
        store::mark_viewed(conn, "sess-1").unwrap();
        let data = SignatureZoneData {
            session_id: "sess-1".into(),
            zone_id,
            value: "Bon séjour".into(),
        };
        store::insert_zone_data(conn, &data, &BTreeMap::new()).unwrap();
    }

    #[test]
    fn failed_commit_reaches_no_worker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.sqlite");
        let mut conn = db::open(&path).unwrap();
        ready_to_finalize(&mut conn);
        conn.busy_timeout(Duration::from_millis(50)).unwrap();
        let (archive, mut rx) = ArchiveState::new();

        // A reader inside a transaction keeps the commit from taking its lock
        let reader = db::open(&path).unwrap();
        reader.execute_batch("BEGIN").unwrap();
        let status: String = reader
            .query_row("SELECT status FROM sessions WHERE id = 'sess-1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "viewed");

        let err = finalize_session(&mut conn, "sess-1", Some("198.51.100.23".into()), &archive).unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)), "{err}");
        assert!(rx.try_recv().is_err());
        reader.execute_batch("COMMIT").unwrap();

        assert_eq!(store::load_session(&conn, "sess-1").unwrap().status, SessionStatus::Viewed);
        assert!(outbox::pending(&conn).unwrap().is_empty());

        let record = finalize_session(&mut conn, "sess-1", Some("198.51.100.23".into()), &archive).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "sess-1");
        assert!(rx.try_recv().is_err());
        assert_eq!(outbox::pending(&conn).unwrap(), vec![record]);
        assert_eq!(store::load_session(&conn, "sess-1").unwrap().status, SessionStatus::Signed);
    }
}
