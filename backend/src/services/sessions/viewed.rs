use actix_web::{web, Responder};
use common::error::SigningError;
use common::model::session::SignatureSession;
use common::signing::SigningFlow;
use log::info;
use rusqlite::Connection;

use super::{load_bundle, respond, store};
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

pub async fn process(config: web::Data<Config>, session_id: web::Path<String>) -> impl Responder {
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|conn| mark_viewed(&conn, &session_id));
    respond(&session_id, result)
}

/// Opens the document for the signer. Re-opening a viewed session is a no-op.
pub fn mark_viewed(conn: &Connection, session_id: &str) -> Result<SignatureSession, ServiceError> {
    let bundle = load_bundle(conn, session_id)?;
    if bundle.session.is_signed() {
        return Err(SigningError::SessionClosed(bundle.session.status).into());
    }
    let mut flow = SigningFlow::new(bundle.template, bundle.session);
    if flow.open_document()? && store::mark_viewed(conn, session_id)? {
        info!("session {} viewed", session_id);
    }
    Ok(flow.session().clone())
}
