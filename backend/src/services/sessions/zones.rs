use actix_web::{web, Responder};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::model::session::SignatureZoneData;
use common::requests::CompleteZoneRequest;
use common::signing::SigningFlow;
use log::info;
use rusqlite::Connection;

use super::{load_bundle, respond, store};
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// Largest accepted signature image, decoded.
const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub async fn process(
    config: web::Data<Config>,
    session_id: web::Path<String>,
    payload: web::Json<CompleteZoneRequest>,
) -> impl Responder {
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|mut conn| complete_zone(&mut conn, &session_id, payload.into_inner()));
    respond(&session_id, result)
}

/// Replays the stored zones, applies the new one and persists it.
pub fn complete_zone(
    conn: &mut Connection,
    session_id: &str,
    request: CompleteZoneRequest,
) -> Result<SignatureZoneData, ServiceError> {
    let tx = conn.transaction()?;
    let bundle = load_bundle(&tx, session_id)?;
    let mut flow = SigningFlow::for_submission(bundle.template, bundle.session, bundle.zone_data)?;
    let record = flow.complete_zone(&request.zone_id, request.input)?;

    let handwritten = flow
        .template()
        .zone(&record.zone_id)
        .map(|zone| zone.zone_type.is_handwritten())
        .unwrap_or(false);
    if handwritten {
        check_image(&record.value)?;
    }

    store::insert_zone_data(&tx, &record, &flow.session().field_values)?;
    tx.commit()?;
    info!(
        "session {} completed zone {} ({}/{})",
        session_id,
        record.zone_id,
        flow.completed_count(),
        flow.owner_zones().len()
    );
    Ok(record)
}

/// Signature values are `data:image/png;base64,...` or JPEG; the payload must decode.
fn check_image(data_url: &str) -> Result<(), ServiceError> {
    let invalid = |why: &str| ServiceError::BadRequest(format!("signature image {}", why));
    let (header, payload) = data_url.split_once(',').ok_or_else(|| invalid("is not a data URL"))?;
    if !header.ends_with(";base64") {
        return Err(invalid("is not base64 encoded"));
    }
    let bytes = STANDARD.decode(payload).map_err(|_| invalid("is not valid base64"))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(invalid("is too large"));
    }
    image::load_from_memory(&bytes).map_err(|e| invalid(&format!("cannot be decoded: {}", e)))?;
    Ok(())
}
