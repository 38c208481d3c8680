use actix_web::{web, HttpResponse, Responder};
use common::model::session::SignatureSession;
use common::requests::{CreateSessionRequest, CreateSessionResponse};
use log::{info, warn};
use rusqlite::Connection;
use uuid::Uuid;

use super::store;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;
use crate::services::templates::get::get_template;

pub async fn process(config: web::Data<Config>, payload: web::Json<CreateSessionRequest>) -> impl Responder {
    let request = payload.into_inner();
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|conn| create_session(&conn, request));
    match result {
        Ok(response) => {
            info!("session {} issued", response.session_id);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            warn!("session not issued: {}", e);
            e.to_response()
        }
    }
}

pub fn create_session(conn: &Connection, request: CreateSessionRequest) -> Result<CreateSessionResponse, ServiceError> {
    let template = get_template(conn, &request.template_id)?;
    if template.owner_zones().is_empty() {
        return Err(ServiceError::BadRequest(format!(
            "template {} has no zone for the owner",
            template.id
        )));
    }
    for zone_id in request.field_values.keys() {
        match template.zone(zone_id) {
            Some(zone) if zone.zone_type.accepts_field_key() => {}
            _ => {
                return Err(ServiceError::BadRequest(format!(
                    "no text or date zone {} to pre-fill",
                    zone_id
                )))
            }
        }
    }

    let mut session = SignatureSession::new(
        Uuid::new_v4().to_string(),
        template.id,
        request.owner_name,
        request.property_address,
    );
    session.commission_rate = request.commission_rate;
    session.field_values = request.field_values;
    store::insert_session(conn, &session)?;

    Ok(CreateSessionResponse {
        signing_path: format!("/sign/{}", session.id),
        session_id: session.id,
    })
}
