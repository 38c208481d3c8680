use actix_web::{web, Responder};

use super::{load_bundle, respond};
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

pub async fn process(config: web::Data<Config>, session_id: web::Path<String>) -> impl Responder {
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|conn| load_bundle(&conn, &session_id));
    respond(&session_id, result)
}
