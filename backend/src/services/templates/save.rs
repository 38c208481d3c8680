use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::model::template::SignatureTemplate;
use log::{info, warn};
use rusqlite::{params, Connection};

use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

pub async fn process(config: web::Data<Config>, payload: web::Json<SignatureTemplate>) -> impl Responder {
    let template = payload.into_inner();
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|mut conn| save_template(&mut conn, &template));
    match result {
        Ok(()) => {
            info!("template {} saved with {} zone(s)", template.id, template.zones.len());
            HttpResponse::Ok().body("Template saved")
        }
        Err(e) => {
            warn!("template {} not saved: {}", template.id, e);
            e.to_response()
        }
    }
}

/// Replaces the stored template and its zone list in one transaction.
pub fn save_template(conn: &mut Connection, template: &SignatureTemplate) -> Result<(), ServiceError> {
    template.validate()?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO templates (id, name, property_name, document_url, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            property_name = excluded.property_name,
            document_url = excluded.document_url,
            updated_at = excluded.updated_at",
        params![
            &template.id,
            &template.name,
            &template.property_name,
            &template.document_url,
            Utc::now().to_rfc3339(),
        ],
    )?;

    // Zones that are no longer present
    let existing_ids: Vec<String> = tx
        .prepare("SELECT id FROM zones WHERE template_id = ?1")?
        .query_map(params![&template.id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    for old_id in &existing_ids {
        if template.zone(old_id).is_none() {
            tx.execute(
                "DELETE FROM zones WHERE id = ?1 AND template_id = ?2",
                params![old_id, &template.id],
            )?;
        }
    }

    for zone in &template.zones {
        tx.execute(
            "INSERT OR REPLACE INTO zones (id, template_id, zone_type, label, role, page_number,
                x_position, y_position, width, height, is_required, sort_order, field_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &zone.id,
                &template.id,
                zone.zone_type.as_str(),
                &zone.label,
                zone.role.as_str(),
                zone.page_number,
                zone.x_position,
                zone.y_position,
                zone.width,
                zone.height,
                zone.is_required,
                zone.sort_order,
                &zone.field_key,
            ],
        )?;
    }

    tx.commit()?;
    Ok(())
}
