//! # Template Retrieval Service
//!
//! Backend logic for `GET /api/templates/{template_id}`: the template row and
//! its zones ordered by `sort_order`, assembled into a
//! `common::model::template::SignatureTemplate`.

use actix_web::{web, HttpResponse, Responder};
use common::model::template::SignatureTemplate;
use common::model::zone::{SignatureZone, ZoneRole, ZoneType};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// Actix web handler for the `GET /api/templates/{template_id}` endpoint.
///
/// # Returns
/// - `200 OK` with the `SignatureTemplate` as a JSON payload on success.
/// - `404 Not Found` if no template has this id.
/// - `503 Service Unavailable` if the database cannot be read.
pub async fn process(config: web::Data<Config>, template_id: web::Path<String>) -> impl Responder {
    let result = db::open(&config.database_path)
        .map_err(ServiceError::from)
        .and_then(|conn| get_template(&conn, &template_id));
    match result {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => {
            warn!("template {} not loaded: {}", template_id, e);
            e.to_response()
        }
    }
}

pub fn get_template(conn: &Connection, template_id: &str) -> Result<SignatureTemplate, ServiceError> {
    let mut template = conn
        .query_row(
            "SELECT id, name, property_name, document_url FROM templates WHERE id = ?1",
            params![template_id],
            |row| {
                Ok(SignatureTemplate {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    property_name: row.get(2)?,
                    document_url: row.get(3)?,
                    zones: Vec::new(),
                })
            },
        )
        .optional()?
        .ok_or_else(|| ServiceError::NotFound(format!("template {}", template_id)))?;

    let mut stmt = conn.prepare(
        "SELECT id, zone_type, label, role, page_number, x_position, y_position,
                width, height, is_required, sort_order, field_key
         FROM zones WHERE template_id = ?1 ORDER BY sort_order, id",
    )?;
    let rows = stmt.query_map(params![template_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, u32>(4)?,
            [
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, f64>(7)?,
                row.get::<_, f64>(8)?,
            ],
            row.get::<_, bool>(9)?,
            row.get::<_, i64>(10)?,
            row.get::<_, Option<String>>(11)?,
        ))
    })?;

    for row in rows {
        let (id, zone_type, label, role, page_number, [x, y, width, height], is_required, sort_order, field_key) =
            row?;
        let zone_type = ZoneType::parse(&zone_type)
            .ok_or_else(|| ServiceError::Corrupt(format!("zone {} has type {:?}", id, zone_type)))?;
        let role = ZoneRole::parse(&role)
            .ok_or_else(|| ServiceError::Corrupt(format!("zone {} has role {:?}", id, role)))?;
        template.zones.push(SignatureZone {
            id,
            template_id: template.id.clone(),
            zone_type,
            label,
            role,
            page_number,
            x_position: x,
            y_position: y,
            width,
            height,
            is_required,
            sort_order,
            field_key,
        });
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::templates::save::save_template;
    use common::editor::ZoneEditor;
    use common::model::zone::ZoneUpdate;
    use pretty_assertions::assert_eq;

    fn editor_template() -> SignatureTemplate {
        let mut editor = ZoneEditor::new(SignatureTemplate::new("mandat-1", "Mandat de gestion"));
        editor.add_zone(ZoneType::Signature);
        let date = editor.add_zone(ZoneType::Date).id.clone();
        editor
            .update_zone(
                &date,
                ZoneUpdate {
                    field_key: Some(Some("today".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        let counter = editor.add_zone(ZoneType::Initials).id.clone();
        editor
            .update_zone(&counter, ZoneUpdate::role(ZoneRole::Conciergerie))
            .unwrap();
        editor.into_template()
    }

    #[test]
    fn saved_template_reads_back_identical() {
        let mut conn = db::open_in_memory();
        let template = editor_template();
        save_template(&mut conn, &template).unwrap();
        assert_eq!(get_template(&conn, "mandat-1").unwrap(), template);
    }

    #[test]
    fn resave_drops_removed_zones() {
        let mut conn = db::open_in_memory();
        let mut template = editor_template();
        save_template(&mut conn, &template).unwrap();

        let removed = template.zones.remove(0);
        template.document_url = Some("/api/documents/abc.pdf".into());
        save_template(&mut conn, &template).unwrap();

        let stored = get_template(&conn, "mandat-1").unwrap();
        assert_eq!(stored.zones.len(), 2);
        assert!(stored.zone(&removed.id).is_none());
        assert_eq!(stored.document_url.as_deref(), Some("/api/documents/abc.pdf"));
    }

    #[test]
    fn out_of_page_template_is_refused() {
        let mut conn = db::open_in_memory();
        let mut template = editor_template();
        template.zones[0].x_position = 590.0;
        let err = save_template(&mut conn, &template).unwrap_err();
        assert!(matches!(err, ServiceError::Template(_)));
        assert!(matches!(
            get_template(&conn, "mandat-1"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
