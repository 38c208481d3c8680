//! # Signing Session Service Module
//!
//! Routes under `/api/sessions`. The signer's browser runs the signing flow
//! locally; every state change it reports is replayed here through
//! `common::signing::SigningFlow` before anything is stored, so the database
//! never holds a transition the flow would refuse.
//!
//! ## Sub-modules:
//! - `create`: issues a session for a saved template.
//! - `get`: session, template and stored zone data in one bundle.
//! - `viewed`: pending → viewed when the signer opens the document.
//! - `zones`: appends one completed zone.
//! - `finalize`: closes the session and queues its archival.
//! - `receipt`: archival status of a finalized session.
//! - `store`: SQL helpers shared by the handlers.

mod create;
mod finalize;
mod get;
mod receipt;
pub(crate) mod store;
mod viewed;
mod zones;

use actix_web::web::{get, post, scope};
use actix_web::{HttpResponse, Scope};
use common::model::session::SignatureSession;
use common::requests::SessionBundle;
use log::warn;
use rusqlite::Connection;
use serde::Serialize;

use crate::error::ServiceError;
use crate::services::templates::get::get_template;

const API_PATH: &str = "/api/sessions";

/// Configures the `/api/sessions` scope.
///
/// *   **`POST /`**: `CreateSessionRequest` → `CreateSessionResponse`.
/// *   **`GET /{session_id}`**: `SessionBundle`.
/// *   **`POST /{session_id}/viewed`**: the updated `SignatureSession`.
/// *   **`POST /{session_id}/zones`**: `CompleteZoneRequest` → the stored `SignatureZoneData`.
///     Completing a zone twice answers `409 Conflict`.
/// *   **`POST /{session_id}/finalize`**: the `FinalizedSignature`; `409` once signed,
///     `400` while owner zones remain.
/// *   **`GET /{session_id}/receipt`**: `ArchiveStatus` of the signed session.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("/{session_id}", get().to(get::process))
        .route("/{session_id}/viewed", post().to(viewed::process))
        .route("/{session_id}/zones", post().to(zones::process))
        .route("/{session_id}/finalize", post().to(finalize::process))
        .route("/{session_id}/receipt", get().to(receipt::process))
}

/// Everything stored about a session.
pub(crate) fn load_bundle(conn: &Connection, session_id: &str) -> Result<SessionBundle, ServiceError> {
    let session: SignatureSession = store::load_session(conn, session_id)?;
    let template = get_template(conn, &session.template_id)?;
    let zone_data = store::load_zone_data(conn, session_id)?;
    Ok(SessionBundle {
        session,
        template,
        zone_data,
    })
}

fn respond<T: Serialize>(session_id: &str, result: Result<T, ServiceError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            warn!("session {}: {}", session_id, e);
            e.to_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::state::ArchiveState;
    use crate::config::Config;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use common::editor::ZoneEditor;
    use common::jobs::ArchiveStatus;
    use common::model::session::{FinalizedSignature, SessionStatus, SignatureZoneData};
    use common::model::template::SignatureTemplate;
    use common::model::zone::{ZoneRole, ZoneType, ZoneUpdate};
    use common::requests::{CompleteZoneRequest, CreateSessionRequest, CreateSessionResponse};
    use common::signing::ZoneInput;
    use image::{ImageFormat, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    fn mandate() -> SignatureTemplate {
        let mut editor = ZoneEditor::new(SignatureTemplate::new("mandat-1", "Mandat de gestion"));
        editor.add_zone(ZoneType::Signature);
        editor.add_zone(ZoneType::Date);
        editor.add_zone(ZoneType::Text);
        let counter = editor.add_zone(ZoneType::Signature).id.clone();
        editor
            .update_zone(&counter, ZoneUpdate::role(ZoneRole::Conciergerie))
            .unwrap();
        editor.into_template()
    }

    fn signature_image() -> String {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(8, 3, Rgba([0, 0, 90, 255]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    fn zone_request(session_id: &str, zone_id: &str, input: ZoneInput) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/zones", session_id))
            .set_json(CompleteZoneRequest {
                zone_id: zone_id.to_string(),
                input,
            })
    }

    #[actix_web::test]
    async fn signing_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("signatures.sqlite"),
            storage_dir: dir.path().join("documents"),
            archive_dir: dir.path().join("archive"),
            ..Config::default()
        };
        let (archive, mut rx) = ArchiveState::new();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(archive))
                .service(crate::services::templates::configure_routes())
                .service(configure_routes()),
        )
        .await;

        let template = mandate();
        let owner_ids: Vec<String> = template.owner_zones().iter().map(|z| z.id.clone()).collect();
        let counter_id = template.conciergerie_zones()[0].id.clone();
        let req = test::TestRequest::post()
            .uri("/api/templates/save")
            .set_json(&template)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(CreateSessionRequest {
                template_id: "mandat-1".into(),
                owner_name: "Claire Martin".into(),
                property_address: "12 rue des Lilas".into(),
                commission_rate: Some(20.0),
                field_values: BTreeMap::new(),
            })
            .to_request();
        let created: CreateSessionResponse = test::call_and_read_body_json(&app, req).await;
        let id = created.session_id.as_str();
        assert_eq!(created.signing_path, format!("/sign/{}", id));

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/viewed", id))
            .to_request();
        let session: SignatureSession = test::call_and_read_body_json(&app, req).await;
        assert_eq!(session.status, SessionStatus::Viewed);

        let signature = ZoneInput::Drawn {
            image: signature_image(),
        };
        let resp = test::call_service(&app, zone_request(id, &owner_ids[0], signature.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = test::call_service(&app, zone_request(id, &owner_ids[0], signature.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = test::call_service(&app, zone_request(id, &counter_id, signature).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let finalize = || {
            test::TestRequest::post()
                .uri(&format!("/api/sessions/{}/finalize", id))
                .peer_addr("198.51.100.23:52114".parse().unwrap())
                .to_request()
        };
        assert_eq!(test::call_service(&app, finalize()).await.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            zone_request(id, &owner_ids[1], ZoneInput::Date("15/03/2025".into())).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let stored: SignatureZoneData = test::call_and_read_body_json(
            &app,
            zone_request(id, &owner_ids[2], ZoneInput::Text("Bon séjour".into())).to_request(),
        )
        .await;
        assert_eq!(stored.value, "Bon séjour");

        let record: FinalizedSignature = test::call_and_read_body_json(&app, finalize()).await;
        assert_eq!(record.signer_ip.as_deref(), Some("198.51.100.23"));
        assert_eq!(record.zone_data.len(), 3);
        assert_eq!(test::call_service(&app, finalize()).await.status(), StatusCode::CONFLICT);

        assert_eq!(rx.try_recv().unwrap(), id);
        assert!(rx.try_recv().is_err());

        // Committed and waiting for the worker
        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}/receipt", id))
            .to_request();
        let status: ArchiveStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status, ArchiveStatus::Pending);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}", id))
            .to_request();
        let bundle: SessionBundle = test::call_and_read_body_json(&app, req).await;
        assert_eq!(bundle.session.status, SessionStatus::Signed);
        assert_eq!(bundle.zone_data, record.zone_data);
    }

    #[actix_web::test]
    async fn unknown_session_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("signatures.sqlite"),
            ..Config::default()
        };
        let (archive, _rx) = ArchiveState::new();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(archive))
                .service(configure_routes()),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/sessions/missing").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
