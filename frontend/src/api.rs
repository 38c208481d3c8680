//! Backend calls shared by the editor and the signing page.
//!
//! Every function answers a user-presentable error string; components turn
//! it into a toast.

use common::model::session::{FinalizedSignature, SignatureSession, SignatureZoneData};
use common::model::template::SignatureTemplate;
use common::render::{RenderError, RenderKey, RenderedPage};
use common::requests::{
    CompleteZoneRequest, CreateSessionRequest, CreateSessionResponse, SessionBundle, UploadResponse,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::{File, FormData};

pub const TEMPLATES_PATH: &str = "/api/templates";
pub const DOCUMENTS_PATH: &str = "/api/documents";
pub const SESSIONS_PATH: &str = "/api/sessions";
/// Rasterization service. Answers a `RenderedPage` or a `RenderError`.
pub const RENDER_PATH: &str = "/render/page";

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        response.json::<T>().await.map_err(|e| e.to_string())
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        })
    }
}

pub async fn load_template(template_id: &str) -> Result<SignatureTemplate, String> {
    let response = Request::get(&format!("{}/{}", TEMPLATES_PATH, template_id))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

pub async fn save_template(template: &SignatureTemplate) -> Result<(), String> {
    let response = Request::post(&format!("{}/save", TEMPLATES_PATH))
        .json(template)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.ok() {
        Ok(())
    } else {
        Err(response.text().await.unwrap_or_default())
    }
}

pub async fn upload_document(file: &File) -> Result<String, String> {
    let form = FormData::new().map_err(|_| "FormData indisponible".to_string())?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| "fichier illisible".to_string())?;
    let response = Request::post(&format!("{}/upload", DOCUMENTS_PATH))
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json::<UploadResponse>(response).await.map(|r| r.url)
}

/// Asks the renderer for one page. Errors keep their kind so the page area
/// can tell an unreachable document from a page past the end.
pub async fn render_page(key: &RenderKey, target_width: u32) -> Result<RenderedPage, RenderError> {
    let page = key.page_number.to_string();
    let width = target_width.to_string();
    let response = Request::get(RENDER_PATH)
        .query([
            ("url", key.document_url.as_str()),
            ("page", page.as_str()),
            ("width", width.as_str()),
        ])
        .send()
        .await
        .map_err(|e| RenderError::DocumentUnreachable(e.to_string()))?;
    if response.ok() {
        response
            .json::<RenderedPage>()
            .await
            .map_err(|e| RenderError::DocumentUnreachable(e.to_string()))
    } else {
        let status = response.status();
        Err(response
            .json::<RenderError>()
            .await
            .unwrap_or_else(|_| RenderError::DocumentUnreachable(format!("HTTP {}", status))))
    }
}

pub async fn create_session(request: &CreateSessionRequest) -> Result<CreateSessionResponse, String> {
    let response = Request::post(SESSIONS_PATH)
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

pub async fn load_session(session_id: &str) -> Result<SessionBundle, String> {
    let response = Request::get(&format!("{}/{}", SESSIONS_PATH, session_id))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

pub async fn mark_viewed(session_id: &str) -> Result<SignatureSession, String> {
    let response = Request::post(&format!("{}/{}/viewed", SESSIONS_PATH, session_id))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

pub async fn complete_zone(session_id: &str, request: &CompleteZoneRequest) -> Result<SignatureZoneData, String> {
    let response = Request::post(&format!("{}/{}/zones", SESSIONS_PATH, session_id))
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

pub async fn finalize(session_id: &str) -> Result<FinalizedSignature, String> {
    let response = Request::post(&format!("{}/{}/finalize", SESSIONS_PATH, session_id))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}
