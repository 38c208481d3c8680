use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::editor::PDF_CONTENT_TYPE;
use common::requests::UploadResponse;
use futures_util::StreamExt;
use log::{info, warn};
use md5::Context;

use super::document_url;
use crate::config::Config;
use crate::error::ServiceError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Largest accepted document.
pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

pub async fn process(config: web::Data<Config>, payload: Multipart) -> impl Responder {
    match upload_document(&config.storage_dir, payload).await {
        Ok(response) => {
            info!("document stored at {}", response.url);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            warn!("document upload refused: {}", e);
            e.to_response()
        }
    }
}

/// Reads the `file` part, checks it is a PDF and writes it as `{md5}.pdf`.
///
/// Nothing is written unless the whole part was received and validated.
pub async fn upload_document(storage_dir: &Path, mut payload: Multipart) -> Result<UploadResponse, ServiceError> {
    let mut stored: Option<UploadResponse> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if content_type != PDF_CONTENT_TYPE || !filename.to_lowercase().ends_with(".pdf") {
            return Err(ServiceError::BadRequest(format!(
                "only PDF documents are accepted (got {:?}, {})",
                filename, content_type
            )));
        }

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > MAX_DOCUMENT_BYTES {
                return Err(ServiceError::BadRequest("document is too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        stored = Some(store_pdf(storage_dir, &bytes).await?);
    }

    stored.ok_or_else(|| ServiceError::BadRequest("missing `file` part".to_string()))
}

/// Writes a validated PDF body under its digest. Identical uploads share one file.
pub async fn store_pdf(storage_dir: &Path, bytes: &[u8]) -> Result<UploadResponse, ServiceError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ServiceError::BadRequest("file is not a PDF document".to_string()));
    }
    let mut hasher = Context::new();
    hasher.consume(bytes);
    let file_name = format!("{:x}.pdf", hasher.finalize());

    tokio::fs::create_dir_all(storage_dir).await?;
    let path = storage_dir.join(&file_name);
    if tokio::fs::metadata(&path).await.is_err() {
        tokio::fs::write(&path, bytes).await?;
    }
    Ok(UploadResponse {
        url: document_url(&file_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn pdf_is_stored_by_digest() {
        let dir = tempfile::tempdir().unwrap();
        let body = b"%PDF-1.7\n%mandat\n";
        let first = store_pdf(dir.path(), body).await.unwrap();
        let second = store_pdf(dir.path(), body).await.unwrap();

        assert_eq!(first, second);
        let expected = format!("/api/documents/{:x}.pdf", md5::compute(body));
        assert_eq!(first.url, expected);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[actix_web::test]
    async fn non_pdf_bytes_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_pdf(dir.path(), b"PK\x03\x04word/document.xml").await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
