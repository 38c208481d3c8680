//! # Document Service Module
//!
//! Object storage for the PDF documents templates are drawn on.
//!
//! ## Sub-modules:
//! - `upload`: accepts one PDF per request and stores it under its MD5 digest.
//! - `serve`: streams a stored PDF back to the renderer or the browser.

mod serve;
mod upload;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/documents";

/// Configures the `/api/documents` scope.
///
/// *   **`POST /upload`**: multipart form with a single `file` part; answers
///     `UploadResponse { url }`. Anything that is not a PDF is refused with `400`.
/// *   **`GET /{file_name}`**: the stored document, `404` when unknown.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/{file_name}", get().to(serve::process))
}

/// Public URL of a stored document.
pub(crate) fn document_url(file_name: &str) -> String {
    format!("{}/{}", API_PATH, file_name)
}
