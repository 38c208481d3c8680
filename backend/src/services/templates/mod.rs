//! # Template Service Module
//!
//! Routes under `/api/templates` for the zone editor.
//!
//! ## Sub-modules:
//! - `get`: loads a template and its zones.
//! - `save`: validates and persists a template with its complete zone list.

pub(crate) mod get;
pub(crate) mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /save`**:
///     - **Handler**: `save::process`
///     - **Description**: Creates a new template or replaces an existing one. The JSON
///       payload is a `SignatureTemplate`; zones missing from the payload are deleted.
///       Templates violating the page-bounds invariant are refused with `400`.
///
/// *   **`GET /{template_id}`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns the template with its zones ordered by `sort_order`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/save", post().to(save::process))
        .route("/{template_id}", get().to(get::process))
}
