//! Error types of the signature domain.

use thiserror::Error;

use crate::model::session::SessionStatus;
use crate::signing::Phase;

/// Reasons a template cannot be persisted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("template id must not be empty")]
    MissingId,
    #[error("zone {0} appears more than once")]
    DuplicateZone(String),
    #[error("zone {zone_id} belongs to template {template_id}")]
    ForeignZone { zone_id: String, template_id: String },
    #[error("zone {0} has an invalid page number")]
    InvalidPage(String),
    #[error("zone {0} is smaller than the minimum zone size")]
    InvalidSize(String),
    #[error("zone {0} lies outside the page")]
    OutOfBounds(String),
}

/// Failure reported by the object storage collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// Zone editor failures. All are recovered at the editor boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Rejected before any network interaction.
    #[error("only PDF documents can be used as templates (got {content_type})")]
    InvalidDocumentType { content_type: String },
    /// The storage call failed; the template keeps its previous document.
    #[error("document upload failed: {0}")]
    UploadFailure(String),
    #[error("zone {0} not found")]
    ZoneNotFound(String),
    #[error("upload ticket does not match the pending upload")]
    StaleUpload,
}

/// Failure reported by the archival collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("archive error: {0}")]
pub struct ArchiveError(pub String);

/// Signing flow failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SigningError {
    #[error("action not allowed in phase {0:?}")]
    WrongPhase(Phase),
    #[error("the document must be read to the end first")]
    DocumentNotRead,
    #[error("zone {0} is not part of this template")]
    UnknownZone(String),
    #[error("zone {0} is not assigned to the owner")]
    NotOwnerZone(String),
    #[error("zone {0} is already completed")]
    ZoneAlreadyCompleted(String),
    #[error("zone {0} received an empty value")]
    EmptyValue(String),
    #[error("zone {zone_id} expects a {expected} value")]
    InputMismatch { zone_id: String, expected: &'static str },
    #[error("{remaining} zone(s) still need to be completed")]
    IncompleteZones { remaining: usize },
    #[error("session is already {0:?}")]
    SessionClosed(SessionStatus),
    #[error("zone data belongs to session {0}")]
    ForeignZoneData(String),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
