//! Payloads exchanged between the web client and the backend routes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::session::{SignatureSession, SignatureZoneData};
use crate::model::template::SignatureTemplate;
use crate::signing::ZoneInput;

/// Body of `POST /api/sessions`: issues a signing link for a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub template_id: String,
    pub owner_name: String,
    pub property_address: String,
    #[serde(default)]
    pub commission_rate: Option<f64>,
    /// Pre-fill values keyed by zone id.
    #[serde(default)]
    pub field_values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    /// Path the signer opens in the web client.
    pub signing_path: String,
}

/// Everything the signing page needs to (re)build its flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBundle {
    pub session: SignatureSession,
    pub template: SignatureTemplate,
    #[serde(default)]
    pub zone_data: Vec<SignatureZoneData>,
}

/// Body of `POST /api/sessions/{id}/zones`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteZoneRequest {
    pub zone_id: String,
    pub input: ZoneInput,
}

/// Answer of `POST /api/documents/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}
