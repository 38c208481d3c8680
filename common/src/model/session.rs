use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a signing session. Terminal at `Signed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Link issued, document not opened yet.
    Pending,
    /// The signer opened the document.
    Viewed,
    Signed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Viewed => "viewed",
            SessionStatus::Signed => "signed",
        }
    }

    pub fn parse(value: &str) -> Option<SessionStatus> {
        match value {
            "pending" => Some(SessionStatus::Pending),
            "viewed" => Some(SessionStatus::Viewed),
            "signed" => Some(SessionStatus::Signed),
            _ => None,
        }
    }
}

/// One signer's run through the signing flow against a fixed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureSession {
    pub id: String,
    pub template_id: String,
    pub owner_name: String,
    pub property_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    /// Pre-fill cache keyed by zone id.
    #[serde(default)]
    pub field_values: BTreeMap<String, String>,
}

impl SignatureSession {
    pub fn new(
        id: impl Into<String>,
        template_id: impl Into<String>,
        owner_name: impl Into<String>,
        property_address: impl Into<String>,
    ) -> Self {
        SignatureSession {
            id: id.into(),
            template_id: template_id.into(),
            owner_name: owner_name.into(),
            property_address: property_address.into(),
            commission_rate: None,
            status: SessionStatus::Pending,
            signer_ip: None,
            signed_at: None,
            field_values: BTreeMap::new(),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.status == SessionStatus::Signed
    }

    /// Value of a built-in auto-fill key, if the session knows it.
    pub fn field_value(&self, field_key: &str) -> Option<String> {
        match field_key {
            "owner_name" => Some(self.owner_name.clone()),
            "property_address" => Some(self.property_address.clone()),
            "commission_rate" => self.commission_rate.map(|rate| format!("{rate} %")),
            _ => None,
        }
    }
}

/// The value one signer gave to one zone. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureZoneData {
    pub session_id: String,
    pub zone_id: String,
    /// Free text, a formatted date or an image data URL.
    pub value: String,
}

/// Terminal record handed to the archival collaborator after finalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedSignature {
    pub session_id: String,
    pub template_id: String,
    pub owner_name: String,
    pub property_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_ip: Option<String>,
    pub signed_at: DateTime<Utc>,
    pub zone_data: Vec<SignatureZoneData>,
}
