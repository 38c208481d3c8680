use serde::{Deserialize, Serialize};

use crate::geometry::{self, Rect};

/// Auto-fill keys a text or date zone may reference.
pub const FIELD_KEYS: [&str; 4] = ["owner_name", "property_address", "commission_rate", "today"];

/// Kind of input a zone collects from its signing party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Signature,
    Initials,
    Date,
    Text,
}

impl ZoneType {
    pub const ALL: [ZoneType; 4] = [
        ZoneType::Signature,
        ZoneType::Initials,
        ZoneType::Date,
        ZoneType::Text,
    ];

    /// Default `(width, height)` in logical units for a freshly placed zone.
    pub fn default_size(self) -> (f64, f64) {
        match self {
            ZoneType::Signature => (200.0, 70.0),
            ZoneType::Initials => (60.0, 40.0),
            ZoneType::Date => (150.0, 30.0),
            ZoneType::Text => (200.0, 30.0),
        }
    }

    /// Label shown on the zone until the operator renames it.
    pub fn default_label(self) -> &'static str {
        match self {
            ZoneType::Signature => "Signature",
            ZoneType::Initials => "Paraphe",
            ZoneType::Date => "Date",
            ZoneType::Text => "Texte",
        }
    }

    /// Signature and initials are captured as a drawing or a typed name.
    pub fn is_handwritten(self) -> bool {
        matches!(self, ZoneType::Signature | ZoneType::Initials)
    }

    /// Only text and date zones may be auto-filled from a field key.
    pub fn accepts_field_key(self) -> bool {
        matches!(self, ZoneType::Date | ZoneType::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneType::Signature => "signature",
            ZoneType::Initials => "initials",
            ZoneType::Date => "date",
            ZoneType::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<ZoneType> {
        ZoneType::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Party responsible for filling a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneRole {
    /// The property owner, who goes through the signing flow.
    Owner,
    /// The management company countersigning the mandate.
    Conciergerie,
}

impl ZoneRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneRole::Owner => "owner",
            ZoneRole::Conciergerie => "conciergerie",
        }
    }

    pub fn parse(value: &str) -> Option<ZoneRole> {
        match value {
            "owner" => Some(ZoneRole::Owner),
            "conciergerie" => Some(ZoneRole::Conciergerie),
            _ => None,
        }
    }
}

/// A positioned, typed placeholder on one page of a template document.
///
/// Geometry is expressed in the logical page space (see [`crate::geometry`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureZone {
    pub id: String,
    /// Back-reference to the owning template.
    pub template_id: String,
    pub zone_type: ZoneType,
    pub label: String,
    pub role: ZoneRole,
    /// 1-based page index.
    pub page_number: u32,
    pub x_position: f64,
    pub y_position: f64,
    pub width: f64,
    pub height: f64,
    pub is_required: bool,
    /// Comparator key for display and navigation. Gaps are allowed.
    pub sort_order: i64,
    /// Optional auto-fill source, only meaningful for text and date zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,
}

impl SignatureZone {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x_position,
            y: self.y_position,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x_position = rect.x;
        self.y_position = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Re-applies the page-bounds invariant to this zone.
    pub fn clamp_to_page(&mut self) {
        let clamped = geometry::clamp_rect(self.rect());
        self.set_rect(clamped);
    }

    pub fn is_within_page(&self) -> bool {
        geometry::is_within_page(&self.rect())
    }
}

/// Partial update applied by the zone editor; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub zone_type: Option<ZoneType>,
    pub label: Option<String>,
    pub role: Option<ZoneRole>,
    pub page_number: Option<u32>,
    pub x_position: Option<f64>,
    pub y_position: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub is_required: Option<bool>,
    pub sort_order: Option<i64>,
    /// `Some(None)` clears the key.
    pub field_key: Option<Option<String>>,
}

impl ZoneUpdate {
    pub fn position(x: f64, y: f64) -> Self {
        ZoneUpdate {
            x_position: Some(x),
            y_position: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        ZoneUpdate {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn role(role: ZoneRole) -> Self {
        ZoneUpdate {
            role: Some(role),
            ..Default::default()
        }
    }

    /// Merges the fields into `zone` without enforcing any invariant.
    pub(crate) fn apply_to(self, zone: &mut SignatureZone) {
        if let Some(zone_type) = self.zone_type {
            zone.zone_type = zone_type;
        }
        if let Some(label) = self.label {
            zone.label = label;
        }
        if let Some(role) = self.role {
            zone.role = role;
        }
        if let Some(page_number) = self.page_number {
            zone.page_number = page_number;
        }
        if let Some(x) = self.x_position {
            zone.x_position = x;
        }
        if let Some(y) = self.y_position {
            zone.y_position = y;
        }
        if let Some(width) = self.width {
            zone.width = width;
        }
        if let Some(height) = self.height {
            zone.height = height;
        }
        if let Some(is_required) = self.is_required {
            zone.is_required = is_required;
        }
        if let Some(sort_order) = self.sort_order {
            zone.sort_order = sort_order;
        }
        if let Some(field_key) = self.field_key {
            zone.field_key = field_key;
        }
        if !zone.zone_type.accepts_field_key() {
            zone.field_key = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_type_serializes_lowercase() {
        let json = serde_json::to_string(&ZoneType::Initials).unwrap();
        assert_eq!(json, "\"initials\"");
        let role: ZoneRole = serde_json::from_str("\"conciergerie\"").unwrap();
        assert_eq!(role, ZoneRole::Conciergerie);
    }

    #[test]
    fn parse_matches_as_str() {
        for zone_type in ZoneType::ALL {
            assert_eq!(ZoneType::parse(zone_type.as_str()), Some(zone_type));
        }
        assert_eq!(ZoneType::parse("checkbox"), None);
        assert_eq!(ZoneRole::parse("owner"), Some(ZoneRole::Owner));
    }

    #[test]
    fn field_key_dropped_for_handwritten_zones() {
        let mut zone = SignatureZone {
            id: "z1".into(),
            template_id: "t1".into(),
            zone_type: ZoneType::Text,
            label: "Nom".into(),
            role: ZoneRole::Owner,
            page_number: 1,
            x_position: 10.0,
            y_position: 10.0,
            width: 200.0,
            height: 30.0,
            is_required: true,
            sort_order: 1,
            field_key: Some("owner_name".into()),
        };
        ZoneUpdate {
            zone_type: Some(ZoneType::Signature),
            ..Default::default()
        }
        .apply_to(&mut zone);
        assert_eq!(zone.field_key, None);
    }
}
