use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::geometry::{MIN_ZONE_HEIGHT, MIN_ZONE_WIDTH};
use crate::model::zone::{SignatureZone, ZoneRole};

/// A signable document together with the zones placed on it.
///
/// Created and edited only through the zone editor. Many signing sessions may
/// reference the same template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    /// URL of the stored PDF. `None` renders a blank placeholder canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    #[serde(default)]
    pub zones: Vec<SignatureZone>,
}

impl SignatureTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        SignatureTemplate {
            id: id.into(),
            name: name.into(),
            property_name: None,
            document_url: None,
            zones: Vec::new(),
        }
    }

    pub fn zone(&self, zone_id: &str) -> Option<&SignatureZone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    /// Zones assigned to `role`, ordered by `(sort_order, id)`.
    pub fn zones_for_role(&self, role: ZoneRole) -> Vec<&SignatureZone> {
        let mut zones: Vec<&SignatureZone> = self.zones.iter().filter(|z| z.role == role).collect();
        sort_zones(&mut zones);
        zones
    }

    pub fn owner_zones(&self) -> Vec<&SignatureZone> {
        self.zones_for_role(ZoneRole::Owner)
    }

    pub fn conciergerie_zones(&self) -> Vec<&SignatureZone> {
        self.zones_for_role(ZoneRole::Conciergerie)
    }

    /// Zones placed on `page_number`, ordered by `(sort_order, id)`.
    pub fn zones_on_page(&self, page_number: u32) -> Vec<&SignatureZone> {
        let mut zones: Vec<&SignatureZone> = self
            .zones
            .iter()
            .filter(|z| z.page_number == page_number)
            .collect();
        sort_zones(&mut zones);
        zones
    }

    /// `sort_order` of the next added zone: the zone count plus one. After a
    /// removal this may repeat an existing value; ties fall back to the id.
    pub fn next_sort_order(&self) -> i64 {
        self.zones.len() as i64 + 1
    }

    /// Checks the invariants every persisted template must hold.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.id.trim().is_empty() {
            return Err(TemplateError::MissingId);
        }
        let mut seen = std::collections::HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.id.as_str()) {
                return Err(TemplateError::DuplicateZone(zone.id.clone()));
            }
            if zone.template_id != self.id {
                return Err(TemplateError::ForeignZone {
                    zone_id: zone.id.clone(),
                    template_id: zone.template_id.clone(),
                });
            }
            if zone.page_number == 0 {
                return Err(TemplateError::InvalidPage(zone.id.clone()));
            }
            if !(zone.width >= MIN_ZONE_WIDTH && zone.height >= MIN_ZONE_HEIGHT) {
                return Err(TemplateError::InvalidSize(zone.id.clone()));
            }
            if !zone.is_within_page() {
                return Err(TemplateError::OutOfBounds(zone.id.clone()));
            }
        }
        Ok(())
    }

    /// MD5 of the JSON serialization, used to detect unsaved edits.
    pub fn digest(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        format!("{:x}", md5::compute(json))
    }
}

/// Same order as the stored zones (`ORDER BY sort_order, id`).
fn sort_zones(zones: &mut [&SignatureZone]) {
    zones.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
}
