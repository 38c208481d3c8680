//! Design-time zone editor.
//!
//! [`ZoneEditor`] is a CRUD surface over the zones of one
//! [`SignatureTemplate`]. The only extra state is the current page, the page
//! count reported by the renderer, the selection and an in-progress drag
//! gesture. Every mutation re-establishes the page-bounds invariant.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, StorageError};
use crate::geometry::{self, LogicalPoint, ScaleFactor, ScreenPoint};
use crate::model::template::SignatureTemplate;
use crate::model::zone::{SignatureZone, ZoneRole, ZoneType, ZoneUpdate};

/// The only content type accepted as a template document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Pointer travel (screen pixels) below which a press counts as a click.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Metadata of a file the operator picked for upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl DocumentUpload {
    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }
}

/// Object storage collaborator: stores a PDF and returns its public URL.
pub trait DocumentStorage {
    fn store(&mut self, upload: &DocumentUpload) -> Result<String, StorageError>;
}

/// Proof that an upload passed validation; required to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    zone_id: String,
    pointer_origin: ScreenPoint,
    zone_origin: LogicalPoint,
    moved: bool,
}

/// Result of a finished pointer gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOutcome {
    pub zone_id: String,
    /// `false` when the gesture was a plain click on the zone.
    pub moved: bool,
}

pub struct ZoneEditor {
    template: SignatureTemplate,
    selected_zone: Option<String>,
    current_page: u32,
    page_count: Option<u32>,
    drag: Option<DragState>,
    pending_upload: Option<u64>,
    upload_seq: u64,
    zone_seq: u64,
    saved_digest: Option<String>,
}

impl ZoneEditor {
    pub fn new(template: SignatureTemplate) -> Self {
        ZoneEditor {
            template,
            selected_zone: None,
            current_page: 1,
            page_count: None,
            drag: None,
            pending_upload: None,
            upload_seq: 0,
            zone_seq: 0,
            saved_digest: None,
        }
    }

    /// Editor over a template that was just loaded from storage.
    pub fn from_saved(template: SignatureTemplate) -> Self {
        let mut editor = ZoneEditor::new(template);
        editor.mark_saved();
        editor
    }

    pub fn template(&self) -> &SignatureTemplate {
        &self.template
    }

    pub fn into_template(self) -> SignatureTemplate {
        self.template
    }

    pub fn zones(&self) -> &[SignatureZone] {
        &self.template.zones
    }

    pub fn zone(&self, zone_id: &str) -> Option<&SignatureZone> {
        self.template.zone(zone_id)
    }

    pub fn set_name(&mut self, name: String) {
        self.template.name = name;
    }

    pub fn set_property_name(&mut self, property_name: Option<String>) {
        self.template.property_name = property_name.filter(|p| !p.trim().is_empty());
    }

    /// Places a new zone of `zone_type` on the current page and selects it.
    pub fn add_zone(&mut self, zone_type: ZoneType) -> &SignatureZone {
        let count = self.template.zones.len() as u64;
        let (width, height) = zone_type.default_size();
        let mut zone = SignatureZone {
            id: self.next_zone_id(),
            template_id: self.template.id.clone(),
            zone_type,
            label: zone_type.default_label().to_string(),
            role: ZoneRole::Owner,
            page_number: self.current_page,
            x_position: 60.0 + ((count * 73) % 260) as f64,
            y_position: 80.0 + ((count * 137) % 560) as f64,
            width,
            height,
            is_required: true,
            sort_order: self.template.next_sort_order(),
            field_key: None,
        };
        zone.clamp_to_page();
        debug!(
            "zone {} ({}) added on page {}",
            zone.id,
            zone_type.as_str(),
            zone.page_number
        );
        self.selected_zone = Some(zone.id.clone());
        let index = self.template.zones.len();
        self.template.zones.push(zone);
        &self.template.zones[index]
    }

    /// Merges `update` into the zone, then clamps geometry and page number.
    pub fn update_zone(&mut self, zone_id: &str, update: ZoneUpdate) -> Result<&SignatureZone, EditorError> {
        let page_count = self.page_count;
        let zone = self
            .template
            .zones
            .iter_mut()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| EditorError::ZoneNotFound(zone_id.to_string()))?;
        update.apply_to(zone);
        zone.clamp_to_page();
        zone.page_number = match page_count {
            Some(count) => zone.page_number.clamp(1, count),
            None => zone.page_number.max(1),
        };
        Ok(&*zone)
    }

    /// Deletes the zone. Remaining `sort_order` values are left as they are.
    pub fn remove_zone(&mut self, zone_id: &str) -> Result<SignatureZone, EditorError> {
        let index = self
            .template
            .zones
            .iter()
            .position(|z| z.id == zone_id)
            .ok_or_else(|| EditorError::ZoneNotFound(zone_id.to_string()))?;
        if self.selected_zone.as_deref() == Some(zone_id) {
            self.selected_zone = None;
        }
        if self.drag.as_ref().is_some_and(|d| d.zone_id == zone_id) {
            self.drag = None;
        }
        debug!("zone {zone_id} removed");
        Ok(self.template.zones.remove(index))
    }

    pub fn select_zone(&mut self, zone_id: Option<&str>) {
        self.selected_zone = zone_id
            .filter(|id| self.template.zone(id).is_some())
            .map(str::to_string);
    }

    pub fn selected_zone(&self) -> Option<&SignatureZone> {
        self.selected_zone.as_deref().and_then(|id| self.template.zone(id))
    }

    // Document upload

    /// Validates the picked file. Non-PDF files never reach storage.
    pub fn begin_upload(&mut self, upload: &DocumentUpload) -> Result<UploadTicket, EditorError> {
        if !upload.is_pdf() {
            return Err(EditorError::InvalidDocumentType {
                content_type: upload.content_type.clone(),
            });
        }
        self.upload_seq += 1;
        self.pending_upload = Some(self.upload_seq);
        Ok(UploadTicket(self.upload_seq))
    }

    /// Applies the storage outcome of the upload identified by `ticket`.
    ///
    /// A ticket superseded by a later `begin_upload` is rejected so its URL
    /// cannot overwrite the newer document.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<String, StorageError>,
    ) -> Result<(), EditorError> {
        if self.pending_upload != Some(ticket.0) {
            return Err(EditorError::StaleUpload);
        }
        self.pending_upload = None;
        let url = result.map_err(|e| EditorError::UploadFailure(e.0))?;
        debug!("template {} now uses document {url}", self.template.id);
        self.template.document_url = Some(url);
        self.page_count = None;
        self.current_page = 1;
        Ok(())
    }

    /// Validates, stores and applies an upload in one step.
    pub fn upload_document<S: DocumentStorage>(
        &mut self,
        upload: &DocumentUpload,
        storage: &mut S,
    ) -> Result<(), EditorError> {
        let ticket = self.begin_upload(upload)?;
        let result = storage.store(upload);
        self.finish_upload(ticket, result)
    }

    pub fn is_uploading(&self) -> bool {
        self.pending_upload.is_some()
    }

    // Pages

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// `None` until the renderer reported the document's page count.
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn set_page_count(&mut self, count: u32) {
        let count = count.max(1);
        self.page_count = Some(count);
        self.current_page = self.current_page.clamp(1, count);
    }

    /// Moves to `page` when the page count is known and `page` is in range.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        match self.page_count {
            Some(count) if (1..=count).contains(&page) => {
                self.current_page = page;
                true
            }
            _ => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.current_page > 1 && self.go_to_page(self.current_page - 1)
    }

    pub fn zones_on_current_page(&self) -> Vec<&SignatureZone> {
        self.template.zones_on_page(self.current_page)
    }

    /// Zones placed beyond the last page of the current document.
    pub fn zones_beyond_document(&self) -> Vec<&SignatureZone> {
        match self.page_count {
            Some(count) => self
                .template
                .zones
                .iter()
                .filter(|z| z.page_number > count)
                .collect(),
            None => Vec::new(),
        }
    }

    // Drag gesture

    pub fn begin_drag(&mut self, zone_id: &str, pointer: ScreenPoint) -> Result<(), EditorError> {
        let zone = self
            .template
            .zone(zone_id)
            .ok_or_else(|| EditorError::ZoneNotFound(zone_id.to_string()))?;
        self.drag = Some(DragState {
            zone_id: zone.id.clone(),
            pointer_origin: pointer,
            zone_origin: LogicalPoint {
                x: zone.x_position,
                y: zone.y_position,
            },
            moved: false,
        });
        self.selected_zone = Some(zone_id.to_string());
        Ok(())
    }

    /// Moves the dragged zone by the pointer travel since `begin_drag`.
    ///
    /// Does nothing when no drag is in progress.
    pub fn drag_to(&mut self, pointer: ScreenPoint, scale: ScaleFactor) -> Result<(), EditorError> {
        let Some(drag) = self.drag.as_mut() else {
            return Ok(());
        };
        let delta = pointer.delta_from(drag.pointer_origin);
        if delta.x.abs() > DRAG_THRESHOLD_PX || delta.y.abs() > DRAG_THRESHOLD_PX {
            drag.moved = true;
        }
        if !drag.moved {
            return Ok(());
        }
        let logical = geometry::to_logical(delta, scale);
        let update = ZoneUpdate::position(drag.zone_origin.x + logical.x, drag.zone_origin.y + logical.y);
        let zone_id = drag.zone_id.clone();
        self.update_zone(&zone_id, update).map(|_| ())
    }

    pub fn end_drag(&mut self) -> Option<DragOutcome> {
        self.drag.take().map(|drag| DragOutcome {
            zone_id: drag.zone_id,
            moved: drag.moved,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // Dirty tracking

    pub fn mark_saved(&mut self) {
        self.saved_digest = Some(self.template.digest());
    }

    /// Whether the template changed since it was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        match &self.saved_digest {
            Some(digest) => digest != &self.template.digest(),
            None => !self.template.zones.is_empty() || self.template.document_url.is_some(),
        }
    }

    fn next_zone_id(&mut self) -> String {
        loop {
            self.zone_seq += 1;
            let id = format!("{}-zone-{}", self.template.id, self.zone_seq);
            if self.template.zone(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PAGE_HEIGHT, PAGE_WIDTH};

    fn editor() -> ZoneEditor {
        ZoneEditor::new(SignatureTemplate::new("tpl", "Mandat de gestion"))
    }

    #[test]
    fn add_zone_applies_type_defaults() {
        let mut editor = editor();
        for (zone_type, size) in [
            (ZoneType::Signature, (200.0, 70.0)),
            (ZoneType::Initials, (60.0, 40.0)),
            (ZoneType::Date, (150.0, 30.0)),
            (ZoneType::Text, (200.0, 30.0)),
        ] {
            let zone = editor.add_zone(zone_type);
            assert_eq!((zone.width, zone.height), size);
            assert_eq!(zone.role, ZoneRole::Owner);
            assert!(zone.is_within_page());
        }
        let orders: Vec<i64> = editor.zones().iter().map(|z| z.sort_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn add_zone_selects_it_and_generates_unique_ids() {
        let mut editor = editor();
        let first = editor.add_zone(ZoneType::Text).id.clone();
        let second = editor.add_zone(ZoneType::Text).id.clone();
        assert_ne!(first, second);
        assert_eq!(editor.selected_zone().map(|z| z.id.as_str()), Some(second.as_str()));
    }

    #[test]
    fn remove_keeps_sort_order_gaps() {
        let mut editor = editor();
        let a = editor.add_zone(ZoneType::Signature).id.clone();
        editor.add_zone(ZoneType::Date);
        editor.remove_zone(&a).unwrap();
        assert_eq!(editor.zones()[0].sort_order, 2);
        assert!(editor.selected_zone().is_some());
        assert_eq!(editor.remove_zone(&a), Err(EditorError::ZoneNotFound(a)));
    }

    #[test]
    fn update_zone_clamps_every_time() {
        let mut editor = editor();
        let id = editor.add_zone(ZoneType::Signature).id.clone();
        let zone = editor.update_zone(&id, ZoneUpdate::position(-40.0, 900.0)).unwrap();
        assert_eq!(zone.x_position, 0.0);
        assert_eq!(zone.y_position, PAGE_HEIGHT - 70.0);

        let zone = editor.update_zone(&id, ZoneUpdate::size(800.0, 70.0)).unwrap();
        assert_eq!(zone.width, PAGE_WIDTH);
        assert_eq!(zone.x_position, 0.0);
    }

    #[test]
    fn update_zone_clamps_page_to_known_count() {
        let mut editor = editor();
        let id = editor.add_zone(ZoneType::Date).id.clone();
        editor.set_page_count(3);
        let update = ZoneUpdate {
            page_number: Some(9),
            ..Default::default()
        };
        assert_eq!(editor.update_zone(&id, update).unwrap().page_number, 3);
    }

    #[test]
    fn drag_translates_screen_delta_with_scale() {
        let mut editor = editor();
        let id = editor.add_zone(ZoneType::Initials).id.clone();
        let (x0, y0) = {
            let z = editor.zone(&id).unwrap();
            (z.x_position, z.y_position)
        };
        let scale = ScaleFactor::from_rendered_width(1190.0);
        editor.begin_drag(&id, ScreenPoint::new(100.0, 100.0)).unwrap();
        assert!(editor.is_dragging());
        editor.drag_to(ScreenPoint::new(140.0, 120.0), scale).unwrap();
        let zone = editor.zone(&id).unwrap();
        assert_eq!(zone.x_position, x0 + 20.0);
        assert_eq!(zone.y_position, y0 + 10.0);
        assert_eq!(editor.end_drag(), Some(DragOutcome { zone_id: id, moved: true }));
        assert!(!editor.is_dragging());
    }

    #[test]
    fn small_pointer_travel_is_a_click() {
        let mut editor = editor();
        let id = editor.add_zone(ZoneType::Text).id.clone();
        let before = editor.zone(&id).unwrap().clone();
        editor.begin_drag(&id, ScreenPoint::new(10.0, 10.0)).unwrap();
        editor
            .drag_to(ScreenPoint::new(11.0, 12.0), ScaleFactor::IDENTITY)
            .unwrap();
        assert_eq!(editor.zone(&id), Some(&before));
        assert_eq!(editor.end_drag().map(|o| o.moved), Some(false));
    }

    #[test]
    fn drag_cannot_leave_the_page() {
        let mut editor = editor();
        let id = editor.add_zone(ZoneType::Signature).id.clone();
        editor.begin_drag(&id, ScreenPoint::new(0.0, 0.0)).unwrap();
        editor
            .drag_to(ScreenPoint::new(5000.0, -5000.0), ScaleFactor::IDENTITY)
            .unwrap();
        let zone = editor.zone(&id).unwrap();
        assert_eq!(zone.x_position, PAGE_WIDTH - zone.width);
        assert_eq!(zone.y_position, 0.0);
    }

    #[test]
    fn page_navigation_requires_page_count() {
        let mut editor = editor();
        assert!(!editor.next_page());
        editor.set_page_count(2);
        assert!(editor.next_page());
        assert_eq!(editor.current_page(), 2);
        assert!(!editor.next_page());
        assert!(editor.previous_page());
        assert!(!editor.previous_page());
    }

    #[test]
    fn superseded_upload_is_ignored() {
        let mut editor = editor();
        let pdf = DocumentUpload {
            file_name: "mandat.pdf".into(),
            content_type: "application/pdf".into(),
            size: 1024,
        };
        let first = editor.begin_upload(&pdf).unwrap();
        let second = editor.begin_upload(&pdf).unwrap();
        assert_eq!(
            editor.finish_upload(first, Ok("/api/documents/old.pdf".into())),
            Err(EditorError::StaleUpload)
        );
        editor
            .finish_upload(second, Ok("/api/documents/new.pdf".into()))
            .unwrap();
        assert_eq!(
            editor.template().document_url.as_deref(),
            Some("/api/documents/new.pdf")
        );
        assert!(!editor.is_uploading());
    }

    #[test]
    fn failed_upload_keeps_previous_document() {
        let mut editor = editor();
        let pdf = DocumentUpload {
            file_name: "mandat.pdf".into(),
            content_type: "application/pdf".into(),
            size: 10,
        };
        let ticket = editor.begin_upload(&pdf).unwrap();
        let result = editor.finish_upload(ticket, Err(StorageError("bucket offline".into())));
        assert_eq!(result, Err(EditorError::UploadFailure("bucket offline".into())));
        assert_eq!(editor.template().document_url, None);
    }

    #[test]
    fn new_document_resets_pages() {
        let mut editor = editor();
        editor.set_page_count(4);
        editor.go_to_page(3);
        let pdf = DocumentUpload {
            file_name: "avenant.pdf".into(),
            content_type: "application/pdf".into(),
            size: 10,
        };
        let ticket = editor.begin_upload(&pdf).unwrap();
        editor.finish_upload(ticket, Ok("/api/documents/a.pdf".into())).unwrap();
        assert_eq!(editor.current_page(), 1);
        assert_eq!(editor.page_count(), None);
    }

    #[test]
    fn dirty_tracking_follows_saves() {
        let mut editor = ZoneEditor::from_saved(SignatureTemplate::new("tpl", "Mandat"));
        assert!(!editor.is_dirty());
        editor.add_zone(ZoneType::Text);
        assert!(editor.is_dirty());
        editor.mark_saved();
        assert!(!editor.is_dirty());
    }
}
