//! Runtime state of the zone editor.
//!
//! The template itself and every rule about it live in
//! `common::editor::ZoneEditor`; this struct adds the DOM references and the
//! measured page width the view needs.

use common::editor::ZoneEditor;
use common::geometry::ScaleFactor;
use common::model::template::SignatureTemplate;
use yew::prelude::*;

/// Width used until the page area has been measured.
pub const DEFAULT_PAGE_WIDTH: f64 = 700.0;

/// Signer details typed in the "issue a signing link" dialog.
#[derive(Default, Clone)]
pub struct SessionForm {
    pub owner_name: String,
    pub property_address: String,
    pub commission_rate: String,
    pub issued_link: Option<String>,
    pub issuing: bool,
}

pub struct ZoneEditorComponent {
    pub editor: ZoneEditor,
    /// Rendered width of the page area in CSS pixels.
    pub page_width: f64,
    pub page_ref: NodeRef,
    pub file_input_ref: NodeRef,
    pub session_dialog_ref: NodeRef,
    pub session_form: SessionForm,
    pub saving: bool,
    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl ZoneEditorComponent {
    pub fn new() -> Self {
        Self {
            editor: ZoneEditor::new(SignatureTemplate::new(
                uuid::Uuid::new_v4().to_string(),
                "Nouveau mandat",
            )),
            page_width: DEFAULT_PAGE_WIDTH,
            page_ref: NodeRef::default(),
            file_input_ref: NodeRef::default(),
            session_dialog_ref: NodeRef::default(),
            session_form: SessionForm::default(),
            saving: false,
            loaded: false,
        }
    }

    pub fn scale(&self) -> ScaleFactor {
        ScaleFactor::from_rendered_width(self.page_width)
    }

    /// Current width of the page area, when it differs from the last one seen.
    pub fn measure_page_width(&self) -> Option<f64> {
        let element = self.page_ref.cast::<web_sys::Element>()?;
        let width = element.get_bounding_client_rect().width();
        (width > 0.0 && (width - self.page_width).abs() > 0.5).then_some(width)
    }
}
