//! Runtime state of the signing page.

use common::error::ArchiveError;
use common::model::session::FinalizedSignature;
use common::signing::{SignatureArchive, SigningFlow};
use yew::prelude::*;

use crate::components::helpers::today;

/// Width of the document pages on the signing page.
pub const PAGE_WIDTH_PX: f64 = 640.0;

pub struct SigningComponent {
    pub flow: Option<SigningFlow>,
    pub load_error: Option<String>,
    /// Scroll container of the document preview.
    pub preview_ref: NodeRef,
    /// Value of the text or date input of the focused zone.
    pub text_value: String,
    /// A zone or the finalize request is in flight.
    pub busy: bool,
    pub receipt: Option<FinalizedSignature>,
    pub loaded: bool,
}

impl SigningComponent {
    pub fn new() -> Self {
        Self {
            flow: None,
            load_error: None,
            preview_ref: NodeRef::default(),
            text_value: String::new(),
            busy: false,
            receipt: None,
            loaded: false,
        }
    }

    /// Resets the text input to the default of the focused zone.
    pub fn refresh_text_value(&mut self) {
        self.text_value = self
            .flow
            .as_ref()
            .and_then(|flow| {
                let zone = flow.current_zone()?;
                flow.default_input(&zone.id, today())
            })
            .unwrap_or_default();
    }
}

/// Local end of finalize: the server already archived the record, this only
/// checks it kept the values the signer saw.
pub struct ServerReceipt<'a> {
    pub confirmed: &'a FinalizedSignature,
}

impl SignatureArchive for ServerReceipt<'_> {
    fn archive(&mut self, record: &FinalizedSignature) -> Result<(), ArchiveError> {
        if record.session_id == self.confirmed.session_id && record.zone_data == self.confirmed.zone_data {
            Ok(())
        } else {
            Err(ArchiveError(
                "le serveur a enregistré des valeurs différentes".to_string(),
            ))
        }
    }
}
