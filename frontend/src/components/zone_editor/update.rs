//! Update function for the zone editor component.
//!
//! Every template mutation goes through `ZoneEditor`, which keeps zones inside
//! the page; this module only sequences the asynchronous work (upload, save,
//! session issuing) and reports results with toasts.

use common::editor::DocumentUpload;
use common::error::{EditorError, StorageError};
use common::geometry::ScreenPoint;
use common::requests::CreateSessionRequest;
use std::collections::BTreeMap;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::helpers::{set_window_dirty_flag, show_toast};
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::messages::Msg;
use super::state::ZoneEditorComponent;

/// Central update function.
///
/// Returns `true` to re-render the view, `false` when only side effects occur.
pub fn update(component: &mut ZoneEditorComponent, ctx: &Context<ZoneEditorComponent>, msg: Msg) -> bool {
    let render = match msg {
        Msg::SetTemplate(template) => {
            component.editor = common::editor::ZoneEditor::from_saved(template);
            true
        }
        Msg::SetName(name) => {
            component.editor.set_name(name);
            true
        }
        Msg::SetPropertyName(name) => {
            component.editor.set_property_name(Some(name));
            true
        }
        Msg::AddZone(zone_type) => {
            component.editor.add_zone(zone_type);
            true
        }
        Msg::RemoveZone(zone_id) => {
            if let Err(e) = component.editor.remove_zone(&zone_id) {
                show_toast(&e.to_string());
            }
            true
        }
        Msg::SelectZone(zone_id) => {
            component.editor.select_zone(zone_id.as_deref());
            true
        }
        Msg::UpdateZone(zone_id, update) => {
            if let Err(e) = component.editor.update_zone(&zone_id, update) {
                show_toast(&e.to_string());
            }
            true
        }
        Msg::PointerDown { zone_id, x, y } => component
            .editor
            .begin_drag(&zone_id, ScreenPoint::new(x, y))
            .is_ok(),
        Msg::PointerMove { x, y } => {
            if !component.editor.is_dragging() {
                return false;
            }
            let scale = component.scale();
            component
                .editor
                .drag_to(ScreenPoint::new(x, y), scale)
                .is_ok()
        }
        Msg::PointerUp => component.editor.end_drag().is_some(),
        Msg::Resized(width) => {
            component.page_width = width;
            true
        }
        Msg::PageCount(count) => {
            let known = component.editor.page_count();
            component.editor.set_page_count(count);
            let beyond = component.editor.zones_beyond_document().len();
            if known != Some(count) && beyond > 0 {
                show_toast(&format!(
                    "{} zone(s) sont placées après la dernière page du document.",
                    beyond
                ));
            }
            known != Some(count)
        }
        Msg::NextPage => component.editor.next_page(),
        Msg::PreviousPage => component.editor.previous_page(),
        Msg::OpenFileDialog => {
            if let Some(input) = component.file_input_ref.cast::<web_sys::HtmlInputElement>() {
                input.click();
            }
            false
        }
        Msg::FileSelected(file) => {
            let upload = DocumentUpload {
                file_name: file.name(),
                content_type: file.type_(),
                size: file.size() as u64,
            };
            match component.editor.begin_upload(&upload) {
                Ok(ticket) => {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let result = api::upload_document(&file).await;
                        link.send_message(Msg::UploadFinished(ticket, result));
                    });
                }
                Err(EditorError::InvalidDocumentType { .. }) => {
                    show_toast("Seuls les fichiers PDF sont acceptés.");
                }
                Err(e) => show_toast(&e.to_string()),
            }
            // Lets the same file be picked again
            if let Some(input) = component.file_input_ref.cast::<web_sys::HtmlInputElement>() {
                input.set_value("");
            }
            true
        }
        Msg::UploadFinished(ticket, result) => {
            match component.editor.finish_upload(ticket, result.map_err(StorageError)) {
                Ok(()) => show_toast("Document importé."),
                Err(EditorError::StaleUpload) => {}
                Err(e) => show_toast(&format!("Échec de l'import : {}", e)),
            }
            true
        }
        Msg::Save => {
            if component.saving {
                return false;
            }
            if let Err(e) = component.editor.template().validate() {
                show_toast(&format!("Modèle invalide : {}", e));
                return false;
            }
            component.saving = true;
            let template = component.editor.template().clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::save_template(&template).await;
                link.send_message(Msg::SaveFinished(result));
            });
            true
        }
        Msg::SaveFinished(result) => {
            component.saving = false;
            match result {
                Ok(()) => {
                    component.editor.mark_saved();
                    show_toast("Modèle enregistré.");
                }
                Err(e) => show_toast(&format!("Erreur lors de l'enregistrement : {}", e)),
            }
            true
        }
        Msg::OpenSessionDialog => {
            if component.editor.is_dirty() {
                show_toast("Enregistrez le modèle avant d'envoyer un lien de signature.");
                return false;
            }
            if component.editor.template().owner_zones().is_empty() {
                show_toast("Ajoutez au moins une zone pour le propriétaire.");
                return false;
            }
            component.session_form.issued_link = None;
            open_top_sheet(component.session_dialog_ref.clone());
            true
        }
        Msg::SetOwnerName(value) => {
            component.session_form.owner_name = value;
            true
        }
        Msg::SetPropertyAddress(value) => {
            component.session_form.property_address = value;
            true
        }
        Msg::SetCommissionRate(value) => {
            component.session_form.commission_rate = value;
            true
        }
        Msg::IssueSession => {
            let form = &component.session_form;
            if form.issuing {
                return false;
            }
            if form.owner_name.trim().is_empty() || form.property_address.trim().is_empty() {
                show_toast("Le nom du propriétaire et l'adresse sont obligatoires.");
                return false;
            }
            let commission_rate = match form.commission_rate.trim() {
                "" => None,
                raw => match raw.replace(',', ".").parse::<f64>() {
                    Ok(rate) => Some(rate),
                    Err(_) => {
                        show_toast("Taux de commission invalide.");
                        return false;
                    }
                },
            };
            let request = CreateSessionRequest {
                template_id: component.editor.template().id.clone(),
                owner_name: form.owner_name.trim().to_string(),
                property_address: form.property_address.trim().to_string(),
                commission_rate,
                field_values: BTreeMap::new(),
            };
            component.session_form.issuing = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::create_session(&request).await;
                link.send_message(Msg::SessionIssued(result));
            });
            true
        }
        Msg::SessionIssued(result) => {
            component.session_form.issuing = false;
            match result {
                Ok(response) => {
                    let origin = web_sys::window()
                        .and_then(|w| w.location().origin().ok())
                        .unwrap_or_default();
                    component.session_form.issued_link = Some(format!("{}{}", origin, response.signing_path));
                }
                Err(e) => show_toast(&format!("Impossible de créer le lien : {}", e)),
            }
            true
        }
        Msg::CloseSessionDialog => {
            close_top_sheet(component.session_dialog_ref.clone());
            component.session_form = Default::default();
            true
        }
    };

    set_window_dirty_flag(component.editor.is_dirty());
    render
}
