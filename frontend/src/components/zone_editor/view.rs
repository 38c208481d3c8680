//! View rendering for the zone editor.
//!
//! Layout: a toolbar on top, the current page with its zones on the left and
//! the properties of the selected zone on the right. Zones are drawn from
//! their logical rectangle through the current `ScaleFactor`, so the page can
//! be resized without touching the template.

use common::geometry::rect_to_screen;
use common::model::zone::{SignatureZone, ZoneRole, ZoneType, ZoneUpdate, FIELD_KEYS};
use web_sys::{HtmlInputElement, HtmlSelectElement, PointerEvent};
use yew::html::Scope;
use yew::prelude::*;

use super::dialogs::session::session_dialog;
use super::messages::Msg;
use super::state::ZoneEditorComponent;
use crate::components::document_page::DocumentPage;

pub fn view(component: &ZoneEditorComponent, ctx: &Context<ZoneEditorComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="zone-editor-root">
            { build_toolbar(component, link) }
            <div style="display:flex;align-items:flex-start;gap:16px;">
                <div style="flex:1;min-width:0;">
                    { build_page_nav(component, link) }
                    { build_page_area(component, link) }
                </div>
                <div class="zone-properties" style="width:300px;">
                    { build_properties(component, link) }
                    { build_zone_summary(component) }
                </div>
            </div>
            { session_dialog(component, link) }
        </div>
    }
}

fn build_toolbar(component: &ZoneEditorComponent, link: &Scope<ZoneEditorComponent>) -> Html {
    let template = component.editor.template();
    let dirty = component.editor.is_dirty();
    html! {
        <div class="icon-toolbar">
            { icon_button("draw", "Signature", link.callback(|_| Msg::AddZone(ZoneType::Signature)), false) }
            { icon_button("gesture", "Paraphe", link.callback(|_| Msg::AddZone(ZoneType::Initials)), false) }
            { icon_button("event", "Date", link.callback(|_| Msg::AddZone(ZoneType::Date)), false) }
            { icon_button("text_fields", "Texte", link.callback(|_| Msg::AddZone(ZoneType::Text)), false) }
            { icon_button("upload_file", "PDF", link.callback(|_| Msg::OpenFileDialog), false) }
            <input
                type="file"
                accept="application/pdf"
                style="display:none;"
                ref={component.file_input_ref.clone()}
                onchange={link.batch_callback(|e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    input.files().and_then(|files| files.get(0)).map(Msg::FileSelected)
                })}
            />
            <button class="icon-btn" onclick={link.callback(|_| Msg::Save)} disabled={component.saving} style="position:relative;">
                <i class="material-icons">{"save"}</i>
                <span class="icon-label">{"Enregistrer"}</span>
                {
                    if dirty {
                        html! {
                            <span
                                title="Modifications non enregistrées"
                                style="position:absolute;top:4px;right:6px;width:8px;height:8px;background:#e53935;border-radius:50%;"
                            />
                        }
                    } else {
                        html! {}
                    }
                }
            </button>
            { icon_button("send", "Lien de signature", link.callback(|_| Msg::OpenSessionDialog), true) }
            <input
                type="text"
                class="template-name"
                placeholder="Nom du modèle"
                value={template.name.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetName(e.target_unchecked_into::<HtmlInputElement>().value()))}
            />
            <input
                type="text"
                class="template-property"
                placeholder="Bien concerné"
                value={template.property_name.clone().unwrap_or_default()}
                oninput={link.callback(|e: InputEvent| Msg::SetPropertyName(e.target_unchecked_into::<HtmlInputElement>().value()))}
            />
        </div>
    }
}

fn build_page_nav(component: &ZoneEditorComponent, link: &Scope<ZoneEditorComponent>) -> Html {
    let editor = &component.editor;
    let count = editor
        .page_count()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    let has_next = editor.page_count().is_some_and(|c| editor.current_page() < c);
    html! {
        <div class="page-nav" style="display:flex;align-items:center;justify-content:center;gap:8px;margin-bottom:8px;">
            <button onclick={link.callback(|_| Msg::PreviousPage)} disabled={editor.current_page() <= 1}>
                <i class="material-icons">{"chevron_left"}</i>
            </button>
            <span>{ format!("Page {} / {}", editor.current_page(), count) }</span>
            <button onclick={link.callback(|_| Msg::NextPage)} disabled={!has_next}>
                <i class="material-icons">{"chevron_right"}</i>
            </button>
            {
                if editor.is_uploading() {
                    html! { <span style="color:#777;">{"Import en cours..."}</span> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn build_page_area(component: &ZoneEditorComponent, link: &Scope<ZoneEditorComponent>) -> Html {
    let editor = &component.editor;
    let zones = editor
        .zones_on_current_page()
        .into_iter()
        .map(|zone| build_zone(component, zone, link))
        .collect::<Html>();

    html! {
        <div
            ref={component.page_ref.clone()}
            style="width:100%;max-width:900px;margin:0 auto;user-select:none;"
            onpointermove={link.callback(|e: PointerEvent| Msg::PointerMove { x: e.client_x() as f64, y: e.client_y() as f64 })}
            onpointerup={link.callback(|_: PointerEvent| Msg::PointerUp)}
            onpointerleave={link.callback(|_: PointerEvent| Msg::PointerUp)}
            onpointerdown={link.callback(|_: PointerEvent| Msg::SelectZone(None))}
        >
            <DocumentPage
                document_url={editor.template().document_url.clone()}
                page_number={editor.current_page()}
                width={component.page_width}
                on_page_count={link.callback(Msg::PageCount)}
            >
                { zones }
            </DocumentPage>
        </div>
    }
}

fn build_zone(component: &ZoneEditorComponent, zone: &SignatureZone, link: &Scope<ZoneEditorComponent>) -> Html {
    let rect = rect_to_screen(&zone.rect(), component.scale());
    let selected = component
        .editor
        .selected_zone()
        .is_some_and(|s| s.id == zone.id);
    let (border, fill) = match zone.role {
        ZoneRole::Owner => ("#1976d2", "rgba(25,118,210,0.12)"),
        ZoneRole::Conciergerie => ("#ef6c00", "rgba(239,108,0,0.12)"),
    };
    let style = format!(
        "position:absolute;left:{:.1}px;top:{:.1}px;width:{:.1}px;height:{:.1}px;border:{}px solid {};background:{};cursor:move;font-size:12px;overflow:hidden;box-sizing:border-box;padding:2px 4px;",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        if selected { 2 } else { 1 },
        border,
        fill
    );
    let zone_id = zone.id.clone();
    html! {
        <div
            class="signature-zone"
            style={style}
            title={zone.label.clone()}
            onpointerdown={link.callback(move |e: PointerEvent| {
                e.stop_propagation();
                e.prevent_default();
                Msg::PointerDown { zone_id: zone_id.clone(), x: e.client_x() as f64, y: e.client_y() as f64 }
            })}
        >
            { format!("{}{}", zone.label, if zone.is_required { " *" } else { "" }) }
        </div>
    }
}

fn build_properties(component: &ZoneEditorComponent, link: &Scope<ZoneEditorComponent>) -> Html {
    let Some(zone) = component.editor.selected_zone() else {
        return html! { <p style="color:#777;">{"Sélectionnez une zone pour la modifier."}</p> };
    };
    let id = zone.id.clone();

    let on_label = {
        let id = id.clone();
        link.callback(move |e: InputEvent| {
            let label = e.target_unchecked_into::<HtmlInputElement>().value();
            Msg::UpdateZone(id.clone(), ZoneUpdate { label: Some(label), ..Default::default() })
        })
    };
    let on_type = {
        let id = id.clone();
        link.batch_callback(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            ZoneType::parse(&value).map(|zone_type| {
                let (width, height) = zone_type.default_size();
                Msg::UpdateZone(
                    id.clone(),
                    ZoneUpdate {
                        zone_type: Some(zone_type),
                        width: Some(width),
                        height: Some(height),
                        ..Default::default()
                    },
                )
            })
        })
    };
    let on_role = {
        let id = id.clone();
        link.batch_callback(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            ZoneRole::parse(&value).map(|role| Msg::UpdateZone(id.clone(), ZoneUpdate::role(role)))
        })
    };
    let on_required = {
        let id = id.clone();
        link.callback(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            Msg::UpdateZone(id.clone(), ZoneUpdate { is_required: Some(checked), ..Default::default() })
        })
    };
    let on_field_key = {
        let id = id.clone();
        link.callback(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let field_key = (!value.is_empty()).then_some(value);
            Msg::UpdateZone(id.clone(), ZoneUpdate { field_key: Some(field_key), ..Default::default() })
        })
    };
    let number_input = |label: &'static str, value: f64, make: fn(f64) -> ZoneUpdate| {
        let id = id.clone();
        html! {
            <label style="display:block;">
                { label }
                <input
                    type="number"
                    step="1"
                    value={format!("{:.0}", value)}
                    onchange={link.batch_callback(move |e: Event| {
                        e.target_unchecked_into::<HtmlInputElement>()
                            .value()
                            .parse::<f64>()
                            .ok()
                            .map(|v| Msg::UpdateZone(id.clone(), make(v)))
                    })}
                />
            </label>
        }
    };
    let remove = {
        let id = id.clone();
        link.callback(move |_| Msg::RemoveZone(id.clone()))
    };

    html! {
        <div class="zone-form">
            <label style="display:block;">
                {"Libellé"}
                <input type="text" value={zone.label.clone()} oninput={on_label} />
            </label>
            <label style="display:block;">
                {"Type"}
                <select onchange={on_type}>
                    { for ZoneType::ALL.iter().map(|t| html! {
                        <option value={t.as_str()} selected={*t == zone.zone_type}>{ t.default_label() }</option>
                    }) }
                </select>
            </label>
            <label style="display:block;">
                {"Signataire"}
                <select onchange={on_role}>
                    <option value="owner" selected={zone.role == ZoneRole::Owner}>{"Propriétaire"}</option>
                    <option value="conciergerie" selected={zone.role == ZoneRole::Conciergerie}>{"Conciergerie"}</option>
                </select>
            </label>
            { number_input("X", zone.x_position, |v| ZoneUpdate { x_position: Some(v), ..Default::default() }) }
            { number_input("Y", zone.y_position, |v| ZoneUpdate { y_position: Some(v), ..Default::default() }) }
            { number_input("Largeur", zone.width, |v| ZoneUpdate { width: Some(v), ..Default::default() }) }
            { number_input("Hauteur", zone.height, |v| ZoneUpdate { height: Some(v), ..Default::default() }) }
            { number_input("Page", zone.page_number as f64, |v| ZoneUpdate { page_number: Some(v.max(1.0) as u32), ..Default::default() }) }
            <label style="display:block;">
                <input type="checkbox" checked={zone.is_required} onchange={on_required} />
                {"Obligatoire"}
            </label>
            {
                if zone.zone_type.accepts_field_key() {
                    html! {
                        <label style="display:block;">
                            {"Remplissage automatique"}
                            <select onchange={on_field_key}>
                                <option value="" selected={zone.field_key.is_none()}>{"Aucun"}</option>
                                { for FIELD_KEYS.iter().map(|key| html! {
                                    <option value={*key} selected={zone.field_key.as_deref() == Some(*key)}>{ field_key_label(key) }</option>
                                }) }
                            </select>
                        </label>
                    }
                } else {
                    html! {}
                }
            }
            <button
                style="margin-top:12px;padding:0.5rem 1rem;background:#d32f2f;color:#fff;border:none;border-radius:4px;cursor:pointer;"
                onclick={remove}
            >
                { "Supprimer la zone" }
            </button>
        </div>
    }
}

fn build_zone_summary(component: &ZoneEditorComponent) -> Html {
    let template = component.editor.template();
    let beyond = component.editor.zones_beyond_document();
    html! {
        <div class="zone-summary" style="margin-top:16px;color:#555;font-size:13px;">
            <div>{ format!("Propriétaire : {} zone(s)", template.owner_zones().len()) }</div>
            <div>{ format!("Conciergerie : {} zone(s)", template.conciergerie_zones().len()) }</div>
            {
                if beyond.is_empty() {
                    html! {}
                } else {
                    html! {
                        <div style="color:#e53935;">
                            { format!("Hors document : {}", beyond.iter().map(|z| z.label.as_str()).collect::<Vec<_>>().join(", ")) }
                        </div>
                    }
                }
            }
        </div>
    }
}

fn field_key_label(key: &str) -> &'static str {
    match key {
        "owner_name" => "Nom du propriétaire",
        "property_address" => "Adresse du bien",
        "commission_rate" => "Taux de commission",
        "today" => "Date du jour",
        _ => "Autre",
    }
}

/// Renders a toolbar button with a Material icon and a label.
fn icon_button(icon_name: &str, label: &str, on_click: Callback<MouseEvent>, wide: bool) -> Html {
    let class = if wide { "icon-btn wide" } else { "icon-btn" };
    html! {
        <button class={class} onclick={on_click}>
            <i class="material-icons">{icon_name}</i>
            <span class="icon-label">{label}</span>
        </button>
    }
}
