//! View rendering for the signing page, one function per phase.

use common::geometry::{rect_to_screen, ScaleFactor};
use common::model::zone::{SignatureZone, ZoneType};
use common::signing::{Phase, SigningFlow, ZoneInput, ZoneState};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::{SigningComponent, PAGE_WIDTH_PX};
use crate::components::document_page::DocumentPage;
use crate::components::signature_pad::SignaturePad;

pub fn view(component: &SigningComponent, ctx: &Context<SigningComponent>) -> Html {
    let link = ctx.link();
    let body = match (&component.flow, &component.load_error) {
        (_, Some(error)) => html! {
            <div class="signing-card">
                <h2>{"Lien de signature invalide"}</h2>
                <p>{ error.clone() }</p>
            </div>
        },
        (None, None) => html! { <div class="signing-card">{"Chargement..."}</div> },
        (Some(flow), None) => match flow.phase() {
            Phase::Welcome => build_welcome(flow, link),
            Phase::Preview => build_preview(component, flow, link),
            Phase::Signing => build_signing(component, flow, link),
            Phase::Completed => build_completed(component, flow),
        },
    };
    html! { <div class="signing-root" style="max-width:960px;margin:0 auto;">{ body }</div> }
}

fn build_welcome(flow: &SigningFlow, link: &Scope<SigningComponent>) -> Html {
    let session = flow.session();
    let resumed = flow.completed_count() > 0;
    html! {
        <div class="signing-card">
            <h2>{ format!("Bonjour {}", session.owner_name) }</h2>
            <p>{ format!("Vous êtes invité(e) à signer « {} » pour le bien situé {}.", flow.template().name, session.property_address) }</p>
            <p>{ format!("{} zone(s) à compléter après lecture du document.", flow.owner_zones().len()) }</p>
            <button class="primary-btn" onclick={link.callback(|_| Msg::Start)}>
                { if resumed { "Reprendre la signature" } else { "Commencer" } }
            </button>
        </div>
    }
}

fn build_preview(component: &SigningComponent, flow: &SigningFlow, link: &Scope<SigningComponent>) -> Html {
    let document_url = flow.template().document_url.clone();
    let pages = flow.page_count().unwrap_or(1);
    let can_proceed = flow.can_proceed();
    html! {
        <>
            <div
                ref={component.preview_ref.clone()}
                class="document-preview"
                style="height:75vh;overflow-y:auto;background:#eee;padding:16px 0;"
                onscroll={link.callback(|_: Event| Msg::CheckScroll)}
            >
                { for (1..=pages).map(|page| html! {
                    <DocumentPage
                        document_url={document_url.clone()}
                        page_number={page}
                        width={PAGE_WIDTH_PX}
                        on_page_count={link.callback(Msg::PageCount)}
                    >
                        { zone_overlays(flow, page, None) }
                    </DocumentPage>
                }) }
            </div>
            <div class="signing-actions" style="display:flex;justify-content:space-between;align-items:center;margin-top:12px;">
                <span style="color:#777;">
                    { if can_proceed { "Document lu." } else { "Faites défiler le document jusqu'à la fin pour continuer." } }
                </span>
                <button class="primary-btn" disabled={!can_proceed} onclick={link.callback(|_| Msg::Proceed)}>
                    {"Continuer vers la signature"}
                </button>
            </div>
        </>
    }
}

fn build_signing(component: &SigningComponent, flow: &SigningFlow, link: &Scope<SigningComponent>) -> Html {
    let progress = flow.progress_percent();
    let chips = flow
        .zone_states()
        .enumerate()
        .map(|(index, (zone, state))| {
            let current = index == flow.current_index();
            let style = format!(
                "padding:4px 10px;border-radius:12px;border:1px solid {};background:{};cursor:pointer;",
                if current { "#1976d2" } else { "#ccc" },
                if state.is_completed() { "#e8f5e9" } else { "#fff" }
            );
            html! {
                <button style={style} onclick={link.callback(move |_| Msg::SelectZone(index))}>
                    { if state.is_completed() { "✓ " } else { "" } }
                    { zone.label.clone() }
                </button>
            }
        })
        .collect::<Html>();

    html! {
        <>
            <div class="signing-progress" style="margin-bottom:12px;">
                <div>{ format!("{} / {} zone(s) complétée(s)", flow.completed_count(), flow.owner_zones().len()) }</div>
                <div style="height:8px;background:#eee;border-radius:4px;">
                    <div style={format!("height:8px;width:{}%;background:#43a047;border-radius:4px;", progress)} />
                </div>
            </div>
            <div style="display:flex;flex-wrap:wrap;gap:6px;margin-bottom:12px;">{ chips }</div>
            {
                match (flow.current_zone(), flow.zone_state(flow.current_index())) {
                    (Some(zone), Some(state)) => build_zone_panel(component, flow, zone, state, link),
                    _ => html! { <p>{"Aucune zone à compléter."}</p> },
                }
            }
            <div class="signing-actions" style="display:flex;gap:8px;justify-content:space-between;margin-top:16px;">
                <div style="display:flex;gap:8px;">
                    <button onclick={link.callback(|_| Msg::PreviousZone)} disabled={flow.current_index() == 0}>{"Précédente"}</button>
                    <button
                        onclick={link.callback(|_| Msg::NextZone)}
                        disabled={flow.current_index() + 1 >= flow.owner_zones().len()}
                    >
                        {"Suivante"}
                    </button>
                    <button onclick={link.callback(|_| Msg::Review)}>{"Relire le document"}</button>
                </div>
                <button
                    class="primary-btn"
                    disabled={!flow.can_finalize() || component.busy}
                    onclick={link.callback(|_| Msg::Finalize)}
                >
                    { if component.busy { "Envoi..." } else { "Finaliser la signature" } }
                </button>
            </div>
        </>
    }
}

fn build_zone_panel(
    component: &SigningComponent,
    flow: &SigningFlow,
    zone: &SignatureZone,
    state: &ZoneState,
    link: &Scope<SigningComponent>,
) -> Html {
    let input = match state {
        ZoneState::Completed(value) if zone.zone_type.is_handwritten() => html! {
            <img src={value.clone()} style="max-width:320px;border:1px solid #eee;" alt={zone.label.clone()} />
        },
        ZoneState::Completed(value) => html! { <div class="completed-value">{ value.clone() }</div> },
        ZoneState::Incomplete if zone.zone_type.is_handwritten() => html! {
            <SignaturePad
                key={zone.id.clone()}
                zone_type={zone.zone_type}
                signer_name={flow.session().owner_name.clone()}
                disabled={component.busy}
                on_confirm={link.callback(Msg::SubmitZone)}
            />
        },
        ZoneState::Incomplete => {
            let zone_type = zone.zone_type;
            let submit = {
                let value = component.text_value.clone();
                link.callback(move |_| Msg::SubmitZone(ZoneInput::typed_in(zone_type, value.clone())))
            };
            let submit_on_enter = {
                let value = component.text_value.clone();
                link.batch_callback(move |e: KeyboardEvent| {
                    (e.key() == "Enter").then(|| Msg::SubmitZone(ZoneInput::typed_in(zone_type, value.clone())))
                })
            };
            html! {
                <div style="display:flex;gap:8px;">
                    <input
                        type="text"
                        value={component.text_value.clone()}
                        placeholder={if zone_type == ZoneType::Date { "jj/mm/aaaa" } else { "" }}
                        oninput={link.callback(|e: InputEvent| Msg::TextChanged(e.target_unchecked_into::<HtmlInputElement>().value()))}
                        onkeydown={submit_on_enter}
                    />
                    <button class="primary-btn" disabled={component.busy} onclick={submit}>{"Valider"}</button>
                </div>
            }
        }
    };

    html! {
        <div style="display:flex;gap:16px;align-items:flex-start;">
            <DocumentPage
                document_url={flow.template().document_url.clone()}
                page_number={zone.page_number}
                width={PAGE_WIDTH_PX * 0.6}
            >
                { zone_overlays(flow, zone.page_number, Some((zone.id.as_str(), PAGE_WIDTH_PX * 0.6))) }
            </DocumentPage>
            <div class="zone-input" style="flex:1;">
                <h3>{ zone.label.clone() }</h3>
                { input }
            </div>
        </div>
    }
}

fn build_completed(component: &SigningComponent, flow: &SigningFlow) -> Html {
    let signed_at = flow
        .session()
        .signed_at
        .map(|at| at.format("%d/%m/%Y à %H:%M UTC").to_string());
    html! {
        <div class="signing-card">
            <h2>{"Merci, le document est signé."}</h2>
            {
                match signed_at {
                    Some(at) => html! { <p>{ format!("Signé le {}.", at) }</p> },
                    None => html! {},
                }
            }
            {
                match &component.receipt {
                    Some(record) => html! { <p>{ format!("{} zone(s) enregistrée(s). Une confirmation vous sera envoyée.", record.zone_data.len()) }</p> },
                    None => html! {},
                }
            }
        </div>
    }
}

/// Outlines of the owner zones on `page`. `focus` highlights one zone and
/// overrides the page width used for scaling.
fn zone_overlays(flow: &SigningFlow, page: u32, focus: Option<(&str, f64)>) -> Html {
    let width = focus.map(|(_, w)| w).unwrap_or(PAGE_WIDTH_PX);
    let scale = ScaleFactor::from_rendered_width(width);
    flow.zone_states()
        .filter(|(zone, _)| zone.page_number == page)
        .map(|(zone, state)| {
            let rect = rect_to_screen(&zone.rect(), scale);
            let focused = focus.is_some_and(|(id, _)| id == zone.id);
            let color = match (focused, state.is_completed()) {
                (true, _) => "#1976d2",
                (false, true) => "#43a047",
                (false, false) => "#fb8c00",
            };
            let style = format!(
                "position:absolute;left:{:.1}px;top:{:.1}px;width:{:.1}px;height:{:.1}px;border:2px {} {};box-sizing:border-box;",
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                if focused { "solid" } else { "dashed" },
                color
            );
            html! { <div style={style} title={zone.label.clone()} /> }
        })
        .collect::<Html>()
}
