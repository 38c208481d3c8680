use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::zone_editor::{Msg, ZoneEditorComponent};
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

/// Dialog issuing a signing link for the saved template.
pub fn session_dialog(component: &ZoneEditorComponent, link: &Scope<ZoneEditorComponent>) -> Html {
    let form = &component.session_form;
    let text_input = |placeholder: &'static str, value: &str, to_msg: fn(String) -> Msg| {
        html! {
            <input
                type="text"
                placeholder={placeholder}
                value={value.to_string()}
                style="display:block;width:100%;margin-bottom:12px;padding:8px;"
                oninput={link.callback(move |e: InputEvent| to_msg(e.target_unchecked_into::<HtmlInputElement>().value()))}
            />
        }
    };

    html! {
        <YwMaterialTopSheet node_ref={component.session_dialog_ref.clone()}>
            <div style="position:fixed;top:0;left:0;width:100vw;height:100vh;background:rgba(0,0,0,0.85);z-index:9999;display:flex;flex-direction:column;align-items:center;justify-content:center;">
                <button
                    onclick={link.callback(|_| Msg::CloseSessionDialog)}
                    style="position:absolute;top:24px;right:32px;z-index:10000;padding:0.5rem 1rem;font-size:1.5rem;background:#fff;border:none;border-radius:4px;cursor:pointer;"
                >
                    { "✕" }
                </button>
                <div style="background:#fff;padding:24px;border-radius:8px;width:420px;">
                    <h3>{"Envoyer un lien de signature"}</h3>
                    { text_input("Nom du propriétaire", &form.owner_name, Msg::SetOwnerName) }
                    { text_input("Adresse du bien", &form.property_address, Msg::SetPropertyAddress) }
                    { text_input("Taux de commission (%)", &form.commission_rate, Msg::SetCommissionRate) }
                    <button
                        onclick={link.callback(|_| Msg::IssueSession)}
                        disabled={form.issuing}
                        style="padding:0.5rem 1rem;background:#1976d2;color:#fff;border:none;border-radius:4px;cursor:pointer;"
                    >
                        { if form.issuing { "Création..." } else { "Créer le lien" } }
                    </button>
                    {
                        if let Some(url) = &form.issued_link {
                            html! {
                                <div style="margin-top:16px;">
                                    <div>{"Lien à transmettre au propriétaire :"}</div>
                                    <a href={url.clone()} target="_blank" style="word-break:break-all;">{ url.clone() }</a>
                                </div>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}
