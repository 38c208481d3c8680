//! Zone editor: places signature, initials, date and text zones on the pages
//! of a template document.
//!
//! Responsibilities
//! - Wire the Yew `Component` to `update::update` and `view::view`.
//! - On first render, load the template named by `template_id`, or start a
//!   new one, and tell the operator with a toast.
//! - Keep the page scale in sync with the rendered width of the page area.

use yew::platform::spawn_local;
use yew::prelude::*;

mod dialogs;
mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::api;
use crate::components::helpers::show_toast;
pub use messages::Msg;
pub use props::ZoneEditorProps;
pub use state::ZoneEditorComponent;

impl Component for ZoneEditorComponent {
    type Message = Msg;
    type Properties = ZoneEditorProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ZoneEditorComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if let Some(width) = self.measure_page_width() {
            ctx.link().send_message(Msg::Resized(width));
        }
        if first_render && !self.loaded {
            self.loaded = true;

            if let Some(template_id) = &ctx.props().template_id {
                let link = ctx.link().clone();
                let template_id = template_id.clone();
                spawn_local(async move {
                    match api::load_template(&template_id).await {
                        Ok(template) => {
                            link.send_message(Msg::SetTemplate(template));
                            show_toast("Modèle chargé.");
                        }
                        Err(e) => {
                            gloo_console::warn!(format!("template {}: {}", template_id, e));
                            show_toast("Modèle introuvable. Un nouveau modèle a été créé.");
                        }
                    }
                });
            } else {
                show_toast("Aucun modèle indiqué. Un nouveau modèle a été créé.");
            }
        }
    }
}
