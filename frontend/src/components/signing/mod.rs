//! Signing page: walks the owner through preview, zone completion and
//! finalization of one session.
//!
//! The journey itself is `common::signing::SigningFlow`. Each step is first
//! confirmed by the backend, which replays it against its own copy of the
//! flow, and only then applied locally, so a page reload resumes exactly
//! where the server is.

use yew::platform::spawn_local;
use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::api;
pub use messages::Msg;
pub use props::SigningProps;
pub use state::SigningComponent;

impl Component for SigningComponent {
    type Message = Msg;
    type Properties = SigningProps;

    fn create(_ctx: &Context<Self>) -> Self {
        SigningComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            let link = ctx.link().clone();
            let session_id = ctx.props().session_id.clone();
            spawn_local(async move {
                let result = api::load_session(&session_id).await;
                link.send_message(Msg::Loaded(result));
            });
        }
    }
}
