use crate::components::signing::SigningComponent;
use crate::components::zone_editor::ZoneEditorComponent;
use web_sys::UrlSearchParams;
use yew::{html, Component, Context, Html};

/// `/sign/{session_id}` opens the signing page; anything else the zone
/// editor, on the template named by `?template=` when present.
pub enum Route {
    Editor { template_id: Option<String> },
    Signing { session_id: String },
}

impl Route {
    fn current() -> Route {
        let location = web_sys::window().map(|w| w.location());
        let path = location
            .as_ref()
            .and_then(|l| l.pathname().ok())
            .unwrap_or_default();
        let search = location
            .as_ref()
            .and_then(|l| l.search().ok())
            .unwrap_or_default();
        Route::parse(&path, &search)
    }

    fn parse(path: &str, search: &str) -> Route {
        if let Some(session_id) = path.strip_prefix("/sign/").filter(|id| !id.is_empty()) {
            return Route::Signing {
                session_id: session_id.trim_end_matches('/').to_string(),
            };
        }
        let template_id = UrlSearchParams::new_with_str(search)
            .ok()
            .and_then(|params| params.get("template"))
            .filter(|id| !id.is_empty());
        Route::Editor { template_id }
    }
}

pub struct App {
    route: Route,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            route: Route::current(),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        match &self.route {
            Route::Editor { template_id } => html! {
                <div>
                    <ZoneEditorComponent template_id={template_id.clone()} />
                </div>
            },
            Route::Signing { session_id } => html! {
                <div>
                    <SigningComponent session_id={session_id.clone()} />
                </div>
            },
        }
    }
}
