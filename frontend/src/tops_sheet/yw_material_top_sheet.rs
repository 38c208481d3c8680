use uuid::Uuid;
use web_sys::js_sys;
use yew::{html, Component, Context, Html, NodeRef, Properties};

/// Sliding panel used for the editor and signing dialogs. Shown by adding
/// the `show` class with [`open_top_sheet`].
pub struct YwMaterialTopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="top-sheet" id={self.id.clone()} ref={ctx.props().node_ref.clone()}>
                { ctx.props().children.clone() }
            </div>
        }
    }
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle_show(top_sheet_ref, "add");
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle_show(top_sheet_ref, "remove");
}

fn toggle_show(top_sheet_ref: NodeRef, method: &str) {
    if let (Some(top_sheet), Some(window)) = (top_sheet_ref.cast::<web_sys::HtmlElement>(), web_sys::window()) {
        let func = js_sys::Function::new_no_args(&format!(
            "document.querySelector('#{}').classList.{}('show')",
            top_sheet.id(),
            method
        ));
        // Deferred so the sheet is mounted before the transition starts
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&func, 50);
    }
}
