//! One rasterized page of a template document with an overlay slot.
//!
//! The page is requested from the rasterization service whenever the
//! `(document_url, page_number)` pair changes. Answers for a pair that is no
//! longer displayed are dropped by `PageRender::resolve`, so a slow render of
//! an old document never replaces the current one. Failures show a
//! placeholder in the page aspect ratio; the overlay stays usable either way.

use common::render::{PageRender, RenderError, RenderKey, RenderedPage};
use gloo_console::warn;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;

#[derive(Properties, PartialEq, Clone)]
pub struct DocumentPageProps {
    pub document_url: Option<String>,
    #[prop_or(1)]
    pub page_number: u32,
    /// Display width in CSS pixels.
    pub width: f64,
    /// Called with the document's page count after each successful render.
    #[prop_or_default]
    pub on_page_count: Callback<u32>,
    /// Absolutely positioned content drawn over the page (zones).
    #[prop_or_default]
    pub children: Html,
}

pub enum Msg {
    Resolved(RenderKey, Result<RenderedPage, RenderError>),
}

pub struct DocumentPage {
    render: PageRender,
}

fn key_of(props: &DocumentPageProps) -> Option<RenderKey> {
    props
        .document_url
        .as_ref()
        .map(|url| RenderKey::new(url.clone(), props.page_number))
}

impl DocumentPage {
    fn request(&mut self, ctx: &Context<Self>) {
        self.render = PageRender::request(key_of(ctx.props()));
        if let Some(key) = self.render.key().cloned() {
            let link = ctx.link().clone();
            // Twice the display width keeps the raster sharp on dense screens
            let target_width = (ctx.props().width * 2.0).round() as u32;
            spawn_local(async move {
                let result = api::render_page(&key, target_width).await;
                link.send_message(Msg::Resolved(key, result));
            });
        }
    }
}

impl Component for DocumentPage {
    type Message = Msg;
    type Properties = DocumentPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut page = DocumentPage {
            render: PageRender::Blank,
        };
        page.request(ctx);
        page
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Resolved(key, result) => {
                if let Err(error) = &result {
                    warn!(format!("page {} of {}: {}", key.page_number, key.document_url, error));
                }
                if !self.render.resolve(&key, result) {
                    return false;
                }
                if let Some(total) = self.render.total_pages() {
                    ctx.props().on_page_count.emit(total);
                }
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        if self.render.key() != key_of(ctx.props()).as_ref() {
            self.request(ctx);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let width = ctx.props().width;
        let height = self.render.display_height(width);
        let frame = format!(
            "position:relative;width:{:.0}px;height:{:.0}px;background:#fff;box-shadow:0 0 8px #ccc;margin:0 auto 16px auto;",
            width, height
        );
        let layer = "position:absolute;top:0;left:0;width:100%;height:100%;";

        let page = match &self.render {
            PageRender::Blank => html! {},
            PageRender::Loading(_) => html! {
                <div style={format!("{}display:flex;align-items:center;justify-content:center;", layer)}>
                    <div class="spin" style="width:36px;height:36px;border:5px solid #ccc;border-top-color:#1976d2;border-radius:50%;animation:spin 1s linear infinite;"></div>
                </div>
            },
            PageRender::Ready(rendered) => html! {
                <img src={rendered.image_url.clone()} style={layer} draggable="false" />
            },
            PageRender::Failed { error, .. } => {
                let message = match error {
                    RenderError::DocumentUnreachable(_) => "Impossible de charger le document".to_string(),
                    RenderError::PageOutOfRange { page, total_pages } => {
                        format!("La page {} n'existe pas (le document en compte {})", page, total_pages)
                    }
                };
                html! {
                    <div style={format!("{}display:flex;align-items:center;justify-content:center;color:#999;background:#f5f5f5;", layer)}>
                        { message }
                    </div>
                }
            }
        };

        html! {
            <div class="document-page" style={frame}>
                { page }
                <div style={layer}>{ ctx.props().children.clone() }</div>
            </div>
        }
    }
}
