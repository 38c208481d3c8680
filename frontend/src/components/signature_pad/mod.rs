//! Signature capture for signature and initials zones.
//!
//! Two modes: drawing with the pointer on a canvas, or typing a name that is
//! rendered in a script font. Both produce a PNG data URL.

use common::model::zone::ZoneType;
use common::signing::ZoneInput;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, PointerEvent};
use yew::prelude::*;

use crate::components::helpers::show_toast;

const CANVAS_WIDTH: u32 = 480;
const CANVAS_HEIGHT: u32 = 170;
const SCRIPT_FONT: &str = "'Dancing Script', 'Brush Script MT', cursive";

#[derive(Clone, Copy, PartialEq)]
pub enum Mode {
    Draw,
    Type,
}

#[derive(Properties, PartialEq, Clone)]
pub struct SignaturePadProps {
    pub zone_type: ZoneType,
    /// Pre-filled typed name.
    #[prop_or_default]
    pub signer_name: String,
    #[prop_or_default]
    pub disabled: bool,
    pub on_confirm: Callback<ZoneInput>,
}

pub enum Msg {
    SetMode(Mode),
    PointerDown(f64, f64),
    PointerMove(f64, f64),
    PointerUp,
    Clear,
    TypedName(String),
    Confirm,
}

pub struct SignaturePad {
    mode: Mode,
    canvas_ref: NodeRef,
    drawing: bool,
    has_ink: bool,
    typed_name: String,
}

impl SignaturePad {
    fn context(&self) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas = self.canvas_ref.cast::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some((canvas, context))
    }

    fn clear(&mut self) {
        if let Some((_, context)) = self.context() {
            context.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        }
        self.has_ink = false;
    }

    /// Draws the typed name centered on the canvas.
    fn render_typed(&self, zone_type: ZoneType) -> Option<String> {
        let (canvas, context) = self.context()?;
        context.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        let size = if zone_type == ZoneType::Initials { 72 } else { 48 };
        context.set_font(&format!("{}px {}", size, SCRIPT_FONT));
        context.set_fill_style_str("#0d1b4c");
        context.set_text_align("center");
        context.set_text_baseline("middle");
        context
            .fill_text(
                &self.typed_name,
                CANVAS_WIDTH as f64 / 2.0,
                CANVAS_HEIGHT as f64 / 2.0,
            )
            .ok()?;
        canvas.to_data_url().ok()
    }
}

/// Initials of a full name: "Claire Martin" → "CM".
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

impl Component for SignaturePad {
    type Message = Msg;
    type Properties = SignaturePadProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let typed_name = if props.zone_type == ZoneType::Initials {
            initials(&props.signer_name)
        } else {
            props.signer_name.clone()
        };
        SignaturePad {
            mode: Mode::Draw,
            canvas_ref: NodeRef::default(),
            drawing: false,
            has_ink: false,
            typed_name,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetMode(mode) => {
                self.mode = mode;
                self.drawing = false;
                self.clear();
                true
            }
            Msg::PointerDown(x, y) => {
                if self.mode != Mode::Draw || ctx.props().disabled {
                    return false;
                }
                if let Some((_, context)) = self.context() {
                    context.set_line_width(2.5);
                    context.set_line_cap("round");
                    context.set_line_join("round");
                    context.set_stroke_style_str("#0d1b4c");
                    context.begin_path();
                    context.move_to(x, y);
                    self.drawing = true;
                }
                false
            }
            Msg::PointerMove(x, y) => {
                if !self.drawing {
                    return false;
                }
                if let Some((_, context)) = self.context() {
                    context.line_to(x, y);
                    context.stroke();
                    if !self.has_ink {
                        self.has_ink = true;
                        return true;
                    }
                }
                false
            }
            Msg::PointerUp => {
                self.drawing = false;
                false
            }
            Msg::Clear => {
                self.clear();
                true
            }
            Msg::TypedName(name) => {
                self.typed_name = name;
                true
            }
            Msg::Confirm => {
                let zone_type = ctx.props().zone_type;
                let input = match self.mode {
                    Mode::Draw if self.has_ink => self
                        .context()
                        .and_then(|(canvas, _)| canvas.to_data_url().ok())
                        .map(|image| ZoneInput::Drawn { image }),
                    Mode::Type if !self.typed_name.trim().is_empty() => self
                        .render_typed(zone_type)
                        .map(|image| ZoneInput::Typed {
                            name: self.typed_name.trim().to_string(),
                            image,
                        }),
                    Mode::Draw => {
                        show_toast("Dessinez votre signature avant de valider.");
                        None
                    }
                    Mode::Type => {
                        show_toast("Saisissez votre nom avant de valider.");
                        None
                    }
                };
                if let Some(input) = input {
                    ctx.props().on_confirm.emit(input);
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let props = ctx.props();
        let tab = |mode: Mode, label: &'static str| {
            html! {
                <button
                    class={classes!("tab-btn", (self.mode == mode).then_some("active"))}
                    onclick={link.callback(move |_| Msg::SetMode(mode))}
                >
                    { label }
                </button>
            }
        };
        let preview_font = format!(
            "font-family:{};font-size:{}px;color:#0d1b4c;text-align:center;min-height:60px;",
            SCRIPT_FONT,
            if props.zone_type == ZoneType::Initials { 48 } else { 36 }
        );

        html! {
            <div class="signature-pad">
                <div class="tab-bar">
                    { tab(Mode::Draw, "Dessiner") }
                    { tab(Mode::Type, "Saisir") }
                </div>
                <canvas
                    ref={self.canvas_ref.clone()}
                    width={CANVAS_WIDTH.to_string()}
                    height={CANVAS_HEIGHT.to_string()}
                    style={format!(
                        "border:1px dashed #9e9e9e;border-radius:4px;touch-action:none;background:#fff;{}",
                        if self.mode == Mode::Draw { "" } else { "display:none;" }
                    )}
                    onpointerdown={link.callback(|e: PointerEvent| Msg::PointerDown(e.offset_x() as f64, e.offset_y() as f64))}
                    onpointermove={link.callback(|e: PointerEvent| Msg::PointerMove(e.offset_x() as f64, e.offset_y() as f64))}
                    onpointerup={link.callback(|_: PointerEvent| Msg::PointerUp)}
                    onpointerleave={link.callback(|_: PointerEvent| Msg::PointerUp)}
                />
                {
                    if self.mode == Mode::Type {
                        html! {
                            <>
                                <input
                                    type="text"
                                    value={self.typed_name.clone()}
                                    placeholder="Votre nom"
                                    oninput={link.callback(|e: InputEvent| {
                                        Msg::TypedName(e.target_unchecked_into::<HtmlInputElement>().value())
                                    })}
                                />
                                <div style={preview_font}>{ self.typed_name.clone() }</div>
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
                <div class="signature-actions">
                    <button class="icon-btn" onclick={link.callback(|_| Msg::Clear)} disabled={props.disabled}>
                        <i class="material-icons">{"backspace"}</i>
                        <span class="icon-label">{"Effacer"}</span>
                    </button>
                    <button class="icon-btn wide" onclick={link.callback(|_| Msg::Confirm)} disabled={props.disabled}>
                        <i class="material-icons">{"check"}</i>
                        <span class="icon-label">{"Valider"}</span>
                    </button>
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_of_composite_names() {
        assert_eq!(initials("Claire Martin"), "CM");
        assert_eq!(initials("  jean-pierre  dupont "), "JD");
        assert_eq!(initials(""), "");
    }
}
