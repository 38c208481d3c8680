//! Properties of the `ZoneEditorComponent`.

use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoneEditorProps {
    /// Template to load on first render. When `None`, or when loading fails,
    /// the editor starts on a new empty template.
    #[prop_or_default]
    pub template_id: Option<String>,
}
