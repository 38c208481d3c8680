use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SigningProps {
    /// Session named in the `/sign/{session_id}` link.
    pub session_id: String,
}
