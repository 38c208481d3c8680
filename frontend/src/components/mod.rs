pub mod document_page;
pub mod helpers;
pub mod signature_pad;
pub mod signing;
pub mod zone_editor;
