pub mod documents;
pub mod sessions;
pub mod templates;
