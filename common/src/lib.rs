//! Shared domain of the mandate signature workflow.
//!
//! The crate is used by both the HTTP backend and the Yew web client, so it
//! stays free of I/O: every collaborator (object storage, archival) is reached
//! through a small trait the caller implements.
//!
//! - [`model`]: templates, zones, sessions and zone data as exchanged over the API.
//! - [`geometry`]: the 595 × 842 logical page space and its mapping to screen pixels.
//! - [`editor`]: design-time zone placement on a template.
//! - [`signing`]: the signer journey state machine.
//! - [`render`]: keyed page rasterization results.
//! - [`requests`]: request/response payloads of the backend routes.
//! - [`jobs`]: status of the background archival of signed sessions.

pub mod editor;
pub mod error;
pub mod geometry;
pub mod jobs;
pub mod model;
pub mod render;
pub mod requests;
pub mod signing;
