//! Keyed page rasterization.
//!
//! The rasterization service is asynchronous and cannot be cancelled. A later
//! upload or page change simply issues a new request; every result carries the
//! `(document_url, page_number)` key it was produced for and [`PageRender`]
//! drops results whose key no longer matches what the caller is showing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderKey {
    pub document_url: String,
    pub page_number: u32,
}

impl RenderKey {
    pub fn new(document_url: impl Into<String>, page_number: u32) -> Self {
        RenderKey {
            document_url: document_url.into(),
            page_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub key: RenderKey,
    /// Desired raster width in pixels; height follows the page aspect ratio.
    pub target_width: u32,
}

/// Successful answer of the rasterization service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub key: RenderKey,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    pub total_pages: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderError {
    #[error("document is unreachable or corrupt: {0}")]
    DocumentUnreachable(String),
    #[error("page {page} is out of range (document has {total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },
}

/// What the page area currently displays.
#[derive(Debug, Clone, PartialEq)]
pub enum PageRender {
    /// No document attached: blank canvas in the page aspect ratio.
    Blank,
    Loading(RenderKey),
    Ready(RenderedPage),
    /// "Cannot load document" placeholder; zones stay editable on top of it.
    Failed { key: RenderKey, error: RenderError },
}

impl PageRender {
    /// State for a page area showing `key`, or a blank canvas for `None`.
    pub fn request(key: Option<RenderKey>) -> Self {
        match key {
            Some(key) => PageRender::Loading(key),
            None => PageRender::Blank,
        }
    }

    pub fn key(&self) -> Option<&RenderKey> {
        match self {
            PageRender::Blank => None,
            PageRender::Loading(key) => Some(key),
            PageRender::Ready(page) => Some(&page.key),
            PageRender::Failed { key, .. } => Some(key),
        }
    }

    /// Applies a service result. Returns `false` when the result is stale.
    pub fn resolve(&mut self, key: &RenderKey, result: Result<RenderedPage, RenderError>) -> bool {
        match self {
            PageRender::Loading(current) if *current == *key => {}
            _ => return false,
        }
        *self = match result {
            Ok(page) if &page.key == key => PageRender::Ready(page),
            Ok(page) => PageRender::Failed {
                key: key.clone(),
                error: RenderError::DocumentUnreachable(format!(
                    "renderer answered for page {} of {}",
                    page.key.page_number, page.key.document_url
                )),
            },
            Err(error) => PageRender::Failed {
                key: key.clone(),
                error,
            },
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageRender::Loading(_))
    }

    /// Page count learned from a successful render.
    pub fn total_pages(&self) -> Option<u32> {
        match self {
            PageRender::Ready(page) => Some(page.total_pages),
            PageRender::Failed {
                error: RenderError::PageOutOfRange { total_pages, .. },
                ..
            } => Some(*total_pages),
            _ => None,
        }
    }

    /// Pixel height the page area should reserve at `width`.
    pub fn display_height(&self, width: f64) -> f64 {
        match self {
            PageRender::Ready(page) if page.width > 0 => width * page.height as f64 / page.width as f64,
            _ => geometry::page_height_for_width(width),
        }
    }
}
