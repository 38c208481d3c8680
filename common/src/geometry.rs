//! Logical page space shared by the editor, the signing view and every renderer.
//!
//! All zone geometry lives in a fixed 595 × 842 frame with a top-left origin.
//! A renderer that produces a page `rendered_width` pixels wide maps logical
//! coordinates with the single uniform factor `rendered_width / 595`.

use serde::{Deserialize, Serialize};

pub const PAGE_WIDTH: f64 = 595.0;
pub const PAGE_HEIGHT: f64 = 842.0;

/// Smallest zone the editor lets an operator shrink to.
pub const MIN_ZONE_WIDTH: f64 = 20.0;
pub const MIN_ZONE_HEIGHT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }

    pub fn delta_from(self, origin: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

/// Rectangle in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Uniform logical-to-screen factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Identity mapping, used before the first page has been measured.
    pub const IDENTITY: ScaleFactor = ScaleFactor(1.0);

    /// Factor for a page rendered `rendered_width` pixels wide.
    ///
    /// Non-positive or non-finite widths fall back to the identity mapping.
    pub fn from_rendered_width(rendered_width: f64) -> Self {
        if rendered_width.is_finite() && rendered_width > 0.0 {
            ScaleFactor(rendered_width / PAGE_WIDTH)
        } else {
            ScaleFactor::IDENTITY
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        ScaleFactor::IDENTITY
    }
}

pub fn to_screen(point: LogicalPoint, scale: ScaleFactor) -> ScreenPoint {
    ScreenPoint {
        x: point.x * scale.0,
        y: point.y * scale.0,
    }
}

pub fn to_logical(point: ScreenPoint, scale: ScaleFactor) -> LogicalPoint {
    LogicalPoint {
        x: point.x / scale.0,
        y: point.y / scale.0,
    }
}

/// Maps a whole rectangle to screen pixels.
pub fn rect_to_screen(rect: &Rect, scale: ScaleFactor) -> Rect {
    Rect {
        x: rect.x * scale.0,
        y: rect.y * scale.0,
        width: rect.width * scale.0,
        height: rect.height * scale.0,
    }
}

/// Pixel height of a page rendered `rendered_width` wide.
pub fn page_height_for_width(rendered_width: f64) -> f64 {
    rendered_width * PAGE_HEIGHT / PAGE_WIDTH
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Returns `rect` moved and resized so it lies fully inside the page.
pub fn clamp_rect(rect: Rect) -> Rect {
    let width = clamp_axis(rect.width, MIN_ZONE_WIDTH, PAGE_WIDTH);
    let height = clamp_axis(rect.height, MIN_ZONE_HEIGHT, PAGE_HEIGHT);
    Rect {
        x: clamp_axis(rect.x, 0.0, PAGE_WIDTH - width),
        y: clamp_axis(rect.y, 0.0, PAGE_HEIGHT - height),
        width,
        height,
    }
}

pub fn is_within_page(rect: &Rect) -> bool {
    rect.x >= 0.0
        && rect.y >= 0.0
        && rect.x + rect.width <= PAGE_WIDTH
        && rect.y + rect.height <= PAGE_HEIGHT
}
