use serde::{Deserialize, Serialize};

/// Distance from the bottom (in pixels) that still counts as fully read.
pub const SCROLL_TOLERANCE: f64 = 20.0;

/// Scroll position of the document preview, as reported by the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Content that fits in the viewport is reached on mount.
    pub fn reached_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - SCROLL_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_applies_at_the_bottom() {
        let metrics = |scroll_top| ScrollMetrics {
            scroll_top,
            client_height: 600.0,
            scroll_height: 2000.0,
        };
        assert!(!metrics(1379.0).reached_bottom());
        assert!(metrics(1380.0).reached_bottom());
        assert!(metrics(1400.0).reached_bottom());
    }

    #[test]
    fn short_content_is_read_on_mount() {
        let metrics = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 900.0,
            scroll_height: 850.0,
        };
        assert!(metrics.reached_bottom());
    }
}
