//! Geometry types for rendered element boxes and the viewport.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in viewport coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Rendered width
    pub width: f64,
    /// Rendered height
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the box has no visible area.
    pub fn is_collapsed(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Width divided by height, `None` for a zero-height box.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0.0 {
            None
        } else {
            Some(self.width / self.height)
        }
    }
}

/// Size of the visible viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Inner width
    pub width: f64,
    /// Inner height
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_aspect_ratio() {
        assert_eq!(Rect::new(0.0, 0.0, 200.0, 100.0).aspect_ratio(), Some(2.0));
        assert_eq!(Rect::new(0.0, 0.0, 200.0, 0.0).aspect_ratio(), None);
    }

    #[test]
    fn test_rect_collapsed() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_collapsed());
        assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_collapsed());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_collapsed());
    }

    #[test]
    fn test_viewport_default() {
        let viewport = Viewport::default();
        assert_eq!(viewport.width, 1280.0);
        assert_eq!(viewport.height, 800.0);
    }
}
