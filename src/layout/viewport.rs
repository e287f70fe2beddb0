//! Viewport state: view size and scroll position.

use crate::types::{Point, Size};

/// The visible area of the grid.
///
/// `scroll_x`/`scroll_y` are offsets into the scrollable content, i.e. past
/// the frozen panes. Offset 0 shows the first scrollable column/row right
/// against the frozen region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Horizontal scroll position in scrollable-content coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in scrollable-content coordinates
    pub scroll_y: f64,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
}

impl Viewport {
    /// Create a viewport of the given size scrolled to the origin
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn content_offset(&self) -> Point {
        Point::new(self.scroll_x, self.scroll_y)
    }

    /// Clamp scroll position to `[0, max]` on each axis.
    pub fn clamp_scroll(&mut self, max: Point) {
        self.scroll_x = sanitize(self.scroll_x).clamp(0.0, max.x.max(0.0));
        self.scroll_y = sanitize(self.scroll_y).clamp(0.0, max.y.max(0.0));
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64, max: Point) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(max);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f64, y: f64, max: Point) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(max);
    }

    /// Resize the viewport; the caller re-clamps once new limits are known.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = sanitize(width);
        self.height = sanitize(height);
    }
}

/// Negative and non-finite lengths collapse to 0.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamps_to_limits() {
        let mut viewport = Viewport::new(800.0, 600.0);
        let max = Point::new(1000.0, 500.0);

        viewport.scroll_by(-50.0, 20.0, max);
        assert_eq!(viewport.content_offset(), Point::new(0.0, 20.0));

        viewport.set_scroll(5000.0, 5000.0, max);
        assert_eq!(viewport.content_offset(), Point::new(1000.0, 500.0));
    }

    #[test]
    fn test_non_finite_input() {
        let mut viewport = Viewport::new(f64::NAN, -10.0);
        assert_eq!(viewport.size(), Size::ZERO);
        viewport.set_scroll(f64::INFINITY, 10.0, Point::new(100.0, 100.0));
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 10.0);
    }

    #[test]
    fn test_resize_keeps_offset() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.set_scroll(40.0, 40.0, Point::new(100.0, 100.0));
        viewport.resize(300.0, 200.0);
        assert_eq!(viewport.size(), Size::new(300.0, 200.0));
        assert_eq!(viewport.content_offset(), Point::new(40.0, 40.0));
        viewport.clamp_scroll(Point::new(10.0, 100.0));
        assert_eq!(viewport.scroll_x, 10.0);
    }
}
