//! Plain geometry values exchanged with the scrollable view.
//!
//! All values are in view points. The controller never keeps a
//! `ScrollMetrics` around: the view hands over a fresh snapshot with
//! every event.

use serde::{Deserialize, Serialize};

/// A 2D point (content offsets)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D size (supplementary view sizes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Vertical content insets of the scrollable view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
}

impl EdgeInsets {
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Same insets with a different top value
    pub fn with_top(self, top: f64) -> Self {
        Self { top, ..self }
    }
}

/// Snapshot of the scrollable view taken for a single event
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Total height of the scrollable content
    pub content_height: f64,
    /// Vertical content offset (negative while pulled past the top)
    pub offset: f64,
    /// Height of the visible viewport
    pub viewport_height: f64,
    /// Current content insets
    #[serde(default)]
    pub insets: EdgeInsets,
}

impl ScrollMetrics {
    pub fn new(content_height: f64, offset: f64, viewport_height: f64, insets: EdgeInsets) -> Self {
        Self {
            content_height,
            offset,
            viewport_height,
            insets,
        }
    }

    /// Remaining scrollable distance below the viewport's bottom edge
    ///
    /// Negative once the user pulls past the end of the content.
    #[inline]
    pub fn delta_left(&self) -> f64 {
        self.content_height - (self.offset + self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_left() {
        let metrics = ScrollMetrics::new(2000.0, 300.0, 800.0, EdgeInsets::default());
        assert!((metrics.delta_left() - 900.0).abs() < f64::EPSILON);

        let pulled = ScrollMetrics::new(2000.0, 1250.0, 800.0, EdgeInsets::default());
        assert!(pulled.delta_left() < 0.0);
    }

    #[test]
    fn test_with_top_keeps_bottom() {
        let insets = EdgeInsets::new(10.0, -40.0).with_top(80.0);
        assert_eq!(insets, EdgeInsets::new(80.0, -40.0));
    }
}
