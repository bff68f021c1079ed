//! Terminal scroll view
//!
//! [`ListViewport`] plays the part of the platform scroll view: it owns the
//! content offset and insets, animates them when the refresh controller
//! asks, and reports when a requested inset animation has settled.
//!
//! Geometry is kept in view points; one terminal row is
//! `units_per_row` points.

use std::time::{Duration, Instant};

use refreshkit_core::{EdgeInsets, Point, ScrollMetrics, ScrollSurface, Transition};

use super::animation::ValueAnimator;
use super::easing::EasingType;

/// Resistance applied to drags past either end of the content
const RUBBER_BAND: f64 = 0.5;

/// Time to spring back into bounds after a release
const SPRING_BACK: Duration = Duration::from_millis(300);

/// What changed during one [`ListViewport::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportUpdate {
    /// The content offset moved
    pub scrolled: bool,
    /// An inset animation requested through [`ScrollSurface`] finished
    pub settled: bool,
}

#[derive(Debug, Clone)]
pub struct ListViewport {
    offset: ValueAnimator,
    top: ValueAnimator,
    bottom: ValueAnimator,
    content_height: f64,
    viewport_height: f64,
    units_per_row: f64,
    dragging: bool,
    /// Offset was placed programmatically and stays put until the user
    /// scrolls or the insets change
    held: bool,
    settle_pending: bool,
}

impl ListViewport {
    pub fn new(units_per_row: f64, insets: EdgeInsets) -> Self {
        Self {
            offset: ValueAnimator::new(-insets.top).with_easing(EasingType::Cubic),
            top: ValueAnimator::new(insets.top),
            bottom: ValueAnimator::new(insets.bottom),
            content_height: 0.0,
            viewport_height: 0.0,
            units_per_row: units_per_row.max(1.0),
            dragging: false,
            held: false,
            settle_pending: false,
        }
    }

    #[inline]
    pub fn units_per_row(&self) -> f64 {
        self.units_per_row
    }

    pub fn set_content_height(&mut self, height: f64) {
        self.content_height = height.max(0.0);
    }

    pub fn set_viewport_rows(&mut self, rows: u16) {
        self.viewport_height = rows as f64 * self.units_per_row;
    }

    pub fn viewport_rows(&self) -> u16 {
        (self.viewport_height / self.units_per_row).round() as u16
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset.current()
    }

    pub fn insets(&self) -> EdgeInsets {
        EdgeInsets::new(self.top.current(), self.bottom.current())
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether anything is still moving and needs fast frames
    pub fn is_animating(&self) -> bool {
        self.offset.is_animating() || self.top.is_animating() || self.bottom.is_animating()
    }

    /// Snapshot handed to the refresh controller
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.content_height,
            self.offset.current(),
            self.viewport_height,
            self.insets(),
        )
    }

    /// Resting offset range
    ///
    /// The top edge follows whichever of the current and target top inset
    /// is larger, so a growing inset holds the content where the user
    /// released it and a shrinking one pulls the content along.
    fn bounds(&self) -> (f64, f64) {
        let min = -self.top.current().max(self.top.target());
        let max = self.content_height - self.viewport_height + self.bottom.current();
        (min, max.max(min))
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.held = false;
        self.offset.cancel();
    }

    /// Move the content by `delta` points while dragging
    ///
    /// Positive deltas scroll towards the end of the list. Past either end
    /// the movement is damped.
    pub fn drag_by(&mut self, delta: f64) -> bool {
        if delta == 0.0 {
            return false;
        }
        let (min, max) = self.bounds();
        let current = self.offset.current();
        let mut next = current + delta;
        if next < min || next > max {
            next = current + delta * RUBBER_BAND;
        }
        self.offset.set(next);
        true
    }

    /// The user let go; spring back into bounds
    pub fn end_drag(&mut self, now: Instant) {
        self.dragging = false;
        let (min, max) = self.bounds();
        let current = self.offset.current();
        let target = current.clamp(min, max);
        if target != current {
            self.offset.animate_to(target, SPRING_BACK, now);
        }
    }

    /// Wheel or keyboard scroll; never leaves the resting range
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.held = false;
        let (min, max) = self.bounds();
        let current = self.offset.current();
        let next = (current + delta).clamp(min, max);
        if next == current {
            return false;
        }
        self.offset.set(next);
        true
    }

    /// Advance all animations to `now`
    pub fn update(&mut self, now: Instant) -> ViewportUpdate {
        let before = self.offset.current();

        self.top.update(now);
        self.bottom.update(now);
        self.offset.update(now);

        if !self.dragging && !self.held && !self.offset.is_animating() {
            let (min, max) = self.bounds();
            let current = self.offset.current();
            let clamped = current.clamp(min, max);
            if clamped != current {
                self.offset.set(clamped);
            }
        }

        let settled =
            self.settle_pending && !self.top.is_animating() && !self.bottom.is_animating();
        if settled {
            self.settle_pending = false;
        }

        ViewportUpdate {
            scrolled: self.offset.current() != before,
            settled,
        }
    }

    /// Let a held offset move back into the bounds implied by new insets
    fn release_hold(&mut self, transition: Transition) {
        if !self.held {
            return;
        }
        self.held = false;
        let (min, max) = self.bounds();
        let current = self.offset.current();
        let target = current.clamp(min, max);
        if target != current {
            let duration = match transition {
                Transition::Immediate => Duration::ZERO,
                Transition::Animated(duration) => duration,
            };
            self.offset.animate_to(target, duration, Instant::now());
        }
    }

    fn animate_inset(edge: &mut ValueAnimator, value: f64, transition: Transition) -> bool {
        match transition {
            Transition::Immediate => {
                edge.set(value);
                false
            }
            Transition::Animated(duration) => {
                edge.animate_to(value, duration, Instant::now());
                true
            }
        }
    }
}

impl ScrollSurface for ListViewport {
    fn set_top_inset(&mut self, top: f64, transition: Transition) {
        if Self::animate_inset(&mut self.top, top, transition) {
            self.settle_pending = true;
        }
        self.release_hold(transition);
    }

    fn set_content_insets(&mut self, insets: EdgeInsets, transition: Transition) {
        let top = Self::animate_inset(&mut self.top, insets.top, transition);
        let bottom = Self::animate_inset(&mut self.bottom, insets.bottom, transition);
        if top || bottom {
            self.settle_pending = true;
        }
        self.release_hold(transition);
    }

    fn set_content_offset(&mut self, offset: Point, transition: Transition) {
        self.held = true;
        match transition {
            Transition::Immediate => self.offset.set(offset.y),
            Transition::Animated(duration) => {
                self.offset.animate_to(offset.y, duration, Instant::now())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ListViewport {
        let mut viewport = ListViewport::new(10.0, EdgeInsets::default());
        viewport.set_content_height(2000.0);
        viewport.set_viewport_rows(80);
        viewport
    }

    fn later(ms: u64) -> Instant {
        Instant::now() + Duration::from_millis(ms)
    }

    #[test]
    fn test_metrics_in_points() {
        let mut viewport = viewport();
        assert!(viewport.scroll_by(300.0));
        let metrics = viewport.metrics();
        assert_eq!(metrics.viewport_height, 800.0);
        assert_eq!(metrics.offset, 300.0);
        assert_eq!(metrics.delta_left(), 900.0);
        assert_eq!(viewport.viewport_rows(), 80);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut viewport = viewport();
        assert!(!viewport.scroll_by(-50.0));
        viewport.scroll_by(5000.0);
        assert_eq!(viewport.offset(), 1200.0);
    }

    #[test]
    fn test_drag_past_top_is_damped() {
        let mut viewport = viewport();
        viewport.begin_drag();
        viewport.drag_by(-40.0);
        viewport.drag_by(-40.0);
        assert_eq!(viewport.offset(), -40.0);
        assert!(viewport.is_dragging());
    }

    #[test]
    fn test_release_springs_back() {
        let mut viewport = viewport();
        viewport.begin_drag();
        viewport.drag_by(-60.0);
        viewport.end_drag(Instant::now());
        assert!(viewport.is_animating());

        let update = viewport.update(later(400));
        assert!(update.scrolled);
        assert!(!update.settled);
        assert_eq!(viewport.offset(), 0.0);
    }

    #[test]
    fn test_growing_inset_holds_content() {
        let mut viewport = viewport();
        viewport.begin_drag();
        viewport.drag_by(-160.0);
        viewport.set_top_inset(80.0, Transition::over(Duration::from_millis(250)));
        viewport.end_drag(Instant::now());

        assert_eq!(viewport.offset(), -80.0);
        let update = viewport.update(later(300));
        assert!(update.settled);
        assert_eq!(viewport.insets().top, 80.0);
        assert_eq!(viewport.offset(), -80.0);
    }

    #[test]
    fn test_shrinking_inset_pulls_content() {
        let mut viewport = ListViewport::new(10.0, EdgeInsets::new(80.0, 0.0));
        viewport.set_content_height(2000.0);
        viewport.set_viewport_rows(80);
        assert_eq!(viewport.offset(), -80.0);

        viewport.set_content_insets(EdgeInsets::default(), Transition::over(Duration::from_millis(250)));
        let update = viewport.update(later(300));
        assert!(update.scrolled);
        assert!(update.settled);
        assert_eq!(viewport.offset(), 0.0);
    }

    #[test]
    fn test_immediate_insets_do_not_settle() {
        let mut viewport = viewport();
        viewport.set_top_inset(80.0, Transition::Immediate);
        assert_eq!(viewport.insets().top, 80.0);
        assert!(!viewport.update(Instant::now()).settled);
    }

    #[test]
    fn test_programmatic_offset_is_held() {
        let mut viewport = viewport();
        let quarter = Transition::over(Duration::from_millis(250));
        viewport.set_content_offset(Point::new(0.0, -100.0), quarter);
        assert!(viewport.update(later(300)).scrolled);
        assert!(!viewport.update(later(1000)).scrolled);
        assert_eq!(viewport.offset(), -100.0);

        // Growing the inset lets the content settle just above it
        viewport.set_top_inset(80.0, quarter);
        let update = viewport.update(later(2000));
        assert!(update.settled);
        assert_eq!(viewport.offset(), -80.0);
    }

    #[test]
    fn test_user_scroll_releases_hold() {
        let mut viewport = viewport();
        viewport.set_content_offset(Point::new(0.0, -100.0), Transition::Immediate);
        viewport.scroll_by(10.0);
        assert_eq!(viewport.offset(), 0.0);
    }
}
