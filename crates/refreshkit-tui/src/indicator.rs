//! Terminal indicator widgets bound to the refresh controller.
//!
//! These hold display state only; the matching render code lives in
//! `widgets`.

use std::cell::RefCell;
use std::rc::Rc;

use refreshkit_core::{FooterIndicator, HeaderIndicator};

/// Braille spinner frames
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Pull-to-refresh header
#[derive(Debug, Clone)]
pub struct RefreshHeader {
    hidden: bool,
    spinning: bool,
    ratio: f64,
    frame: usize,
}

impl Default for RefreshHeader {
    fn default() -> Self {
        Self {
            hidden: true,
            spinning: false,
            ratio: 0.0,
            frame: 0,
        }
    }
}

impl RefreshHeader {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Advance the spinner animation
    pub fn tick(&mut self) {
        if self.spinning {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }

    /// Label matching the current state
    pub fn label(&self) -> &'static str {
        if self.spinning {
            "Refreshing…"
        } else if self.ratio >= 1.0 {
            "Release to refresh"
        } else {
            "Pull to refresh"
        }
    }
}

impl HeaderIndicator for RefreshHeader {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn is_spinning(&self) -> bool {
        self.spinning
    }

    fn ratio(&self) -> f64 {
        self.ratio
    }

    fn set_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    fn start_spin(&mut self) {
        self.spinning = true;
        self.hidden = false;
    }

    fn end_spin(&mut self) {
        self.spinning = false;
        self.frame = 0;
    }

    fn restoring(&mut self) {
        self.end_spin();
        self.ratio = 0.0;
    }
}

/// Load-more footer
#[derive(Debug, Clone, Default)]
pub struct LoadFooter {
    hidden: bool,
    spinning: bool,
    frame: usize,
}

impl LoadFooter {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn tick(&mut self) {
        if self.spinning {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }
}

impl FooterIndicator for LoadFooter {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn start_spin(&mut self) {
        if self.spinning {
            return;
        }
        self.spinning = true;
        self.hidden = false;
    }

    fn end_spin(&mut self) {
        self.spinning = false;
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_labels() {
        let mut header = RefreshHeader::default();
        assert!(header.is_hidden());
        assert_eq!(header.label(), "Pull to refresh");

        header.set_ratio(1.0);
        assert_eq!(header.label(), "Release to refresh");

        header.start_spin();
        assert!(!header.is_hidden());
        assert_eq!(header.label(), "Refreshing…");
    }

    #[test]
    fn test_header_stops_on_restore() {
        let mut header = RefreshHeader::default();
        header.set_ratio(1.0);
        header.start_spin();
        header.tick();
        assert_ne!(header.spinner(), SPINNER_FRAMES[0]);

        header.restoring();
        assert!(!header.is_spinning());
        assert_eq!(header.ratio(), 0.0);
        assert_eq!(header.spinner(), SPINNER_FRAMES[0]);
    }

    #[test]
    fn test_footer_spin_is_idempotent() {
        let mut footer = LoadFooter::default();
        footer.end_spin();
        assert!(!footer.is_spinning());

        footer.start_spin();
        footer.tick();
        let frame = footer.spinner();
        footer.start_spin();
        assert_eq!(footer.spinner(), frame);
        assert!(footer.is_spinning());
    }
}
