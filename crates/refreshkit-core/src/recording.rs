//! Recording implementations of every collaborator.
//!
//! Each one appends what it was asked to do to a shared [`Journal`]. They
//! back the headless trace replay and serve as test doubles.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::geometry::{EdgeInsets, Point};
use crate::indicator::{FooterIndicator, HeaderIndicator};
use crate::source::{DataSource, LoadKind, LoadRequest, RequestId};
use crate::surface::{ScrollSurface, Transition};

/// One observable side effect of the controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    HeaderHidden { hidden: bool },
    HeaderRatio { ratio: f64 },
    HeaderStartSpin,
    HeaderEndSpin,
    HeaderRestoring,
    FooterHidden { hidden: bool },
    FooterStartSpin,
    FooterEndSpin,
    TopInset { top: f64, transition: Transition },
    ContentInsets { insets: EdgeInsets, transition: Transition },
    ContentOffset { offset: Point, transition: Transition },
    LoadNewer { request: RequestId },
    LoadOlder { request: RequestId },
}

/// Shared, append-only effect log
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Effect>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, effect: Effect) {
        self.0.borrow_mut().push(effect);
    }

    /// Copy of everything recorded so far
    pub fn effects(&self) -> Vec<Effect> {
        self.0.borrow().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<Effect> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn count(&self, predicate: impl Fn(&Effect) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| predicate(e)).count()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Scroll view stand-in that remembers the last applied geometry
#[derive(Debug)]
pub struct RecordingSurface {
    journal: Journal,
    pub insets: EdgeInsets,
    pub offset: Point,
}

impl RecordingSurface {
    pub fn new(journal: &Journal, insets: EdgeInsets) -> Self {
        Self {
            journal: journal.clone(),
            insets,
            offset: Point::default(),
        }
    }
}

impl ScrollSurface for RecordingSurface {
    fn set_top_inset(&mut self, top: f64, transition: Transition) {
        self.insets.top = top;
        self.journal.record(Effect::TopInset { top, transition });
    }

    fn set_content_insets(&mut self, insets: EdgeInsets, transition: Transition) {
        self.insets = insets;
        self.journal.record(Effect::ContentInsets { insets, transition });
    }

    fn set_content_offset(&mut self, offset: Point, transition: Transition) {
        self.offset = offset;
        self.journal.record(Effect::ContentOffset { offset, transition });
    }
}

/// Data source that parks every request until it is completed by hand
#[derive(Debug)]
pub struct RecordingSource {
    journal: Journal,
    pending: Vec<LoadRequest>,
}

impl RecordingSource {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            pending: Vec::new(),
        }
    }

    /// Requests issued and not yet taken
    pub fn pending(&self) -> &[LoadRequest] {
        &self.pending
    }

    pub fn pending_of(&self, kind: LoadKind) -> usize {
        self.pending.iter().filter(|r| r.kind == kind).count()
    }

    /// Remove the oldest parked request of `kind`
    pub fn take_oldest(&mut self, kind: LoadKind) -> Option<LoadRequest> {
        let index = self.pending.iter().position(|r| r.kind == kind)?;
        Some(self.pending.remove(index))
    }
}

impl DataSource for RecordingSource {
    fn load_newer(&mut self, request: LoadRequest) {
        self.journal.record(Effect::LoadNewer { request: request.id });
        self.pending.push(request);
    }

    fn load_older(&mut self, request: LoadRequest) {
        self.journal.record(Effect::LoadOlder { request: request.id });
        self.pending.push(request);
    }
}

/// Header widget stand-in
#[derive(Debug)]
pub struct RecordingHeader {
    journal: Journal,
    pub hidden: bool,
    pub spinning: bool,
    pub ratio: f64,
    /// Stop spinning when inset restoration begins
    pub end_spin_on_restore: bool,
}

impl RecordingHeader {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            hidden: false,
            spinning: false,
            ratio: 0.0,
            end_spin_on_restore: false,
        }
    }

    pub fn ending_spin_on_restore(mut self) -> Self {
        self.end_spin_on_restore = true;
        self
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

impl HeaderIndicator for RecordingHeader {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.journal.record(Effect::HeaderHidden { hidden });
    }

    fn is_spinning(&self) -> bool {
        self.spinning
    }

    fn ratio(&self) -> f64 {
        self.ratio
    }

    fn set_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
        self.journal.record(Effect::HeaderRatio { ratio });
    }

    fn start_spin(&mut self) {
        self.spinning = true;
        self.journal.record(Effect::HeaderStartSpin);
    }

    fn end_spin(&mut self) {
        self.spinning = false;
        self.journal.record(Effect::HeaderEndSpin);
    }

    fn restoring(&mut self) {
        self.journal.record(Effect::HeaderRestoring);
        if self.end_spin_on_restore {
            self.end_spin();
            self.ratio = 0.0;
        }
    }
}

/// Footer widget stand-in; repeated start calls only spin once
#[derive(Debug)]
pub struct RecordingFooter {
    journal: Journal,
    pub hidden: bool,
    pub spinning: bool,
}

impl RecordingFooter {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            hidden: false,
            spinning: false,
        }
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

impl FooterIndicator for RecordingFooter {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.journal.record(Effect::FooterHidden { hidden });
    }

    fn start_spin(&mut self) {
        self.journal.record(Effect::FooterStartSpin);
        if !self.spinning {
            self.spinning = true;
            self.hidden = false;
        }
    }

    fn end_spin(&mut self) {
        self.journal.record(Effect::FooterEndSpin);
        self.spinning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_takes_oldest_of_kind() {
        let journal = Journal::new();
        let mut source = RecordingSource::new(&journal);
        source.load_older(LoadRequest { id: RequestId(1), kind: LoadKind::Older });
        source.load_newer(LoadRequest { id: RequestId(2), kind: LoadKind::Newer });
        source.load_older(LoadRequest { id: RequestId(3), kind: LoadKind::Older });

        assert_eq!(source.pending_of(LoadKind::Older), 2);
        assert_eq!(source.take_oldest(LoadKind::Older).map(|r| r.id), Some(RequestId(1)));
        assert_eq!(source.take_oldest(LoadKind::Newer).map(|r| r.id), Some(RequestId(2)));
        assert!(source.take_oldest(LoadKind::Newer).is_none());
        assert_eq!(journal.len(), 3);
    }

    #[test]
    fn test_footer_end_without_start() {
        let journal = Journal::new();
        let mut footer = RecordingFooter::new(&journal);
        footer.end_spin();
        assert!(!footer.spinning);

        footer.start_spin();
        footer.start_spin();
        assert!(footer.spinning);
        assert_eq!(journal.count(|e| *e == Effect::FooterStartSpin), 2);
    }

    #[test]
    fn test_effect_json_shape() {
        let json = serde_json::to_value(Effect::HeaderRatio { ratio: 0.5 }).unwrap();
        assert_eq!(json["effect"], "header_ratio");
        assert_eq!(json["ratio"], 0.5);
    }
}
