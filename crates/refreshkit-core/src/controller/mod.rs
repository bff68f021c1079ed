//! Refresh controller
//!
//! Turns scroll snapshots and drag-end events into refresh and load
//! requests. Two evaluators run on every event, each behind its own
//! enabled flag:
//!
//! - `header` - pull-to-refresh (ratio feedback while dragging, commit on release)
//! - `footer` - prefetch of older items near the bottom, spinner on overscroll
//!
//! The callback chain of a refresh (inset grows, request goes out, inset
//! shrinks back) is an explicit [`HeaderPhase`] machine, and the single
//! outstanding backward load is tracked by [`FooterPhase`]. Everything runs
//! on one thread; completions re-enter through [`RefreshController::complete`]
//! as ordinary events.

pub mod footer;
pub mod header;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::RefreshConfig;
use crate::geometry::{Point, ScrollMetrics, Size};
use crate::indicator::{Binding, FooterIndicator, HeaderIndicator, SupplementaryKind};
use crate::source::{DataSource, LoadCompletion, LoadKind, LoadOutcome, LoadRequest, RequestId};
use crate::surface::{ScrollSurface, Transition};

use self::header::PullFeedback;

/// Where a pull-to-refresh currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPhase {
    /// No refresh in progress
    Idle,
    /// Header spinning, top inset growing to make room for it
    Committing,
    /// "Load newer" request outstanding
    Loading { request: RequestId },
    /// Insets sliding back to rest
    Restoring,
}

/// Backward-load state; at most one request is ever outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterPhase {
    Idle,
    /// `since` is the controller clock (last `tick`) when the request went out
    Loading { request: RequestId, since: Instant },
}

/// Pull-to-refresh and infinite-loading controller
pub struct RefreshController<S, D> {
    config: RefreshConfig,
    surface: S,
    source: D,
    header: Binding<dyn HeaderIndicator>,
    footer: Binding<dyn FooterIndicator>,
    header_phase: HeaderPhase,
    footer_phase: FooterPhase,
    /// Deadline of a pending manual refresh
    manual_due: Option<Instant>,
    /// Latest time passed in through `tick` or `refresh_manually`
    clock: Instant,
    next_request: u64,
}

impl<S: ScrollSurface, D: DataSource> RefreshController<S, D> {
    /// Create a controller; fails on invalid geometry
    pub fn new(config: RefreshConfig, surface: S, source: D) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            surface,
            source,
            header: Binding::default(),
            footer: Binding::default(),
            header_phase: HeaderPhase::Idle,
            footer_phase: FooterPhase::Idle,
            manual_due: None,
            clock: Instant::now(),
            next_request: 0,
        })
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Replace the configuration between sessions
    ///
    /// Refused while a refresh or load is in flight.
    pub fn set_config(&mut self, config: RefreshConfig) -> crate::Result<()> {
        config.validate()?;
        if self.is_busy() {
            return Err(crate::Error::Config(
                "cannot change refresh configuration while a load is in flight".to_string(),
            ));
        }
        debug!(
            header = config.header_refresh_enabled,
            footer = config.footer_refresh_enabled,
            "Refresh configuration replaced"
        );
        self.config = config;
        Ok(())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    pub fn header_phase(&self) -> HeaderPhase {
        self.header_phase
    }

    pub fn footer_phase(&self) -> FooterPhase {
        self.footer_phase
    }

    /// True while a backward ("older") load is outstanding
    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self.footer_phase, FooterPhase::Loading { .. })
    }

    /// True while any refresh or load is in progress
    pub fn is_busy(&self) -> bool {
        self.is_loading() || self.header_phase != HeaderPhase::Idle || self.manual_due.is_some()
    }

    /// How long the outstanding backward load has been running
    pub fn stalled_for(&self, now: Instant) -> Option<Duration> {
        match self.footer_phase {
            FooterPhase::Loading { since, .. } => Some(now.saturating_duration_since(since)),
            FooterPhase::Idle => None,
        }
    }

    /// Size the host layout reserves for a supplementary view
    pub fn supplementary_size(&self, kind: SupplementaryKind) -> Size {
        match kind {
            SupplementaryKind::Header => self.config.header_size(),
            SupplementaryKind::Footer => self.config.footer_size(),
        }
    }

    /// Bind (or rebind after recycling) the header widget; it starts hidden
    pub fn bind_header(&mut self, widget: &Rc<RefCell<dyn HeaderIndicator>>) {
        debug!("Header indicator bound");
        self.header.bind(widget);
    }

    /// Bind (or rebind after recycling) the footer widget; it starts hidden
    pub fn bind_footer(&mut self, widget: &Rc<RefCell<dyn FooterIndicator>>) {
        debug!("Footer indicator bound");
        self.footer.bind(widget);
    }

    pub fn unbind(&mut self, kind: SupplementaryKind) {
        match kind {
            SupplementaryKind::Header => self.header.clear(),
            SupplementaryKind::Footer => self.footer.clear(),
        }
    }

    pub fn header_binding(&self) -> &Binding<dyn HeaderIndicator> {
        &self.header
    }

    pub fn footer_binding(&self) -> &Binding<dyn FooterIndicator> {
        &self.footer
    }

    /// Scroll position changed (dragging or momentum)
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        if self.config.header_refresh_enabled {
            self.track_pull(&metrics);
        }
        if self.config.footer_refresh_enabled {
            self.evaluate_footer(&metrics);
        }
    }

    /// The user lifted their finger
    pub fn on_drag_end(&mut self, metrics: ScrollMetrics) {
        if self.config.header_refresh_enabled {
            self.commit_if_pulled();
        }
        if self.config.footer_refresh_enabled {
            self.evaluate_footer(&metrics);
        }
    }

    /// An animated inset change requested by the controller finished
    pub fn on_inset_settled(&mut self) {
        match self.header_phase {
            HeaderPhase::Committing => {
                let request = self.issue(LoadKind::Newer);
                self.header_phase = HeaderPhase::Loading { request: request.id };
                info!(request = %request.id, "Refreshing: loading newer items");
                self.source.load_newer(request);
            }
            HeaderPhase::Restoring => {
                self.header_phase = HeaderPhase::Idle;
                debug!("Refresh finished, insets at rest");
            }
            phase => debug!(?phase, "Ignoring inset settle"),
        }
    }

    /// A data source request finished
    ///
    /// Returns `false` for ids that are not outstanding (stale or
    /// duplicate completions), which change nothing.
    pub fn complete(&mut self, completion: LoadCompletion) -> bool {
        let LoadCompletion { id, outcome } = completion;

        if matches!(self.footer_phase, FooterPhase::Loading { request, .. } if request == id) {
            log_outcome(LoadKind::Older, id, &outcome);
            self.footer_phase = FooterPhase::Idle;
            self.footer.with(|footer| footer.end_spin());
            return true;
        }

        if self.header_phase == (HeaderPhase::Loading { request: id }) {
            log_outcome(LoadKind::Newer, id, &outcome);
            self.header_phase = HeaderPhase::Restoring;
            let transition = Transition::over(self.config.inset_animation());
            self.surface
                .set_content_insets(self.config.base_insets, transition);
            self.header.with(|header| header.restoring());
            if !transition.is_animated() {
                self.on_inset_settled();
            }
            return true;
        }

        warn!(request = %id, "Ignoring completion for a request that is not outstanding");
        false
    }

    /// Refresh without a user drag: scroll to a full pull, then commit
    /// after `manual_refresh_delay` through the regular release path
    pub fn refresh_manually(&mut self, now: Instant) {
        self.clock = now;
        if !self.config.header_refresh_enabled {
            debug!("Manual refresh ignored: header refresh disabled");
            return;
        }
        if self.manual_due.is_some() {
            debug!("Manual refresh already pending");
            return;
        }

        let offset = Point::new(0.0, -self.config.manual_pull_offset);
        self.surface
            .set_content_offset(offset, Transition::over(self.config.inset_animation()));
        self.manual_due = Some(now + self.config.manual_refresh_delay());
        info!(delay_ms = self.config.manual_refresh_delay_ms, "Manual refresh scheduled");
    }

    /// Advance time-based work: pending manual refresh and the load watchdog
    pub fn tick(&mut self, now: Instant) {
        self.clock = now;
        if let Some(due) = self.manual_due {
            if now >= due {
                self.manual_due = None;
                self.header.with(|header| header.set_ratio(1.0));
                self.commit_if_pulled();
            }
        }

        if let (Some(timeout), FooterPhase::Loading { request, since }) =
            (self.config.load_timeout(), self.footer_phase)
        {
            if now.saturating_duration_since(since) >= timeout {
                warn!(
                    request = %request,
                    timeout_ms = timeout.as_millis() as u64,
                    "Older load did not complete in time, releasing it"
                );
                self.footer_phase = FooterPhase::Idle;
                self.footer.with(|footer| footer.end_spin());
            }
        }
    }

    /// Dragging branch of the header evaluator
    fn track_pull(&mut self, metrics: &ScrollMetrics) {
        let feedback = header::pull_feedback(metrics.offset, metrics.insets.top, &self.config);
        self.header.with(|header| {
            if header.is_spinning() {
                return;
            }
            match feedback {
                PullFeedback::Hidden => header.set_hidden(true),
                PullFeedback::Visible { ratio } => {
                    header.set_hidden(false);
                    if let Some(ratio) = ratio {
                        header.set_ratio(ratio);
                    }
                }
            }
        });
    }

    /// Release branch of the header evaluator, shared with manual refresh
    fn commit_if_pulled(&mut self) -> bool {
        let trigger = self.config.trigger_ratio;
        let phase = self.header_phase;
        let committed = self.header.with(|header| {
            if header.is_spinning() {
                return false;
            }
            if !header::should_commit(header.ratio(), trigger) {
                return false;
            }
            if phase != HeaderPhase::Idle {
                debug!(?phase, "Refresh already in progress");
                return false;
            }
            header.start_spin();
            true
        });
        if committed != Some(true) {
            return false;
        }

        self.header_phase = HeaderPhase::Committing;
        let top = self.config.header_height * 2.0;
        let transition = Transition::over(self.config.inset_animation());
        info!(top_inset = top, "Pull-to-refresh committed");
        self.surface.set_top_inset(top, transition);
        if !transition.is_animated() {
            self.on_inset_settled();
        }
        true
    }

    fn evaluate_footer(&mut self, metrics: &ScrollMetrics) {
        if footer::should_prefetch(metrics) && !self.is_loading() {
            let request = self.issue(LoadKind::Older);
            // flag first: events arriving before the request resolves must see it
            self.footer_phase = FooterPhase::Loading {
                request: request.id,
                since: self.clock,
            };
            info!(
                request = %request.id,
                delta_left = metrics.delta_left(),
                "Loading older items"
            );
            self.source.load_older(request);
        }

        if footer::is_overscrolled(metrics) && self.is_loading() {
            self.footer.with(|footer| footer.start_spin());
        }
    }

    fn issue(&mut self, kind: LoadKind) -> LoadRequest {
        self.next_request += 1;
        LoadRequest {
            id: RequestId(self.next_request),
            kind,
        }
    }
}

fn log_outcome(kind: LoadKind, id: RequestId, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded { items } => {
            info!(request = %id, %kind, items, "Load completed")
        }
        LoadOutcome::Failed { reason } => {
            warn!(request = %id, %kind, reason = %reason, "Load failed")
        }
    }
}
