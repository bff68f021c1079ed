use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use refreshkit_core::{
    AppConfig, FooterIndicator, FooterPhase, HeaderIndicator, HeaderPhase, LoadKind, LoadOutcome,
    RefreshConfig, RefreshController, ScrollSurface, SupplementaryKind, Transition,
};
use tokio::sync::mpsc;
use tracing::info;

use crate::event::LoadResult;
use crate::indicator::{LoadFooter, RefreshHeader};
use crate::input::Action;
use crate::scroll::ListViewport;
use crate::source::{DemoDataSource, FeedItem};
use crate::theme::Theme;

pub type DemoController = RefreshController<ListViewport, DemoDataSource>;

/// Bottom inset the list rests at
///
/// The load-more footer sits just past the scrollable range, hidden by a
/// negative bottom inset, so reaching the end while a load is running
/// brings it into play.
fn resting_bottom(configured: f64, refresh: &RefreshConfig) -> f64 {
    if refresh.footer_refresh_enabled {
        configured - refresh.footer_height
    } else {
        configured
    }
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: AppConfig,
    pub controller: DemoController,
    /// Header widget; the controller only holds a weak binding to it
    pub header: Rc<RefCell<RefreshHeader>>,
    pub footer: Rc<RefCell<LoadFooter>>,
    /// Feed, newest first
    pub items: Vec<FeedItem>,
    pub theme: Theme,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// The status message reports a failure
    pub status_is_error: bool,
    /// Terminal row of the last drag position
    drag_row: Option<u16>,
}

impl App {
    pub fn new(config: AppConfig, tx: mpsc::UnboundedSender<LoadResult>) -> Result<Self> {
        let mut refresh = config.refresh.clone();
        refresh.base_insets.bottom = resting_bottom(config.refresh.base_insets.bottom, &refresh);
        let viewport = ListViewport::new(config.ui.units_per_row, refresh.base_insets);
        let mut source = DemoDataSource::new(
            tx,
            Duration::from_millis(config.ui.demo_latency_ms),
            config.ui.page_size,
        )
        .failing_every(config.ui.demo_fail_every);
        let items = source.initial_page();
        let controller = RefreshController::new(refresh, viewport, source)?;

        let mut app = Self {
            config,
            controller,
            header: RefreshHeader::shared(),
            footer: LoadFooter::shared(),
            items,
            theme: Theme::default(),
            should_quit: false,
            status_message: None,
            status_is_error: false,
            drag_row: None,
        };
        app.bind_indicators();
        app.sync_content();
        Ok(app)
    }

    /// Hand fresh indicator widgets to the controller, as a list view
    /// does when it recycles its supplementary views
    pub fn bind_indicators(&mut self) {
        self.header = RefreshHeader::shared();
        self.footer = LoadFooter::shared();
        let header: Rc<RefCell<dyn HeaderIndicator>> = self.header.clone();
        let footer: Rc<RefCell<dyn FooterIndicator>> = self.footer.clone();
        self.controller.bind_header(&header);
        self.controller.bind_footer(&footer);
    }

    pub fn viewport(&self) -> &ListViewport {
        self.controller.surface()
    }

    /// Height the list reserves below the items
    pub fn footer_height(&self) -> f64 {
        if self.controller.config().footer_refresh_enabled {
            self.controller.supplementary_size(SupplementaryKind::Footer).height
        } else {
            0.0
        }
    }

    /// Recompute content height after the item list changed
    fn sync_content(&mut self) {
        let units = self.viewport().units_per_row();
        let height = self.items.len() as f64 * units + self.footer_height();
        self.controller.surface_mut().set_content_height(height);
    }

    pub fn resize(&mut self, rows: u16) {
        self.controller.surface_mut().set_viewport_rows(rows);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    /// Rows and wheel ticks scroll the list the way momentum would
    fn scroll_by(&mut self, delta: f64) {
        if self.controller.surface_mut().scroll_by(delta) {
            let metrics = self.viewport().metrics();
            self.controller.on_scroll(metrics);
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        let units = self.viewport().units_per_row();
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollRows(rows) => self.scroll_by(rows as f64 * units),
            Action::ScrollPageDown => {
                let rows = self.viewport().viewport_rows();
                self.scroll_by(rows as f64 * units);
            }
            Action::ScrollPageUp => {
                let rows = self.viewport().viewport_rows();
                self.scroll_by(-(rows as f64) * units);
            }
            Action::JumpToTop => self.scroll_by(f64::NEG_INFINITY),
            Action::JumpToBottom => self.scroll_by(f64::INFINITY),
            Action::DragStart(row) => {
                self.drag_row = Some(row);
                self.controller.surface_mut().begin_drag();
            }
            Action::DragTo(row) => {
                if let Some(previous) = self.drag_row.replace(row) {
                    // Finger moving down pulls the content down
                    let delta = (previous as f64 - row as f64) * units;
                    if self.controller.surface_mut().drag_by(delta) {
                        let metrics = self.viewport().metrics();
                        self.controller.on_scroll(metrics);
                    }
                }
            }
            Action::DragEnd => {
                if self.drag_row.take().is_some() {
                    let metrics = self.viewport().metrics();
                    self.controller.on_drag_end(metrics);
                    self.controller.surface_mut().end_drag(now);
                }
            }
            Action::ManualRefresh => {
                if self.controller.config().header_refresh_enabled {
                    self.set_status("Refreshing…");
                }
                self.controller.refresh_manually(now);
            }
            Action::ToggleHeaderRefresh => {
                let mut config = self.controller.config().clone();
                config.header_refresh_enabled = !config.header_refresh_enabled;
                let enabled = config.header_refresh_enabled;
                self.apply_refresh_config(config, "Pull to refresh", enabled);
            }
            Action::ToggleFooterRefresh => {
                let mut config = self.controller.config().clone();
                config.footer_refresh_enabled = !config.footer_refresh_enabled;
                let enabled = config.footer_refresh_enabled;
                self.apply_refresh_config(config, "Auto-load", enabled);
            }
            Action::None => {}
        }
    }

    fn apply_refresh_config(&mut self, mut config: RefreshConfig, what: &str, enabled: bool) {
        config.base_insets.bottom = resting_bottom(self.config.refresh.base_insets.bottom, &config);
        let insets = config.base_insets;
        match self.controller.set_config(config) {
            Ok(()) => {
                let state = if enabled { "on" } else { "off" };
                self.set_status(format!("{} {}", what, state));
                self.controller
                    .surface_mut()
                    .set_content_insets(insets, Transition::Immediate);
                self.sync_content();
            }
            Err(e) => self.set_error(format!("{}", e)),
        }
    }

    /// A demo load finished
    pub fn on_load_result(&mut self, result: LoadResult) {
        let LoadResult {
            kind,
            completion,
            items,
        } = result;
        let id = completion.id;

        let outstanding = match kind {
            LoadKind::Newer => self.controller.header_phase() == HeaderPhase::Loading { request: id },
            LoadKind::Older => matches!(
                self.controller.footer_phase(),
                FooterPhase::Loading { request, .. } if request == id
            ),
        };

        if outstanding {
            match &completion.outcome {
                LoadOutcome::Loaded { .. } => {
                    let count = items.len();
                    match kind {
                        LoadKind::Newer => {
                            let older = std::mem::replace(&mut self.items, items);
                            self.items.extend(older);
                        }
                        LoadKind::Older => self.items.extend(items),
                    }
                    self.sync_content();
                    info!(%kind, count, total = self.items.len(), "Items inserted");
                    self.set_status(format!("Loaded {} {} items", count, kind));
                }
                LoadOutcome::Failed { reason } => {
                    self.set_error(format!("Loading {} items failed: {}", kind, reason));
                }
            }
        }

        self.controller.complete(completion);
    }

    /// Advance animations and time-based controller work
    pub fn animate(&mut self, now: Instant) {
        let update = self.controller.surface_mut().update(now);
        if update.scrolled {
            let metrics = self.viewport().metrics();
            self.controller.on_scroll(metrics);
        }
        if update.settled {
            self.controller.on_inset_settled();
        }
        self.controller.tick(now);
    }

    /// Tick spinner animations
    pub fn tick_spinner(&mut self) {
        self.header.borrow_mut().tick();
        self.footer.borrow_mut().tick();
    }

    /// Whether the next frame should come quickly
    pub fn needs_fast_update(&self) -> bool {
        self.viewport().is_animating()
    }

    /// Short description of the controller state for the status bar
    pub fn phase_label(&self) -> &'static str {
        match (self.controller.header_phase(), self.controller.footer_phase()) {
            (HeaderPhase::Committing, _) => "COMMIT",
            (HeaderPhase::Loading { .. }, _) => "REFRESH",
            (HeaderPhase::Restoring, _) => "RESTORE",
            (HeaderPhase::Idle, FooterPhase::Loading { .. }) => "LOADING",
            (HeaderPhase::Idle, FooterPhase::Idle) => "IDLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(rows: u16) -> (App, mpsc::UnboundedReceiver<LoadResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::new(AppConfig::default(), tx).unwrap();
        app.resize(rows);
        (app, rx)
    }

    fn after(ms: u64) -> Instant {
        Instant::now() + Duration::from_millis(ms)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pull_to_refresh_cycle() {
        let (mut app, mut rx) = app(40);
        assert_eq!(app.items.len(), 20);

        app.handle_action(Action::DragStart(5), Instant::now());
        app.handle_action(Action::DragTo(13), Instant::now());
        assert!(!app.header.borrow().is_hidden());
        app.handle_action(Action::DragTo(21), Instant::now());
        assert_eq!(app.header.borrow().ratio(), 1.0);

        app.handle_action(Action::DragEnd, Instant::now());
        assert!(app.header.borrow().is_spinning());
        assert_eq!(app.controller.header_phase(), HeaderPhase::Committing);

        app.animate(after(300));
        assert!(matches!(
            app.controller.header_phase(),
            HeaderPhase::Loading { .. }
        ));

        let result = rx.recv().await.unwrap();
        assert_eq!(result.kind, LoadKind::Newer);
        app.on_load_result(result);
        assert_eq!(app.items.len(), 40);
        assert_eq!(app.items[0].id, 40);
        assert_eq!(app.controller.header_phase(), HeaderPhase::Restoring);
        assert!(!app.header.borrow().is_spinning());

        app.animate(after(600));
        assert_eq!(app.controller.header_phase(), HeaderPhase::Idle);
        assert_eq!(app.viewport().offset(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrolling_near_end_loads_older() {
        let (mut app, mut rx) = app(10);

        app.handle_action(Action::ScrollRows(1), Instant::now());
        assert!(app.controller.is_loading());
        assert_eq!(app.phase_label(), "LOADING");

        app.handle_action(Action::ScrollRows(1), Instant::now());
        let result = rx.recv().await.unwrap();
        assert_eq!(result.kind, LoadKind::Older);
        app.on_load_result(result);

        assert!(!app.controller.is_loading());
        assert_eq!(app.items.len(), 40);
        assert_eq!(app.items.last().map(|i| i.id), Some(-19));
        // Only one request was ever issued
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_footer_spins_when_end_reached_while_loading() {
        let (mut app, mut rx) = app(10);
        assert_eq!(app.viewport().insets().bottom, -40.0);

        app.handle_action(Action::ScrollRows(1), Instant::now());
        assert!(app.controller.is_loading());
        assert!(!app.footer.borrow().is_spinning());

        app.handle_action(Action::JumpToBottom, Instant::now());
        let metrics = app.viewport().metrics();
        assert_eq!(metrics.delta_left(), 40.0);
        assert!(app.footer.borrow().is_spinning());
        assert!(!app.footer.borrow().is_hidden());

        app.on_load_result(rx.recv().await.unwrap());
        assert!(!app.footer.borrow().is_spinning());
        assert_eq!(app.items.len(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_footer_toggle_moves_bottom_inset() {
        let (mut app, _rx) = app(40);

        app.handle_action(Action::ToggleFooterRefresh, Instant::now());
        assert!(!app.controller.config().footer_refresh_enabled);
        assert_eq!(app.controller.config().base_insets.bottom, 0.0);
        assert_eq!(app.viewport().insets().bottom, 0.0);
        assert_eq!(app.footer_height(), 0.0);

        app.handle_action(Action::ToggleFooterRefresh, Instant::now());
        assert_eq!(app.controller.config().base_insets.bottom, -40.0);
        assert_eq!(app.viewport().insets().bottom, -40.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_reenables_footer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut config = AppConfig::default();
        config.ui.demo_fail_every = 1;
        let mut app = App::new(config, tx).unwrap();
        app.resize(10);

        app.handle_action(Action::ScrollRows(1), Instant::now());
        app.on_load_result(rx.recv().await.unwrap());

        assert!(!app.controller.is_loading());
        assert_eq!(app.items.len(), 20);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("failed")));
        assert!(app.status_is_error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_refused_while_loading() {
        let (mut app, _rx) = app(10);
        app.handle_action(Action::ScrollRows(1), Instant::now());

        app.handle_action(Action::ToggleFooterRefresh, Instant::now());
        assert!(app.controller.config().footer_refresh_enabled);
        assert!(app.status_message.is_some());
        assert!(app.status_is_error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_commits_after_delay() {
        let (mut app, _rx) = app(40);
        let start = Instant::now();

        app.handle_action(Action::ManualRefresh, start);
        app.animate(start + Duration::from_millis(1000));
        assert_eq!(app.controller.header_phase(), HeaderPhase::Idle);

        app.animate(start + Duration::from_millis(2000));
        assert_eq!(app.controller.header_phase(), HeaderPhase::Committing);
        assert!(app.header.borrow().is_spinning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebound_indicators_start_hidden() {
        let (mut app, _rx) = app(40);
        app.handle_action(Action::DragStart(0), Instant::now());
        app.handle_action(Action::DragTo(8), Instant::now());
        assert!(!app.header.borrow().is_hidden());

        app.bind_indicators();
        assert!(app.header.borrow().is_hidden());
        assert!(app.controller.header_binding().is_alive());
    }
}
