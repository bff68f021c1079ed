//! Headless replay of scripted scroll sessions.
//!
//! A [`ScrollTrace`] lists what the scrollable view, the data source and
//! the clock do, step by step. [`replay`] runs it against the recording
//! collaborators and reports the effects each step produced.
//!
//! ```toml
//! [[steps]]
//! step = "scroll"
//! content_height = 2000.0
//! offset = 300.0
//! viewport_height = 800.0
//!
//! [[steps]]
//! step = "complete"
//! kind = "older"
//! ```

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::RefreshConfig;
use crate::controller::RefreshController;
use crate::geometry::ScrollMetrics;
use crate::indicator::{FooterIndicator, HeaderIndicator, SupplementaryKind};
use crate::recording::{
    Effect, Journal, RecordingFooter, RecordingHeader, RecordingSource, RecordingSurface,
};
use crate::source::{LoadCompletion, LoadKind};

/// One scripted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    /// Scroll position changed
    Scroll(ScrollMetrics),
    /// The user lifted their finger
    DragEnd(ScrollMetrics),
    /// The running inset animation finished
    Settle,
    /// The oldest outstanding request of `kind` completes
    Complete {
        kind: LoadKind,
        #[serde(default)]
        items: usize,
        /// Complete with a failure instead
        #[serde(default)]
        failure: Option<String>,
    },
    /// Programmatic refresh
    ManualRefresh,
    /// Let time pass
    Advance { ms: u64 },
    /// Host creates (or recycles) an indicator view
    Bind { kind: SupplementaryKind },
    /// Host discards an indicator view
    #[serde(rename = "drop")]
    Discard { kind: SupplementaryKind },
    /// The header widget stops its spinner on its own
    HeaderSpinEnded,
}

impl TraceStep {
    /// Short label used in reports
    pub fn label(&self) -> String {
        match self {
            TraceStep::Scroll(m) => format!("scroll offset={}", m.offset),
            TraceStep::DragEnd(m) => format!("drag_end offset={}", m.offset),
            TraceStep::Settle => "settle".to_string(),
            TraceStep::Complete { kind, failure, .. } => match failure {
                Some(reason) => format!("complete {} (failed: {})", kind, reason),
                None => format!("complete {}", kind),
            },
            TraceStep::ManualRefresh => "manual_refresh".to_string(),
            TraceStep::Advance { ms } => format!("advance {}ms", ms),
            TraceStep::Bind { kind } => format!("bind {:?}", kind).to_lowercase(),
            TraceStep::Discard { kind } => format!("drop {:?}", kind).to_lowercase(),
            TraceStep::HeaderSpinEnded => "header_spin_ended".to_string(),
        }
    }
}

/// A scripted session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrollTrace {
    /// Overrides the configured refresh settings
    #[serde(default)]
    pub refresh: Option<RefreshConfig>,
    /// Bind both indicators before the first step
    #[serde(default = "default_true")]
    pub bind_indicators: bool,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

fn default_true() -> bool {
    true
}

impl ScrollTrace {
    /// Load a trace; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => toml::from_str(&content).map_err(|e| crate::Error::Trace(e.to_string())),
        }
    }
}

/// Effects produced by one step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub label: String,
    pub effects: Vec<Effect>,
}

/// Result of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    /// Backward load still outstanding at the end
    pub loading: bool,
    /// Final header phase
    pub header_phase: String,
    /// Requests issued and never completed
    pub outstanding: usize,
}

type RecordedController = RefreshController<RecordingSurface, RecordingSource>;

/// Indicator widgets owned by the replay, standing in for the host view
#[derive(Default)]
struct Widgets {
    header: Option<Rc<RefCell<dyn HeaderIndicator>>>,
    footer: Option<Rc<RefCell<dyn FooterIndicator>>>,
}

impl Widgets {
    /// Create a fresh widget of `kind` and bind it, replacing the old one
    fn bind(
        &mut self,
        controller: &mut RecordedController,
        journal: &Journal,
        kind: SupplementaryKind,
    ) {
        match kind {
            SupplementaryKind::Header => {
                let widget: Rc<RefCell<dyn HeaderIndicator>> = RecordingHeader::new(journal)
                    .ending_spin_on_restore()
                    .shared();
                controller.bind_header(&widget);
                self.header = Some(widget);
            }
            SupplementaryKind::Footer => {
                let widget: Rc<RefCell<dyn FooterIndicator>> =
                    RecordingFooter::new(journal).shared();
                controller.bind_footer(&widget);
                self.footer = Some(widget);
            }
        }
    }

    fn discard(&mut self, kind: SupplementaryKind) {
        match kind {
            SupplementaryKind::Header => self.header = None,
            SupplementaryKind::Footer => self.footer = None,
        }
    }
}

/// Run `trace` with `config` (unless the trace carries its own)
pub fn replay(trace: &ScrollTrace, config: RefreshConfig) -> crate::Result<ReplayReport> {
    let config = trace.refresh.clone().unwrap_or(config);
    let journal = Journal::new();
    let surface = RecordingSurface::new(&journal, config.base_insets);
    let source = RecordingSource::new(&journal);
    let mut controller = RefreshController::new(config, surface, source)?;

    let mut widgets = Widgets::default();
    if trace.bind_indicators {
        widgets.bind(&mut controller, &journal, SupplementaryKind::Header);
        widgets.bind(&mut controller, &journal, SupplementaryKind::Footer);
        journal.take();
    }

    let start = Instant::now();
    controller.tick(start);
    let mut elapsed = Duration::ZERO;
    let mut steps = Vec::with_capacity(trace.steps.len());

    for (index, step) in trace.steps.iter().enumerate() {
        match step {
            TraceStep::Scroll(metrics) => controller.on_scroll(*metrics),
            TraceStep::DragEnd(metrics) => controller.on_drag_end(*metrics),
            TraceStep::Settle => controller.on_inset_settled(),
            TraceStep::Complete {
                kind,
                items,
                failure,
            } => {
                let request = controller.source_mut().take_oldest(*kind).ok_or_else(|| {
                    crate::Error::Trace(format!(
                        "step {}: no outstanding {} request to complete",
                        index, kind
                    ))
                })?;
                let completion = match failure {
                    Some(reason) => LoadCompletion::failed(request.id, reason.clone()),
                    None => LoadCompletion::loaded(request.id, *items),
                };
                controller.complete(completion);
            }
            TraceStep::ManualRefresh => controller.refresh_manually(start + elapsed),
            TraceStep::Advance { ms } => {
                elapsed += Duration::from_millis(*ms);
                controller.tick(start + elapsed);
            }
            TraceStep::Bind { kind } => widgets.bind(&mut controller, &journal, *kind),
            TraceStep::Discard { kind } => widgets.discard(*kind),
            TraceStep::HeaderSpinEnded => {
                if let Some(widget) = &widgets.header {
                    widget.borrow_mut().end_spin();
                }
            }
        }

        steps.push(StepReport {
            index,
            label: step.label(),
            effects: journal.take(),
        });
    }

    Ok(ReplayReport {
        steps,
        loading: controller.is_loading(),
        header_phase: format!("{:?}", controller.header_phase()),
        outstanding: controller.source().pending().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RequestId;

    const SESSION: &str = r#"
        [[steps]]
        step = "scroll"
        content_height = 2000.0
        offset = 300.0
        viewport_height = 800.0

        [[steps]]
        step = "scroll"
        content_height = 2000.0
        offset = 400.0
        viewport_height = 800.0

        [[steps]]
        step = "complete"
        kind = "older"
        items = 20
    "#;

    #[test]
    fn test_toml_session_replays() {
        let trace: ScrollTrace = toml::from_str(SESSION).unwrap();
        assert!(trace.bind_indicators);

        let report = replay(&trace, RefreshConfig::default()).unwrap();

        assert_eq!(report.steps.len(), 3);
        assert!(report.steps[0].effects.contains(&Effect::LoadOlder {
            request: RequestId(1)
        }));
        assert!(!report.steps[1]
            .effects
            .iter()
            .any(|e| matches!(e, Effect::LoadOlder { .. })));
        assert_eq!(report.steps[2].effects, vec![Effect::FooterEndSpin]);
        assert!(!report.loading);
        assert_eq!(report.outstanding, 0);
    }

    #[test]
    fn test_refresh_cycle_from_json() {
        let trace: ScrollTrace = serde_json::from_str(
            r#"{
                "refresh": { "header_height": 40.0 },
                "steps": [
                    { "step": "scroll", "content_height": 2000.0, "offset": -80.0, "viewport_height": 800.0 },
                    { "step": "drag_end", "content_height": 2000.0, "offset": -80.0, "viewport_height": 800.0 },
                    { "step": "settle" },
                    { "step": "complete", "kind": "newer", "failure": "offline" },
                    { "step": "settle" }
                ]
            }"#,
        )
        .unwrap();

        let report = replay(&trace, RefreshConfig::default()).unwrap();

        assert!(report.steps[1].effects.contains(&Effect::HeaderStartSpin));
        assert_eq!(
            report.steps[2].effects,
            vec![Effect::LoadNewer {
                request: RequestId(1)
            }]
        );
        assert!(report.steps[3].effects.contains(&Effect::HeaderEndSpin));
        assert_eq!(report.header_phase, "Idle");
        assert_eq!(report.steps[3].label, "complete newer (failed: offline)");
    }

    #[test]
    fn test_complete_without_request_fails() {
        let trace = ScrollTrace {
            steps: vec![TraceStep::Complete {
                kind: LoadKind::Newer,
                items: 0,
                failure: None,
            }],
            ..Default::default()
        };

        let err = replay(&trace, RefreshConfig::default()).unwrap_err();
        assert!(matches!(err, crate::Error::Trace(_)));
    }

    #[test]
    fn test_manual_refresh_waits_for_clock() {
        let trace = ScrollTrace {
            bind_indicators: true,
            steps: vec![
                TraceStep::ManualRefresh,
                TraceStep::Advance { ms: 1000 },
                TraceStep::Advance { ms: 1000 },
            ],
            ..Default::default()
        };

        let report = replay(&trace, RefreshConfig::default()).unwrap();

        assert!(report.steps[1].effects.is_empty());
        assert!(report.steps[2].effects.contains(&Effect::HeaderStartSpin));
        assert_eq!(report.header_phase, "Committing");
    }

    #[test]
    fn test_watchdog_follows_trace_clock() {
        let trace = ScrollTrace {
            refresh: Some(RefreshConfig {
                load_timeout_ms: 3000,
                ..Default::default()
            }),
            steps: vec![
                TraceStep::Scroll(ScrollMetrics::new(2000.0, 300.0, 800.0, Default::default())),
                TraceStep::Advance { ms: 2999 },
                TraceStep::Advance { ms: 1 },
            ],
            ..Default::default()
        };

        let report = replay(&trace, RefreshConfig::default()).unwrap();

        assert!(report.steps[1].effects.is_empty());
        assert_eq!(report.steps[2].effects, vec![Effect::FooterEndSpin]);
        assert!(!report.loading);
        assert_eq!(report.outstanding, 1);
    }

    #[test]
    fn test_dropped_header_is_ignored() {
        let trace = ScrollTrace {
            bind_indicators: true,
            steps: vec![
                TraceStep::Discard {
                    kind: SupplementaryKind::Header,
                },
                TraceStep::Scroll(ScrollMetrics::new(2000.0, -50.0, 800.0, Default::default())),
            ],
            ..Default::default()
        };

        let report = replay(&trace, RefreshConfig::default()).unwrap();
        assert!(report.steps[1].effects.is_empty());
        assert_eq!(report.steps[0].label, "drop header");
    }
}
