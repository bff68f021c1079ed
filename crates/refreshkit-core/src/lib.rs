pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod indicator;
pub mod recording;
pub mod source;
pub mod surface;
pub mod trace;

pub use config::{AppConfig, RefreshConfig};
pub use controller::{FooterPhase, HeaderPhase, RefreshController};
pub use error::{Error, Result};
pub use geometry::{EdgeInsets, Point, ScrollMetrics, Size};
pub use indicator::{FooterIndicator, HeaderIndicator, SupplementaryKind};
pub use source::{DataSource, LoadCompletion, LoadKind, LoadOutcome, LoadRequest, RequestId};
pub use surface::{ScrollSurface, Transition};
