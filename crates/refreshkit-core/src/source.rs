//! Data source seam: load requests go out, completions come back later.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier handed out with every load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Direction of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    /// Items newer than the top of the list (pull-to-refresh)
    Newer,
    /// Items older than the bottom of the list (auto-load)
    Older,
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadKind::Newer => f.write_str("newer"),
            LoadKind::Older => f.write_str("older"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub id: RequestId,
    pub kind: LoadKind,
}

/// What the data source reports back
///
/// The controller resets the same state for both outcomes; a failure
/// is only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { items: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCompletion {
    pub id: RequestId,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

impl LoadCompletion {
    pub fn loaded(id: RequestId, items: usize) -> Self {
        Self {
            id,
            outcome: LoadOutcome::Loaded { items },
        }
    }

    pub fn failed(id: RequestId, reason: impl Into<String>) -> Self {
        Self {
            id,
            outcome: LoadOutcome::Failed {
                reason: reason.into(),
            },
        }
    }
}

/// Receiver of load requests
///
/// Both calls must return immediately. Each request completes exactly
/// once, later, through
/// [`RefreshController::complete`](crate::RefreshController::complete).
pub trait DataSource {
    fn load_newer(&mut self, request: LoadRequest);

    fn load_older(&mut self, request: LoadRequest);
}
