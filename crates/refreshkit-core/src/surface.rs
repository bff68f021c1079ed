//! Mutations the controller requests from the scrollable view.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::{EdgeInsets, Point};

/// How the view should apply a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Apply right away
    Immediate,
    /// Animate over the given duration
    Animated(#[serde(with = "millis")] Duration),
}

impl Transition {
    /// Animated unless the duration is zero
    pub fn over(duration: Duration) -> Self {
        if duration.is_zero() {
            Transition::Immediate
        } else {
            Transition::Animated(duration)
        }
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        matches!(self, Transition::Animated(_))
    }
}

/// The scrollable list view, as seen by the controller
///
/// Inset changes are fire-and-forget. When an animated inset change
/// finishes, the host must report it with
/// [`RefreshController::on_inset_settled`](crate::RefreshController::on_inset_settled).
/// Immediate inset changes are treated as settled on the spot.
pub trait ScrollSurface {
    fn set_top_inset(&mut self, top: f64, transition: Transition);

    fn set_content_insets(&mut self, insets: EdgeInsets, transition: Transition);

    fn set_content_offset(&mut self, offset: Point, transition: Transition);
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_is_immediate() {
        assert_eq!(Transition::over(Duration::ZERO), Transition::Immediate);
        assert!(Transition::over(Duration::from_millis(250)).is_animated());
    }

    #[test]
    fn test_transition_serializes_millis() {
        let json = serde_json::to_string(&Transition::Animated(Duration::from_millis(250))).unwrap();
        assert_eq!(json, r#"{"animated":250}"#);
    }
}
