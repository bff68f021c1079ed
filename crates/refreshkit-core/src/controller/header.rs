//! Pull-to-refresh decisions for the header.
//!
//! Pure functions; the controller applies the results to the widget.

use crate::config::RefreshConfig;

/// What the header should show while the user is dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PullFeedback {
    /// Not pulled far enough: hide the header
    Hidden,
    /// Pulled past the threshold. `ratio` is `None` when the raw ratio
    /// exceeds 1.0; the widget keeps its last value in that case.
    Visible { ratio: Option<f64> },
}

/// Whether the list is pulled past the point where the header shows
///
/// Strict comparison: an offset exactly at the threshold stays hidden.
#[inline]
pub fn past_threshold(offset: f64, top_inset: f64, hide_margin: f64) -> bool {
    offset < -top_inset - hide_margin
}

/// Pull progress for a pulled distance, measured against half the
/// header height per unit
///
/// Returns `None` for negative distances and for ratios above 1.0.
#[inline]
pub fn pull_ratio(distance: f64, header_height: f64) -> Option<f64> {
    if distance < 0.0 {
        return None;
    }
    let ratio = distance / header_height * 0.5;
    (ratio <= 1.0).then_some(ratio)
}

pub fn pull_feedback(offset: f64, top_inset: f64, config: &RefreshConfig) -> PullFeedback {
    if past_threshold(offset, top_inset, config.hide_margin) {
        PullFeedback::Visible {
            ratio: pull_ratio(offset.abs(), config.header_height),
        }
    } else {
        PullFeedback::Hidden
    }
}

/// Whether releasing the drag at `ratio` commits a refresh
#[inline]
pub fn should_commit(ratio: f64, trigger_ratio: f64) -> bool {
    ratio >= trigger_ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RefreshConfig {
        RefreshConfig {
            header_height: 40.0,
            hide_margin: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!past_threshold(-10.0, 0.0, 10.0));
        assert!(past_threshold(-10.5, 0.0, 10.0));
        assert!(!past_threshold(-30.0, 20.0, 10.0));
        assert!(past_threshold(-31.0, 20.0, 10.0));
    }

    #[test]
    fn test_visible_past_margin() {
        let feedback = pull_feedback(-15.0, 0.0, &config());
        assert_eq!(
            feedback,
            PullFeedback::Visible {
                ratio: Some(15.0 / 40.0 * 0.5)
            }
        );
    }

    #[test]
    fn test_hidden_inside_margin() {
        assert_eq!(pull_feedback(-5.0, 0.0, &config()), PullFeedback::Hidden);
        assert_eq!(pull_feedback(120.0, 0.0, &config()), PullFeedback::Hidden);
    }

    #[test]
    fn test_ratio_over_one_is_dropped() {
        assert_eq!(pull_ratio(80.0, 40.0), Some(1.0));
        assert_eq!(pull_ratio(81.0, 40.0), None);
        assert_eq!(pull_ratio(-1.0, 40.0), None);
        assert_eq!(
            pull_feedback(-200.0, 0.0, &config()),
            PullFeedback::Visible { ratio: None }
        );
    }

    #[test]
    fn test_commit_at_trigger() {
        assert!(should_commit(1.0, 1.0));
        assert!(!should_commit(0.99, 1.0));
    }
}
