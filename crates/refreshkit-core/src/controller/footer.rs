//! Auto-load decisions for the footer.

use crate::geometry::ScrollMetrics;

/// Start loading older items while roughly two screens are left, so the
/// response usually lands before the footer scrolls into view
#[inline]
pub fn should_prefetch(metrics: &ScrollMetrics) -> bool {
    let delta_left = metrics.delta_left();
    metrics.offset > 0.0 && delta_left > 0.0 && delta_left < metrics.viewport_height * 2.0
}

/// The user scrolled fast enough to reach the footer while the load is
/// still running
///
/// Only reachable with a negative bottom inset: the remaining distance
/// must be positive and no larger than the inset's magnitude.
#[inline]
pub fn is_overscrolled(metrics: &ScrollMetrics) -> bool {
    let delta_left = metrics.delta_left();
    metrics.offset > 0.0 && delta_left > 0.0 && delta_left <= -metrics.insets.bottom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeInsets;

    #[test]
    fn test_prefetch_window() {
        // 900 left, under two 800pt screens
        assert!(should_prefetch(&ScrollMetrics::new(2000.0, 300.0, 800.0, EdgeInsets::default())));
        // 1700 left
        assert!(!should_prefetch(&ScrollMetrics::new(2500.0, 0.5, 800.0, EdgeInsets::default())));
        // at the top
        assert!(!should_prefetch(&ScrollMetrics::new(1000.0, 0.0, 800.0, EdgeInsets::default())));
        // nothing left
        assert!(!should_prefetch(&ScrollMetrics::new(2000.0, 1200.0, 800.0, EdgeInsets::default())));
    }

    #[test]
    fn test_overscroll_needs_negative_bottom_inset() {
        let near_end = ScrollMetrics::new(2000.0, 1170.0, 800.0, EdgeInsets::default());
        assert!(!is_overscrolled(&near_end));

        let with_inset = ScrollMetrics {
            insets: EdgeInsets::new(0.0, -40.0),
            ..near_end
        };
        assert!(is_overscrolled(&with_inset));

        let further_up = ScrollMetrics {
            offset: 1100.0,
            ..with_inset
        };
        assert!(!is_overscrolled(&further_up));
    }
}
