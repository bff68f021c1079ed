//! Value animation controller
//!
//! Combines easing functions and timing helpers to move a single `f64`
//! (an inset edge or the content offset) towards a target over time.

use std::time::{Duration, Instant};

use super::easing::EasingType;
use super::timing::{is_complete, lerp, progress};

/// Active animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Animated scalar
///
/// Call `animate_to()` to begin an animation, then `update()` each frame
/// to advance the interpolated value.
#[derive(Debug, Clone, Default)]
pub struct ValueAnimator {
    animation: Option<ActiveAnimation>,
    easing: EasingType,
    current: f64,
}

impl ValueAnimator {
    pub fn new(value: f64) -> Self {
        Self {
            current: value,
            ..Default::default()
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final value after the running animation
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    /// Current interpolated value
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Set the value immediately, cancelling any animation
    pub fn set(&mut self, value: f64) {
        self.animation = None;
        self.current = value;
    }

    /// Start animating from the current value to `target`
    ///
    /// A zero duration jumps straight to the target.
    pub fn animate_to(&mut self, target: f64, duration: Duration, now: Instant) {
        if duration.is_zero() {
            self.set(target);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration,
            easing: self.easing,
        });
    }

    /// Advance the animation to `now`
    ///
    /// Returns `true` on the frame the animation finishes.
    pub fn update(&mut self, now: Instant) -> bool {
        let Some(anim) = &self.animation else {
            return false;
        };

        if is_complete(anim.start, anim.duration, now) {
            self.current = anim.to;
            self.animation = None;
            true
        } else {
            let t = progress(anim.start, anim.duration, now);
            self.current = lerp(anim.from, anim.to, anim.easing.apply(t));
            false
        }
    }

    /// Stop at the current value
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_250: Duration = Duration::from_millis(250);

    #[test]
    fn test_zero_duration_jumps() {
        let mut value = ValueAnimator::new(0.0);
        value.animate_to(80.0, Duration::ZERO, Instant::now());
        assert_eq!(value.current(), 80.0);
        assert!(!value.is_animating());
    }

    #[test]
    fn test_animation_reports_finish_once() {
        let start = Instant::now();
        let mut value = ValueAnimator::new(0.0).with_easing(EasingType::Linear);
        value.animate_to(80.0, MS_250, start);
        assert_eq!(value.target(), 80.0);

        assert!(!value.update(start + Duration::from_millis(125)));
        assert!((value.current() - 40.0).abs() < 0.001);

        assert!(value.update(start + MS_250));
        assert_eq!(value.current(), 80.0);
        assert!(!value.update(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_retarget_starts_from_current() {
        let start = Instant::now();
        let mut value = ValueAnimator::new(0.0).with_easing(EasingType::Linear);
        value.animate_to(100.0, MS_250, start);
        value.update(start + Duration::from_millis(125));

        value.animate_to(0.0, MS_250, start + Duration::from_millis(125));
        value.update(start + Duration::from_millis(125));
        assert!((value.current() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_cancel_keeps_value() {
        let start = Instant::now();
        let mut value = ValueAnimator::new(10.0).with_easing(EasingType::Linear);
        value.animate_to(20.0, MS_250, start);
        value.update(start + Duration::from_millis(125));
        value.cancel();
        assert!(!value.is_animating());
        assert!((value.current() - 15.0).abs() < 0.001);
    }
}
