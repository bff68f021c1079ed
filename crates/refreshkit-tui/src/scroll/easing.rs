//! Easing curves for inset and offset animations
//!
//! Every curve maps progress in [0, 1] to [0, 1].

/// Acceleration curve of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingType {
    Linear,
    #[default]
    Cubic,
}

impl EasingType {
    /// Apply the easing function to a progress value
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::Cubic => cubic_ease_out(t),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}
