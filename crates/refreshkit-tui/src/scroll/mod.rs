//! Animated scroll geometry for the terminal list
//!
//! - `easing` - pure easing curves
//! - `timing` - progress and interpolation helpers
//! - `animation` - [`ValueAnimator`], one animated scalar
//! - `viewport` - [`ListViewport`], the scroll view the controller drives

pub mod animation;
pub mod easing;
pub mod timing;
pub mod viewport;

pub use animation::ValueAnimator;
pub use easing::EasingType;
pub use viewport::{ListViewport, ViewportUpdate};
