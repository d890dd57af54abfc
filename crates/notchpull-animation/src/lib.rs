//! Tween animation for the notchpull control.
//!
//! Time-based value interpolation with easing, driven by frame callbacks on a
//! [`notchpull_core::Scheduler`] so animations progress deterministically
//! under test.

pub mod easing;
pub mod tween;

pub use easing::Easing;
pub use tween::{Lerp, Tween, TweenSpec};
