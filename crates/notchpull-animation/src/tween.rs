//! Frame-driven tween animation.
//!
//! A [`Tween`] registers a one-shot frame callback per tick, measures elapsed
//! time from its first frame, and reports the eased fraction until it lands
//! on the target. The scheduler is the only clock involved.

use crate::easing::Easing;
use notchpull_core::{FrameRegistration, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;

/// Duration and easing for one tween run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl TweenSpec {
    pub fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }

    pub fn linear(duration_ms: u64) -> Self {
        Self::new(duration_ms, Easing::Linear)
    }

    pub fn ease_in_out(duration_ms: u64) -> Self {
        Self::new(duration_ms, Easing::EaseInOut)
    }
}

/// Values a tween can interpolate.
pub trait Lerp {
    /// Interpolates from `self` toward `target`.
    ///
    /// Implementations must return `target` exactly at `fraction == 1.0` so a
    /// finished animation lands on its target bit-for-bit.
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        if fraction >= 1.0 {
            *target
        } else {
            self + (target - self) * fraction
        }
    }
}

/// A running tween. Dropping it cancels any remaining frames; `on_end` then
/// never runs.
pub struct Tween {
    inner: Rc<RefCell<TweenInner>>,
}

struct TweenInner {
    scheduler: Scheduler,
    spec: TweenSpec,
    start_time_ms: Option<u64>,
    on_frame: Rc<dyn Fn(f32)>,
    on_end: Option<Box<dyn FnOnce()>>,
    registration: Option<FrameRegistration>,
    finished: bool,
}

impl Tween {
    /// Starts a tween on `scheduler`.
    ///
    /// `on_frame` receives the eased fraction in `[0, 1]` once per tick,
    /// starting at `0.0` on the first tick after `start` and ending with an
    /// exact `1.0`. `on_end` runs once, after that final frame.
    pub fn start(
        scheduler: &Scheduler,
        spec: TweenSpec,
        on_frame: impl Fn(f32) + 'static,
        on_end: impl FnOnce() + 'static,
    ) -> Self {
        let inner = Rc::new(RefCell::new(TweenInner {
            scheduler: scheduler.clone(),
            spec,
            start_time_ms: None,
            on_frame: Rc::new(on_frame),
            on_end: Some(Box::new(on_end)),
            registration: None,
            finished: false,
        }));
        Self::schedule(&inner);
        Self { inner }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.borrow().finished
    }

    fn schedule(inner: &Rc<RefCell<TweenInner>>) {
        let scheduler = inner.borrow().scheduler.clone();
        let weak = Rc::downgrade(inner);
        let registration = scheduler.with_frame(move |now_ms| {
            if let Some(inner) = weak.upgrade() {
                Self::on_frame_tick(&inner, now_ms);
            }
        });
        inner.borrow_mut().registration = Some(registration);
    }

    fn on_frame_tick(inner: &Rc<RefCell<TweenInner>>, now_ms: u64) {
        // Compute under the borrow, invoke callbacks outside it: a frame
        // callback may re-enter anything that observes this tween.
        let (on_frame, eased, finished) = {
            let mut tween = inner.borrow_mut();
            tween.registration = None;
            let start = *tween.start_time_ms.get_or_insert(now_ms);
            let duration = tween.spec.duration_ms.max(1);
            let linear = (now_ms.saturating_sub(start) as f32 / duration as f32).min(1.0);
            let finished = linear >= 1.0;
            tween.finished = finished;
            (
                Rc::clone(&tween.on_frame),
                tween.spec.easing.transform(linear),
                finished,
            )
        };

        on_frame(eased);

        if finished {
            let on_end = inner.borrow_mut().on_end.take();
            if let Some(on_end) = on_end {
                on_end();
            }
        } else {
            Self::schedule(inner);
        }
    }
}

#[cfg(test)]
#[path = "tests/tween_tests.rs"]
mod tests;
