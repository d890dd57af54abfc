//! Staged refresh sequencing.
//!
//! Watches the record for the `refreshing` rising edge and, only on that
//! edge, drives dwell → refresh action → collapse tween → overshoot dwell →
//! settle tween on the scheduler. The state machine itself holds no timers;
//! everything time-based lives here so tests can advance it synchronously.

use crate::state::RefreshState;
use notchpull_animation::{Lerp, Tween, TweenSpec};
use notchpull_core::{Scheduler, TimerRegistration, WatchHandle};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Minimum spinner dwell before the refresh action runs, in milliseconds.
/// Guarantees the spinner is readable even when the action resolves
/// instantly.
pub const MIN_REFRESH_DWELL_MS: u64 = 1000;

/// Duration of each reset tween (collapse and settle), in milliseconds.
pub const COLLAPSE_ANIM_MS: u64 = 250;

/// Pause between the collapse and settle tweens, in milliseconds.
pub const OVERSHOOT_DWELL_MS: u64 = 300;

/// First collapse keyframe, slightly past the rest offset so the retraction
/// overshoots before settling.
pub const OVERSHOOT_OFFSET: f32 = -7.0;

/// Completion signal handed to the refresh action.
///
/// One-shot: calling [`RefreshComplete::finish`] — or dropping the handle,
/// however that happens — resumes the collapse sequence. There is no error
/// channel; the collapse runs the same way regardless of how the refresh
/// went.
pub struct RefreshComplete {
    coordinator: Weak<CoordinatorInner>,
    done: Cell<bool>,
}

impl RefreshComplete {
    /// Signals that the refresh action has finished.
    pub fn finish(self) {
        // Consuming self triggers the Drop signal.
    }

    fn signal(&self) {
        if self.done.replace(true) {
            return;
        }
        if let Some(inner) = self.coordinator.upgrade() {
            RefreshCoordinator::begin_collapse(&inner);
        }
    }
}

impl Drop for RefreshComplete {
    fn drop(&mut self) {
        self.signal();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Dwell,
    AwaitingAction,
    Collapsing,
    Overshoot,
    Settling,
}

struct Sequence {
    stage: Stage,
    // Held only to keep the pending work alive; dropping a registration
    // cancels it.
    #[allow(dead_code)]
    timer: Option<TimerRegistration>,
    #[allow(dead_code)]
    tween: Option<Tween>,
}

pub(crate) struct RefreshCoordinator {
    inner: Rc<CoordinatorInner>,
    _watch: WatchHandle,
}

struct CoordinatorInner {
    scheduler: Scheduler,
    state: RefreshState,
    action: Rc<dyn Fn(RefreshComplete)>,
    saw_refreshing: Cell<bool>,
    sequence: RefCell<Option<Sequence>>,
}

impl RefreshCoordinator {
    pub(crate) fn new(
        scheduler: Scheduler,
        state: RefreshState,
        action: Rc<dyn Fn(RefreshComplete)>,
    ) -> Self {
        let inner = Rc::new(CoordinatorInner {
            scheduler,
            state: state.clone(),
            action,
            saw_refreshing: Cell::new(false),
            sequence: RefCell::new(None),
        });
        let weak = Rc::downgrade(&inner);
        let watch = state.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                Self::on_state_changed(&inner);
            }
        });
        Self {
            inner,
            _watch: watch,
        }
    }

    fn on_state_changed(inner: &Rc<CoordinatorInner>) {
        let refreshing = inner.state.snapshot().refreshing;
        let rising = refreshing && !inner.saw_refreshing.get();
        inner.saw_refreshing.set(refreshing);
        if !rising {
            return;
        }
        if inner.sequence.borrow().is_some() {
            // A pull re-armed while the reset tail was still running; the
            // edge is picked up again when the running sequence completes.
            log::warn!("refresh committed while a reset sequence is running; deferred");
            return;
        }
        Self::start_sequence(inner);
    }

    fn start_sequence(inner: &Rc<CoordinatorInner>) {
        log::debug!("refresh sequence started");
        let weak = Rc::downgrade(inner);
        let timer = inner
            .scheduler
            .schedule_timer(MIN_REFRESH_DWELL_MS, move |_| {
                if let Some(inner) = weak.upgrade() {
                    Self::run_action(&inner);
                }
            });
        inner.sequence.borrow_mut().replace(Sequence {
            stage: Stage::Dwell,
            timer: Some(timer),
            tween: None,
        });
    }

    fn run_action(inner: &Rc<CoordinatorInner>) {
        {
            let mut sequence = inner.sequence.borrow_mut();
            let Some(sequence) = sequence.as_mut() else {
                return;
            };
            sequence.stage = Stage::AwaitingAction;
            sequence.timer = None;
        }
        let handle = RefreshComplete {
            coordinator: Rc::downgrade(inner),
            done: Cell::new(false),
        };
        // The action may signal synchronously; no borrows are held here.
        (inner.action)(handle);
    }

    fn begin_collapse(inner: &Rc<CoordinatorInner>) {
        {
            let mut sequence = inner.sequence.borrow_mut();
            match sequence.as_mut() {
                Some(sequence) if sequence.stage == Stage::AwaitingAction => {
                    sequence.stage = Stage::Collapsing;
                }
                _ => {
                    log::warn!("stray refresh completion ignored");
                    return;
                }
            }
        }

        let start = inner.state.snapshot();
        let state = inner.state.clone();
        let weak = Rc::downgrade(inner);
        let tween = Tween::start(
            &inner.scheduler,
            TweenSpec::ease_in_out(COLLAPSE_ANIM_MS),
            move |fraction| {
                state.update(|fields| {
                    fields.progress = start.progress.lerp(&0.0, fraction);
                    fields.scroll_offset = start.scroll_offset.lerp(&OVERSHOOT_OFFSET, fraction);
                });
            },
            move || {
                if let Some(inner) = weak.upgrade() {
                    Self::finish_collapse(&inner);
                }
            },
        );
        if let Some(sequence) = inner.sequence.borrow_mut().as_mut() {
            sequence.tween = Some(tween);
        }
    }

    fn finish_collapse(inner: &Rc<CoordinatorInner>) {
        // The latches open when the collapse lands: `refreshing` has covered
        // the whole spinner-plus-collapse window, and `armed` stayed pinned
        // until here so no sample recomputed the pull signal mid-reset.
        inner.state.update(|fields| {
            fields.armed = false;
            fields.refreshing = false;
        });

        let weak = Rc::downgrade(inner);
        let timer = inner
            .scheduler
            .schedule_timer(OVERSHOOT_DWELL_MS, move |_| {
                if let Some(inner) = weak.upgrade() {
                    Self::begin_settle(&inner);
                }
            });
        if let Some(sequence) = inner.sequence.borrow_mut().as_mut() {
            sequence.stage = Stage::Overshoot;
            sequence.tween = None;
            sequence.timer = Some(timer);
        }
    }

    fn begin_settle(inner: &Rc<CoordinatorInner>) {
        let start = inner.state.snapshot();
        let state = inner.state.clone();
        let weak = Rc::downgrade(inner);
        let tween = Tween::start(
            &inner.scheduler,
            TweenSpec::ease_in_out(COLLAPSE_ANIM_MS),
            move |fraction| {
                state.update(|fields| {
                    fields.scroll_offset = start.scroll_offset.lerp(&0.0, fraction);
                });
            },
            move || {
                if let Some(inner) = weak.upgrade() {
                    Self::finish_sequence(&inner);
                }
            },
        );
        if let Some(sequence) = inner.sequence.borrow_mut().as_mut() {
            sequence.stage = Stage::Settling;
            sequence.timer = None;
            sequence.tween = Some(tween);
        }
    }

    fn finish_sequence(inner: &Rc<CoordinatorInner>) {
        inner.sequence.borrow_mut().take();
        log::debug!("refresh sequence complete");

        // Pick up an edge that was deferred while the tail ran.
        if inner.state.snapshot().refreshing {
            Self::start_sequence(inner);
        }
    }
}

#[cfg(test)]
#[path = "tests/cycle_tests.rs"]
mod tests;
