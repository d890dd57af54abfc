//! Host-driven frame and timer scheduling.
//!
//! The host owns the clock: it calls [`Scheduler::tick`] with the current
//! time (or [`Scheduler::tick_now`] to use wall time) and the scheduler fires
//! due timers and pending frame callbacks. Nothing here blocks or spawns
//! threads, so tests drive time forward synchronously with
//! [`Scheduler::advance_by`].

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use web_time::Instant;

/// Nominal frame interval used by [`Scheduler::advance_by`], in milliseconds.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// One-shot frame and timer callback dispatcher.
///
/// Cloning is cheap and shares the underlying queues.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

struct SchedulerInner {
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
    epoch: Cell<Option<Instant>>,
    frames: RefCell<FxHashMap<u64, Box<dyn FnOnce(u64)>>>,
    timers: RefCell<FxHashMap<u64, TimerEntry>>,
}

struct TimerEntry {
    deadline_ms: u64,
    callback: Box<dyn FnOnce(u64)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                now_ms: Cell::new(0),
                next_id: Cell::new(1),
                epoch: Cell::new(None),
                frames: RefCell::new(FxHashMap::default()),
                timers: RefCell::new(FxHashMap::default()),
            }),
        }
    }

    /// Current scheduler time, as of the last tick.
    pub fn now_ms(&self) -> u64 {
        self.inner.now_ms.get()
    }

    /// Registers a callback for the next tick. The callback receives the
    /// tick's time and runs exactly once; drop the registration to cancel.
    pub fn with_frame(&self, callback: impl FnOnce(u64) + 'static) -> FrameRegistration {
        let id = self.inner.allocate_id();
        self.inner.frames.borrow_mut().insert(id, Box::new(callback));
        FrameRegistration {
            scheduler: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Registers a callback to run on the first tick at or after
    /// `delay_ms` from now. Drop the registration to cancel.
    pub fn schedule_timer(
        &self,
        delay_ms: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> TimerRegistration {
        let id = self.inner.allocate_id();
        let deadline_ms = self.inner.now_ms.get().saturating_add(delay_ms);
        log::trace!("timer {id} scheduled for t={deadline_ms}ms");
        self.inner.timers.borrow_mut().insert(
            id,
            TimerEntry {
                deadline_ms,
                callback: Box::new(callback),
            },
        );
        TimerRegistration {
            scheduler: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Advances time to `now_ms` and fires everything due.
    ///
    /// Due timers run first, in deadline order, then the frame callbacks that
    /// were pending when the tick began. Callbacks registered while a tick is
    /// in flight run on the next tick. Time never moves backwards; a stale
    /// `now_ms` only pumps already-due work.
    pub fn tick(&self, now_ms: u64) {
        let now = self.inner.now_ms.get().max(now_ms);
        self.inner.now_ms.set(now);

        let pending: SmallVec<[u64; 4]> = self.inner.frames.borrow().keys().copied().collect();

        let mut due: SmallVec<[(u64, u64); 4]> = self
            .inner
            .timers
            .borrow()
            .iter()
            .filter(|(_, entry)| entry.deadline_ms <= now)
            .map(|(id, entry)| (entry.deadline_ms, *id))
            .collect();
        due.sort_unstable();
        for (_, id) in due {
            let entry = self.inner.timers.borrow_mut().remove(&id);
            if let Some(entry) = entry {
                (entry.callback)(now);
            }
        }

        for id in pending {
            let callback = self.inner.frames.borrow_mut().remove(&id);
            if let Some(callback) = callback {
                callback(now);
            }
        }
    }

    /// Ticks using wall-clock time, measured from the first call.
    pub fn tick_now(&self) {
        let epoch = match self.inner.epoch.get() {
            Some(epoch) => epoch,
            None => {
                let epoch = Instant::now();
                self.inner.epoch.set(Some(epoch));
                epoch
            }
        };
        self.tick(epoch.elapsed().as_millis() as u64);
    }

    /// Advances simulated time by `duration_ms`, ticking at
    /// [`FRAME_INTERVAL_MS`] steps so frame-driven work progresses the way it
    /// would under a real event loop.
    pub fn advance_by(&self, duration_ms: u64) {
        let target = self.inner.now_ms.get() + duration_ms;
        loop {
            let now = self.inner.now_ms.get();
            if now >= target {
                break;
            }
            self.tick(target.min(now + FRAME_INTERVAL_MS));
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerInner {
    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

/// Keeps a frame callback alive; dropping it cancels the callback.
pub struct FrameRegistration {
    scheduler: Weak<SchedulerInner>,
    id: Option<u64>,
}

impl FrameRegistration {
    pub fn cancel(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(scheduler) = self.scheduler.upgrade() {
                scheduler.frames.borrow_mut().remove(&id);
            }
        }
    }
}

impl Drop for FrameRegistration {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Keeps a timer alive; dropping it cancels the timer.
pub struct TimerRegistration {
    scheduler: Weak<SchedulerInner>,
    id: Option<u64>,
}

impl TimerRegistration {
    pub fn cancel(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(scheduler) = self.scheduler.upgrade() {
                scheduler.timers.borrow_mut().remove(&id);
            }
        }
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
#[path = "tests/scheduler_tests.rs"]
mod tests;
