//! The shared refresh record and its transition rules.
//!
//! One record per control instance: Idle → Pulling → Armed → Refreshing →
//! Resetting → Idle. Offset samples and release events mutate it here; the
//! coordinator drives the reset tail. Every change notifies watchers once.

use crate::offset::{track_offset, ARM_THRESHOLD};
use notchpull_core::{WatchHandle, WatcherRegistry};
use std::cell::RefCell;
use std::rc::Rc;

/// Read-only view of the control's published fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefreshSnapshot {
    /// Rebased offset of the latest sample; keeps updating while armed.
    pub content_offset: f32,
    /// Pull-distance signal; the reset animation writes its keyframes here.
    pub scroll_offset: f32,
    /// Normalized pull distance in `[0, 1]`, pinned while armed.
    pub progress: f32,
    /// The release crossed the threshold; latched until the cycle completes.
    pub armed: bool,
    /// A refresh is in flight (spinner showing, re-arming blocked).
    pub refreshing: bool,
}

impl Default for RefreshSnapshot {
    fn default() -> Self {
        Self {
            content_offset: 0.0,
            scroll_offset: 0.0,
            progress: 0.0,
            armed: false,
            refreshing: false,
        }
    }
}

/// Authoritative holder of the refresh record.
///
/// Clones share the record; all mutation happens through methods here so the
/// watcher notification and the arming/refreshing latches cannot be bypassed.
#[derive(Clone)]
pub struct RefreshState {
    inner: Rc<StateInner>,
}

struct StateInner {
    fields: RefCell<RefreshSnapshot>,
    watchers: WatcherRegistry,
    impact: RefCell<Option<Rc<dyn Fn()>>>,
}

impl RefreshState {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StateInner {
                fields: RefCell::new(RefreshSnapshot::default()),
                watchers: WatcherRegistry::new(),
                impact: RefCell::new(None),
            }),
        }
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        *self.inner.fields.borrow()
    }

    /// Read-only subscription; fires after any field changes.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> WatchHandle {
        self.inner.watchers.subscribe(callback)
    }

    /// Installs the side-effect hook fired when a cycle commits to
    /// refreshing (the host typically triggers haptic feedback here).
    pub fn set_impact_hook(&self, hook: impl Fn() + 'static) {
        self.inner.impact.borrow_mut().replace(Rc::new(hook));
    }

    /// Feeds one raw offset sample from the scroll container.
    ///
    /// While unarmed this recomputes the pull signal; while armed only
    /// `content_offset` moves. A sample that observes `armed` without an
    /// in-flight refresh commits the cycle: `refreshing` rises and the
    /// impact hook fires, both exactly once per arming.
    pub fn on_offset_sample(&self, raw_offset: f32) {
        let mut commit = false;
        self.update(|fields| {
            let tracked = track_offset(raw_offset, fields.armed);
            fields.content_offset = tracked.content_offset;
            if let Some(pull) = tracked.pull {
                fields.scroll_offset = pull.scroll_offset;
                fields.progress = pull.progress;
            }
            if fields.armed && !fields.refreshing {
                fields.refreshing = true;
                commit = true;
            }
        });
        if commit {
            let hook = self.inner.impact.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
        }
    }

    /// Applies the release-time arming decision.
    ///
    /// This is the single moment gesture input can change `armed`; move
    /// events never reach here, and a release while a refresh is in flight
    /// is ignored.
    pub fn on_release(&self) {
        if self.inner.fields.borrow().refreshing {
            return;
        }
        self.update(|fields| {
            fields.armed = fields.scroll_offset > ARM_THRESHOLD;
        });
    }

    /// Mutates the record, notifying watchers only if a field changed.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut RefreshSnapshot)) {
        let changed = {
            let mut fields = self.inner.fields.borrow_mut();
            let before = *fields;
            mutate(&mut fields);
            *fields != before
        };
        if changed {
            self.inner.watchers.notify();
        }
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
