//! Explicit state-change notification.
//!
//! State holders keep a `WatcherRegistry` and call [`WatcherRegistry::notify`]
//! after every mutation that changed a published field. Renderers subscribe a
//! callback and pull the fields they need when it fires; the registry carries
//! no payload so subscribers never observe a half-applied mutation.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Callback list keyed by registration id.
///
/// Multiple listeners, id-based removal, no ordering guarantees between
/// callbacks.
#[derive(Clone)]
pub struct WatcherRegistry {
    inner: Rc<RegistryInner>,
}

struct RegistryInner {
    next_id: Cell<u64>,
    callbacks: RefCell<FxHashMap<u64, Rc<dyn Fn()>>>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                next_id: Cell::new(1),
                callbacks: RefCell::new(FxHashMap::default()),
            }),
        }
    }

    /// Registers `callback` and returns a handle that unsubscribes on drop.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> WatchHandle {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));
        WatchHandle {
            registry: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Invokes every registered callback once.
    ///
    /// Subscriptions added or handles dropped while a notification is in
    /// flight take effect from the next call.
    pub fn notify(&self) {
        let snapshot: SmallVec<[Rc<dyn Fn()>; 4]> = self
            .inner
            .callbacks
            .borrow()
            .values()
            .map(Rc::clone)
            .collect();
        for callback in snapshot {
            callback();
        }
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.callbacks.borrow().len()
    }
}

impl Default for WatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a subscription alive; dropping it unsubscribes.
pub struct WatchHandle {
    registry: Weak<RegistryInner>,
    id: Option<u64>,
}

impl WatchHandle {
    /// Explicitly ends the subscription.
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(registry) = self.registry.upgrade() {
                registry.callbacks.borrow_mut().remove(&id);
            }
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_reaches_every_subscriber() {
        let registry = WatcherRegistry::new();
        let hits = Rc::new(Cell::new(0));

        let a = Rc::clone(&hits);
        let _ha = registry.subscribe(move || a.set(a.get() + 1));
        let b = Rc::clone(&hits);
        let _hb = registry.subscribe(move || b.set(b.get() + 10));

        registry.notify();
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn dropped_handle_stops_receiving() {
        let registry = WatcherRegistry::new();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let handle = registry.subscribe(move || counter.set(counter.get() + 1));
        registry.notify();
        drop(handle);
        registry.notify();

        assert_eq!(hits.get(), 1);
        assert_eq!(registry.watcher_count(), 0);
    }

    #[test]
    fn subscribe_during_notify_fires_next_round() {
        let registry = WatcherRegistry::new();
        let late_hits = Rc::new(Cell::new(0));
        let late_handle: Rc<RefCell<Option<WatchHandle>>> = Rc::new(RefCell::new(None));

        let registry_inner = registry.clone();
        let late_hits_inner = Rc::clone(&late_hits);
        let late_handle_inner = Rc::clone(&late_handle);
        let _h = registry.subscribe(move || {
            if late_handle_inner.borrow().is_none() {
                let hits = Rc::clone(&late_hits_inner);
                let handle = registry_inner.subscribe(move || hits.set(hits.get() + 1));
                late_handle_inner.borrow_mut().replace(handle);
            }
        });

        registry.notify();
        assert_eq!(late_hits.get(), 0, "late subscriber must not fire mid-round");
        registry.notify();
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn unsubscribe_after_registry_drop_is_harmless() {
        let registry = WatcherRegistry::new();
        let handle = registry.subscribe(|| {});
        drop(registry);
        handle.unsubscribe();
    }
}
