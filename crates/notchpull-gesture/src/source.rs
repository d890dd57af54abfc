//! Observer registration and event fan-out.

use crate::pan::PanEvent;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Receives pan events from a [`PanEventSource`].
pub trait PanObserver {
    fn on_pan_event(&self, event: &PanEvent);
}

/// Fan-out point for one host view's pan gesture.
///
/// Every observer sees every event, consumed or not — simultaneous
/// recognition is the source's job, deciding what to do with a consumed
/// event is each observer's.
#[derive(Clone)]
pub struct PanEventSource {
    inner: Rc<SourceInner>,
}

struct SourceInner {
    next_id: Cell<u64>,
    observers: RefCell<HashMap<u64, Rc<dyn PanObserver>>>,
}

impl PanEventSource {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SourceInner {
                next_id: Cell::new(1),
                observers: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Registers `observer`; dropping the returned registration removes it.
    pub fn add_observer(&self, observer: Rc<dyn PanObserver>) -> PanRegistration {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.observers.borrow_mut().insert(id, observer);
        log::trace!("pan observer {id} registered");
        PanRegistration {
            source: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Delivers one event to every registered observer.
    pub fn dispatch(&self, event: &PanEvent) {
        let observers: Vec<Rc<dyn PanObserver>> = self
            .inner
            .observers
            .borrow()
            .values()
            .map(Rc::clone)
            .collect();
        for observer in observers {
            observer.on_pan_event(event);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }
}

impl Default for PanEventSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps an observer registered; dropping it unregisters.
pub struct PanRegistration {
    source: Weak<SourceInner>,
    id: Option<u64>,
}

impl Drop for PanRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(source) = self.source.upgrade() {
                source.observers.borrow_mut().remove(&id);
                log::trace!("pan observer {id} removed");
            }
        }
    }
}
