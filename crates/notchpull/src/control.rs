//! Public control facade.

use crate::coordinator::{RefreshComplete, RefreshCoordinator};
use crate::monitor::ReleaseMonitor;
use crate::offset::ARM_THRESHOLD;
use crate::state::{RefreshSnapshot, RefreshState};
use notchpull_core::{Scheduler, WatchHandle};
use notchpull_gesture::{PanEventSource, PanRegistration};
use std::cell::RefCell;
use std::rc::Rc;

/// Configuration surface of the control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Pass-through for the scroll container's native indicator visibility.
    pub show_indicator: bool,
}

/// Scroll-linked pull-to-refresh control.
///
/// The host wires three things: offset samples into
/// [`on_scroll_offset`](Self::on_scroll_offset), pan events into an attached
/// [`PanEventSource`], and the scheduler into its event loop. Renderers
/// subscribe and read [`snapshot`](Self::snapshot).
pub struct PullRefreshControl {
    config: RefreshConfig,
    state: RefreshState,
    monitor: Rc<ReleaseMonitor>,
    _coordinator: RefreshCoordinator,
    attachment: RefCell<Option<PanRegistration>>,
}

impl PullRefreshControl {
    /// Creates a control that runs `on_refresh` once per completed pull.
    ///
    /// The action receives a [`RefreshComplete`] handle and may take as long
    /// as it needs; the collapse animation starts when the handle signals.
    pub fn new(
        scheduler: &Scheduler,
        config: RefreshConfig,
        on_refresh: impl Fn(RefreshComplete) + 'static,
    ) -> Self {
        let state = RefreshState::new();
        let coordinator =
            RefreshCoordinator::new(scheduler.clone(), state.clone(), Rc::new(on_refresh));
        let monitor = Rc::new(ReleaseMonitor::new(state.clone()));
        Self {
            config,
            state,
            monitor,
            _coordinator: coordinator,
            attachment: RefCell::new(None),
        }
    }

    /// Starts observing `source` for gesture releases.
    ///
    /// A control that is never attached simply never arms. Attaching again
    /// replaces the previous registration.
    pub fn attach(&self, source: &PanEventSource) {
        let registration = source.add_observer(self.monitor.clone());
        if self.attachment.borrow_mut().replace(registration).is_some() {
            log::warn!("pull-refresh control attached while already attached; replacing");
        }
    }

    /// Stops observing the previously attached source, if any.
    pub fn detach(&self) {
        self.attachment.borrow_mut().take();
    }

    /// Feeds one raw content-offset sample from the host scroll container.
    pub fn on_scroll_offset(&self, raw_offset: f32) {
        self.state.on_offset_sample(raw_offset);
    }

    /// Height of the spacer the host overlays at the top of its scrollable
    /// content to create the pull travel.
    pub fn spacer_height(&self) -> f32 {
        ARM_THRESHOLD * self.state.snapshot().progress
    }

    /// Current published fields.
    pub fn snapshot(&self) -> RefreshSnapshot {
        self.state.snapshot()
    }

    /// Read-only subscription; fires whenever any published field changes.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> WatchHandle {
        self.state.subscribe(callback)
    }

    /// Installs the side-effect hook fired when a cycle commits to
    /// refreshing (typically haptic feedback).
    pub fn set_impact_hook(&self, hook: impl Fn() + 'static) {
        self.state.set_impact_hook(hook);
    }

    pub fn show_indicator(&self) -> bool {
        self.config.show_indicator
    }
}
