//! Release-time arming.

use crate::state::RefreshState;
use notchpull_gesture::{PanEvent, PanObserver};

/// Pan observer feeding gesture releases into the refresh record.
///
/// Move events are deliberately ignored: arming is decided once, at release,
/// from the scroll offset the pull reached. The event is never consumed, so
/// the host's own scroll handling keeps running alongside.
pub struct ReleaseMonitor {
    state: RefreshState,
}

impl ReleaseMonitor {
    pub(crate) fn new(state: RefreshState) -> Self {
        Self { state }
    }
}

impl PanObserver for ReleaseMonitor {
    fn on_pan_event(&self, event: &PanEvent) {
        if event.phase().is_release() {
            self.state.on_release();
        }
    }
}
