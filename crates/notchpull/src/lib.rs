//! Scroll-linked pull-to-refresh with a notch-morph indicator.
//!
//! The control converts a continuous stream of scroll offsets plus discrete
//! pan release events into five published fields — `content_offset`,
//! `scroll_offset`, `progress`, `armed`, `refreshing` — that a renderer
//! draws the capsule morph, arrow, and spinner from. The full cycle:
//!
//! 1. Pulling recomputes `progress = clamp((offset - 59) / 150, 0, 1)`.
//! 2. Releasing past the threshold arms the control; the next sample commits
//!    the refresh and fires the impact hook.
//! 3. The coordinator dwells, runs the caller's refresh action, then resets
//!    with a two-stage overshoot animation back to rest.
//!
//! ```
//! use notchpull::{
//!     PanEvent, PanEventSource, PanPhase, PullRefreshControl, RefreshConfig, Scheduler,
//! };
//!
//! let scheduler = Scheduler::new();
//! let control = PullRefreshControl::new(&scheduler, RefreshConfig::default(), |done| {
//!     // kick off the reload, then signal completion
//!     done.finish();
//! });
//! let pan = PanEventSource::new();
//! control.attach(&pan);
//!
//! // Host scroll and gesture callbacks:
//! control.on_scroll_offset(59.0 + 200.0); // pulled past the threshold
//! pan.dispatch(&PanEvent::new(PanPhase::End, 200.0));
//! control.on_scroll_offset(59.0 + 200.0); // next sample commits the refresh
//! assert!(control.snapshot().refreshing);
//!
//! scheduler.advance_by(2_000); // dwell + collapse + settle
//! assert_eq!(control.snapshot().scroll_offset, 0.0);
//! ```

pub mod control;
pub mod coordinator;
pub mod monitor;
pub mod offset;
pub mod state;

pub use control::{PullRefreshControl, RefreshConfig};
pub use coordinator::{
    RefreshComplete, COLLAPSE_ANIM_MS, MIN_REFRESH_DWELL_MS, OVERSHOOT_DWELL_MS, OVERSHOOT_OFFSET,
};
pub use offset::{track_offset, PullSignal, TrackedOffset, ARM_THRESHOLD, OFFSET_BIAS};
pub use state::{RefreshSnapshot, RefreshState};

// The runtime and gesture seams hosts wire against.
pub use notchpull_core::{Scheduler, WatchHandle};
pub use notchpull_gesture::{PanEvent, PanEventSource, PanPhase};
