//! Pan-gesture observation plumbing.
//!
//! A host view forwards its pan lifecycle into a [`PanEventSource`]; anything
//! interested registers a [`PanObserver`] against that source. There is no
//! global window or root-view lookup: the host decides which view's gestures
//! a control sees by handing it the matching source.

pub mod pan;
pub mod source;

pub use pan::{PanEvent, PanPhase};
pub use source::{PanEventSource, PanObserver, PanRegistration};
