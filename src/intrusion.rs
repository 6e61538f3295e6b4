//! Debounced perimeter crossing detection on top of the tracker.

mod event;
mod monitor;
mod state_machine;

pub use event::{AlertEvent, SessionId, Transition};
pub use monitor::{IntrusionConfig, IntrusionMonitor};
pub use state_machine::IntrusionState;
