//! Countdown core
//!
//! This module contains the tick-driven engine that turns the current time and
//! the workday settings into countdown snapshots and notification events.

pub mod clock;
pub mod countdown_state;
pub mod engine;
pub mod events;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown_state::CountdownState;
pub use engine::{CountdownEngine, NotificationGateState};
pub use events::{CountdownEvent, Milestone};
