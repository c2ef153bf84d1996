//! Background tasks module
//!
//! This module contains the tick driver and the event consumers that run
//! alongside the HTTP server.

pub mod countdown_ticker;
pub mod notification_dispatch;

// Re-export main functions
pub use countdown_ticker::countdown_ticker_task;
pub use notification_dispatch::{dispatch_event, notification_dispatch_task};
