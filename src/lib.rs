//! How Much Longer - A workday countdown with milestone notifications
//!
//! This library provides the countdown engine that tracks the time left until
//! the end of the workday, the notification and settings collaborators around
//! it, and a small HTTP API exposing the live countdown.

pub mod config;
pub mod countdown;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use countdown::{CountdownEngine, CountdownEvent, CountdownState};
pub use state::{AppState, Settings};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
