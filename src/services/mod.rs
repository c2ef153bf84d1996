//! External collaborators module
//!
//! Settings persistence and notification rendering. Failures in here are
//! handled locally and never reach the countdown engine.

pub mod notifications;
pub mod settings_store;

// Re-export main types
pub use notifications::{
    hourly_message, DesktopDispatcher, LogDispatcher, NotificationDispatcher, RenderFn,
};
pub use settings_store::{FileSettingsStore, SettingsStore};
