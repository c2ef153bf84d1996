//! State management module
//!
//! This module contains the settings model and the shared application state.

pub mod app_state;
pub mod settings;

// Re-export main types
pub use app_state::AppState;
pub use settings::{Settings, SettingsError, WorkdayHours};
