//! API response structures

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::CountdownState;

/// Countdown snapshot as served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub current_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub time_remaining_seconds: i64,
    pub total_minutes_remaining: i64,
    pub formatted_time: String,
    pub is_workday_over: bool,
    pub is_overtime: bool,
    pub status_message: String,
    pub running: bool,
}

impl CountdownResponse {
    pub fn new(state: &CountdownState, running: bool) -> Self {
        Self {
            current_time: state.current_time(),
            end_time: state.end_time(),
            time_remaining_seconds: state.total_seconds_remaining(),
            total_minutes_remaining: state.total_minutes_remaining(),
            formatted_time: state.formatted_time(),
            is_workday_over: state.is_workday_over(),
            is_overtime: state.is_overtime(),
            status_message: state.status_message().to_string(),
            running,
        }
    }
}

/// Response for start/stop requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub running: bool,
    /// False when the countdown was already in the requested state
    pub changed: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ControlResponse {
    pub fn new(running: bool, changed: bool, message: impl Into<String>) -> Self {
        Self {
            running,
            changed,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}
