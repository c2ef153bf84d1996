//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, Settings, WorkdayHours};
use super::responses::{ControlResponse, CountdownResponse, HealthResponse};

/// Handle GET /countdown - Latest countdown snapshot
pub async fn countdown_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownResponse>, StatusCode> {
    let running = state.is_running().map_err(|e| {
        error!("Failed to read countdown status: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match state.latest_state() {
        Some(countdown) => Ok(Json(CountdownResponse::new(&countdown, running))),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

/// Handle POST /countdown/start - Start ticking
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ControlResponse>, StatusCode> {
    match state.start_countdown() {
        Ok(changed) => {
            info!("Start endpoint called - countdown running");
            let message = if changed { "Countdown started" } else { "Countdown already running" };
            Ok(Json(ControlResponse::new(true, changed, message)))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /countdown/stop - Stop ticking
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ControlResponse>, StatusCode> {
    match state.stop_countdown() {
        Ok(changed) => {
            info!("Stop endpoint called - countdown stopped");
            let message = if changed { "Countdown stopped" } else { "Countdown was not running" };
            Ok(Json(ControlResponse::new(false, changed, message)))
        }
        Err(e) => {
            error!("Failed to stop countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /settings - Current settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Settings>, StatusCode> {
    state.settings().map(Json).map_err(|e| {
        error!("Failed to read settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /settings - Validate, save and apply the workday form
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(hours): Json<WorkdayHours>,
) -> Result<Json<Settings>, StatusCode> {
    let settings = hours.into_settings().map_err(|e| {
        warn!("Rejected settings update: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    match state.save_settings(settings.clone()) {
        Ok(()) => {
            info!("Settings endpoint called - settings saved and applied");
            Ok(Json(settings))
        }
        Err(e) => {
            error!("{}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /settings/reload - Re-read the settings file
pub async fn reload_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Settings>, StatusCode> {
    state.reload_settings().map(Json).map_err(|e| {
        error!("Failed to reload settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /health - Health check
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
