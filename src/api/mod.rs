//! HTTP API module
//!
//! This module exposes the live countdown and the settings over HTTP.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/countdown", get(countdown_handler))
        .route("/countdown/start", post(start_handler))
        .route("/countdown/stop", post(stop_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/settings/reload", post(reload_settings_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
