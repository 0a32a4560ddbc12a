//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, SettingsUpdate};
use super::responses::{ApiResponse, ConfigResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Start a fresh run
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(timer) => {
            info!("Start endpoint called - timer running in {} phase", timer.phase);
            Ok(Json(ApiResponse::running("Timer started".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Stop the timer
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok(timer) => {
            info!("Stop endpoint called - timer idle");
            Ok(Json(ApiResponse::idle("Timer stopped".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Reset the timer (same as stop)
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(timer) => {
            info!("Reset endpoint called - timer idle");
            Ok(Json(ApiResponse::idle("Timer reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /config - Return configuration and its query string
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> Result<Json<ConfigResponse>, StatusCode> {
    state
        .configuration()
        .map(|config| Json(ConfigResponse::new(config)))
        .map_err(|e| {
            error!("Failed to read configuration: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle PUT /config - Apply a partial settings update
pub async fn put_config_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ConfigResponse>, StatusCode> {
    state
        .configure(&update)
        .map(|config| Json(ConfigResponse::new(config)))
        .map_err(|e| {
            error!("Failed to update configuration: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle POST /config/query - Apply settings from a query string body
pub async fn query_config_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ConfigResponse>, StatusCode> {
    state
        .configure_query(&body)
        .map(|config| Json(ConfigResponse::new(config)))
        .map_err(|e| {
            error!("Failed to apply query settings: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.observe() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to observe timer: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let config = match state.configuration() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to read configuration: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        config,
        wake_lock_held: state.wake_lock_held(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
