//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

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
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/reset", post(reset_handler))
        .route("/config", get(get_config_handler).put(put_config_handler))
        .route("/config/query", post(query_config_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
