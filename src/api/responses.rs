//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TimerConfiguration, TimerSnapshot};

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a running response
    pub fn running(message: String, timer: TimerSnapshot) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Create an idle response
    pub fn idle(message: String, timer: TimerSnapshot) -> Self {
        Self::new("idle".to_string(), message, timer)
    }
}

/// Current configuration along with its shareable query string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub config: TimerConfiguration,
    pub query: String,
}

impl ConfigResponse {
    pub fn new(config: TimerConfiguration) -> Self {
        Self {
            query: config.to_query(),
            config,
        }
    }
}

/// Status response with timer, configuration and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub config: TimerConfiguration,
    pub wake_lock_held: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
