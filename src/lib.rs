//! Interval Chime - a countdown/interval timer engine
//! 
//! This library provides a timer that alternates between a countdown phase
//! and an interval phase, plays audio cues on phase edges, holds a wake lock
//! while running, and keeps its settings in a shareable query string.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, Collaborators, Phase, TimerConfiguration, TimerMachine, TimerSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
