//! State management module
//!
//! This module contains the timer state machine, its configuration, and the
//! shared engine state that drives it.

pub mod app_state;
pub mod machine;
pub mod session;
pub mod settings;

// Re-export main types
pub use app_state::{AppState, Collaborators};
pub use machine::{TickOutcome, TimerMachine};
pub use session::{Phase, TimerSession, TimerSnapshot};
pub use settings::{SettingsUpdate, TimerConfiguration, MAX_DURATION_SECONDS};
