//! Error types shared by the engine and its collaborators

use thiserror::Error;

/// Errors raised by the timer engine and the resources it drives
#[derive(Error, Debug)]
pub enum TimerError {
    #[error("Failed to lock {0}: mutex poisoned")]
    LockPoisoned(&'static str),

    #[error("Wake lock unavailable: {0}")]
    WakeLock(String),

    #[error("Audio output unavailable: {0}")]
    Audio(String),

    #[error("Settings store failed: {0}")]
    Store(#[from] std::io::Error),
}

pub type Result<T, E = TimerError> = std::result::Result<T, E>;
