//! Timer session structure and the snapshot handed to observers

use serde::{Deserialize, Serialize};

/// Phase of the interval timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Countdown,
    Interval,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Countdown => "countdown",
            Phase::Interval => "interval",
        };
        f.write_str(name)
    }
}

/// Run state for a single timer session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSession {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub is_running: bool,
}

impl TimerSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            is_running: false,
        }
    }

    /// Create a running session in the given phase
    pub fn running(phase: Phase, remaining_seconds: u32) -> Self {
        Self {
            phase,
            remaining_seconds,
            is_running: true,
        }
    }

    /// Percentage of the current phase still remaining.
    ///
    /// Idle sessions and zero-length phases report 100.
    pub fn progress_percent(&self, phase_duration: u32) -> f64 {
        if self.phase == Phase::Idle || phase_duration == 0 {
            return 100.0;
        }
        let percent = f64::from(self.remaining_seconds) / f64::from(phase_duration) * 100.0;
        percent.clamp(0.0, 100.0)
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What observers see of the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub progress_percent: f64,
}

impl TimerSnapshot {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            is_running: false,
            progress_percent: 100.0,
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
