//! Audio cue catalog and the policies that pick cues for timer events

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single tone request for the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    /// Start delay relative to the tick that produced the tone
    pub delay_ms: u32,
}

impl Tone {
    pub const fn new(frequency_hz: u32, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            delay_ms: 0,
        }
    }

    pub const fn delayed(self, delay_ms: u32) -> Self {
        Self { delay_ms, ..self }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz for {} ms", self.frequency_hz, self.duration_ms)?;
        if self.delay_ms > 0 {
            write!(f, " after {} ms", self.delay_ms)?;
        }
        Ok(())
    }
}

pub const WARNING_TONE: Tone = Tone::new(1000, 100);
pub const COUNTDOWN_FINISHED_TONE: Tone = Tone::new(800, 300);
pub const INTERVAL_FINISHED_TONE: Tone = Tone::new(600, 300);
/// Gap between the two pulses of the double interval-finished cue
pub const DOUBLE_PULSE_GAP_MS: u32 = 200;

/// Remaining-second values that trigger a warning cue
pub const WARNING_SECONDS: [u32; 3] = [3, 2, 1];

/// Timer events that may be accompanied by a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueTrigger {
    /// The running phase just reached this many remaining seconds
    Warning(u32),
    /// Countdown expired, interval begins
    CountdownFinished,
    /// Interval expired, countdown begins
    IntervalFinished,
}

/// Picks the tones for a timer event
pub trait CuePolicy: Send + Sync + std::fmt::Debug {
    fn cues_for(&self, trigger: CueTrigger) -> Vec<Tone>;
}

/// Built-in cue sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueSet {
    /// Single pulses on phase changes only
    Simple,
    /// 3-2-1 warning beeps and a double pulse when the interval ends
    #[default]
    Descending,
}

impl CuePolicy for CueSet {
    fn cues_for(&self, trigger: CueTrigger) -> Vec<Tone> {
        match (self, trigger) {
            (CueSet::Simple, CueTrigger::Warning(_)) => Vec::new(),
            (CueSet::Descending, CueTrigger::Warning(second)) => {
                if WARNING_SECONDS.contains(&second) {
                    vec![WARNING_TONE]
                } else {
                    Vec::new()
                }
            }
            (_, CueTrigger::CountdownFinished) => vec![COUNTDOWN_FINISHED_TONE],
            (CueSet::Simple, CueTrigger::IntervalFinished) => vec![INTERVAL_FINISHED_TONE],
            (CueSet::Descending, CueTrigger::IntervalFinished) => vec![
                INTERVAL_FINISHED_TONE,
                INTERVAL_FINISHED_TONE.delayed(DOUBLE_PULSE_GAP_MS),
            ],
        }
    }
}
