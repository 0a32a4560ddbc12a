//! Timer configuration and its shareable query-string form

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// Upper bound for both phase durations, in seconds
pub const MAX_DURATION_SECONDS: u32 = 120;

const KEY_COUNTDOWN: &str = "countdown";
const KEY_INTERVAL: &str = "interval";
const KEY_SOUND: &str = "sound";
const KEY_START_WITH: &str = "startWith";

/// Returns true when `seconds` is an acceptable phase duration
pub fn valid_duration(seconds: u32) -> bool {
    seconds <= MAX_DURATION_SECONDS
}

/// User-facing timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    pub countdown_seconds: u32,
    pub interval_seconds: u32,
    pub sound_enabled: bool,
    pub start_with_interval: bool,
}

impl TimerConfiguration {
    /// Build a configuration, falling back to defaults for out-of-range durations
    pub fn new(
        countdown_seconds: u32,
        interval_seconds: u32,
        sound_enabled: bool,
        start_with_interval: bool,
    ) -> Self {
        let mut config = Self::default();
        config.apply(&SettingsUpdate {
            countdown_seconds: Some(countdown_seconds),
            interval_seconds: Some(interval_seconds),
            sound_enabled: Some(sound_enabled),
            start_with_interval: Some(start_with_interval),
        });
        config
    }

    /// Parse settings from a query string, keeping `base` values for anything
    /// missing or invalid
    pub fn from_query(query: &str, base: TimerConfiguration) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut config = base;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                KEY_COUNTDOWN => match parse_duration(&value) {
                    Some(seconds) => config.countdown_seconds = seconds,
                    None => debug!("Ignoring invalid countdown value: {:?}", value),
                },
                KEY_INTERVAL => match parse_duration(&value) {
                    Some(seconds) => config.interval_seconds = seconds,
                    None => debug!("Ignoring invalid interval value: {:?}", value),
                },
                KEY_SOUND => match value.as_ref() {
                    "true" => config.sound_enabled = true,
                    "false" => config.sound_enabled = false,
                    _ => debug!("Ignoring invalid sound value: {:?}", value),
                },
                KEY_START_WITH => match value.as_ref() {
                    "interval" => config.start_with_interval = true,
                    "countdown" => config.start_with_interval = false,
                    _ => debug!("Ignoring invalid startWith value: {:?}", value),
                },
                _ => {}
            }
        }

        config
    }

    /// Serialize to the query-string form
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(KEY_COUNTDOWN, &self.countdown_seconds.to_string())
            .append_pair(KEY_INTERVAL, &self.interval_seconds.to_string())
            .append_pair(KEY_SOUND, if self.sound_enabled { "true" } else { "false" })
            .append_pair(
                KEY_START_WITH,
                if self.start_with_interval { "interval" } else { "countdown" },
            )
            .finish()
    }

    /// Apply a partial update. Returns the set of fields that changed.
    pub fn apply(&mut self, update: &SettingsUpdate) -> ChangedFields {
        let mut changed = ChangedFields::default();

        if let Some(seconds) = update.countdown_seconds {
            if valid_duration(seconds) {
                changed.countdown = seconds != self.countdown_seconds;
                self.countdown_seconds = seconds;
            }
        }
        if let Some(seconds) = update.interval_seconds {
            if valid_duration(seconds) {
                changed.interval = seconds != self.interval_seconds;
                self.interval_seconds = seconds;
            }
        }
        if let Some(enabled) = update.sound_enabled {
            changed.sound = enabled != self.sound_enabled;
            self.sound_enabled = enabled;
        }
        if let Some(interval_first) = update.start_with_interval {
            changed.start_with = interval_first != self.start_with_interval;
            self.start_with_interval = interval_first;
        }

        changed
    }
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            countdown_seconds: 30,
            interval_seconds: 10,
            sound_enabled: true,
            start_with_interval: false,
        }
    }
}

fn parse_duration(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|seconds| valid_duration(*seconds))
}

/// Partial settings change, as sent by callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub countdown_seconds: Option<u32>,
    #[serde(default)]
    pub interval_seconds: Option<u32>,
    #[serde(default)]
    pub sound_enabled: Option<bool>,
    #[serde(default)]
    pub start_with_interval: Option<bool>,
}

impl From<TimerConfiguration> for SettingsUpdate {
    fn from(config: TimerConfiguration) -> Self {
        Self {
            countdown_seconds: Some(config.countdown_seconds),
            interval_seconds: Some(config.interval_seconds),
            sound_enabled: Some(config.sound_enabled),
            start_with_interval: Some(config.start_with_interval),
        }
    }
}

/// Which settings were actually modified by an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangedFields {
    pub countdown: bool,
    pub interval: bool,
    pub sound: bool,
    pub start_with: bool,
}

impl ChangedFields {
    pub fn any(&self) -> bool {
        self.countdown || self.interval || self.sound || self.start_with
    }
}
