//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::services::{AudioBackend, CueSet};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "interval-chime")]
#[command(about = "A countdown/interval timer with audio cues and wake-lock control")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial settings as a query string, e.g. "countdown=30&interval=10&sound=true"
    #[arg(short, long)]
    pub settings: Option<String>,

    /// File the settings query string is read from and written back to
    #[arg(long)]
    pub settings_file: Option<PathBuf>,

    /// Cue set to play
    #[arg(long, value_enum, default_value_t = CueSet::Descending)]
    pub cues: CueSet,

    /// Where cue tones go
    #[arg(long, value_enum, default_value_t = AudioBackend::Log)]
    pub audio: AudioBackend,

    /// Do not inhibit idle/sleep while the timer runs
    #[arg(long)]
    pub no_wake_lock: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_and_descending() {
        let config = Config::try_parse_from(["interval-chime"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.cues, CueSet::Descending);
        assert_eq!(config.audio, AudioBackend::Log);
        assert!(!config.no_wake_lock);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn parses_settings_and_cue_options() {
        let config = Config::try_parse_from([
            "interval-chime",
            "--settings",
            "countdown=12&interval=45",
            "--cues",
            "simple",
            "--audio",
            "bell",
            "--no-wake-lock",
            "-v",
        ])
        .unwrap();

        assert_eq!(config.settings.as_deref(), Some("countdown=12&interval=45"));
        assert_eq!(config.cues, CueSet::Simple);
        assert_eq!(config.audio, AudioBackend::Bell);
        assert!(config.no_wake_lock);
        assert_eq!(config.log_level(), "debug");
    }
}
