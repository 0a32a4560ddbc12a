//! Audio output collaborators
//!
//! The engine decides when a tone should sound and with what shape; these
//! types turn that request into something audible (or at least visible).

use std::{
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use clap::ValueEnum;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::cues::Tone;
use crate::error::{Result, TimerError};

/// Destination for cue tones. Owned by the engine: opened when a run starts
/// and closed on teardown.
pub trait AudioOutput: Send + Sync {
    /// Acquire the underlying output. Calling it again while open is a no-op.
    fn open(&self) -> Result<()> {
        Ok(())
    }

    /// Emit a tone, honouring its start delay
    fn play(&self, tone: &Tone);

    /// Release the underlying output
    fn close(&self) {}
}

/// Selectable audio backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AudioBackend {
    /// Log each tone
    #[default]
    Log,
    /// Ring the terminal bell for each tone
    Bell,
}

impl AudioBackend {
    pub fn build(self) -> Box<dyn AudioOutput> {
        match self {
            AudioBackend::Log => Box::new(TracingAudio),
            AudioBackend::Bell => Box::new(TerminalBell::new()),
        }
    }
}

/// Headless output that records tones in the log
#[derive(Debug, Default)]
pub struct TracingAudio;

impl AudioOutput for TracingAudio {
    fn play(&self, tone: &Tone) {
        info!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration_ms,
            delay_ms = tone.delay_ms,
            "Cue tone"
        );
    }
}

/// Rings the terminal bell, one ring per tone
#[derive(Debug, Default)]
pub struct TerminalBell {
    open: AtomicBool,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }

    fn ring() {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

impl AudioOutput for TerminalBell {
    fn open(&self) -> Result<()> {
        if self.open.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if !std::io::IsTerminal::is_terminal(&std::io::stdout()) {
            self.open.store(false, Ordering::SeqCst);
            return Err(TimerError::Audio("stdout is not a terminal".to_string()));
        }
        debug!("Terminal bell opened");
        Ok(())
    }

    fn play(&self, tone: &Tone) {
        if !self.open.load(Ordering::SeqCst) {
            debug!("Terminal bell closed, dropping tone: {}", tone);
            return;
        }
        // The bell has no pitch or length, so the shape only reaches the log
        debug!("Ringing terminal bell for tone: {}", tone);
        if tone.delay_ms == 0 {
            Self::ring();
            return;
        }
        let delay = Duration::from_millis(u64::from(tone.delay_ms));
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    sleep(delay).await;
                    TerminalBell::ring();
                });
            }
            Err(_) => {
                warn!("No runtime available for delayed tone, ringing immediately");
                Self::ring();
            }
        }
    }

    fn close(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            debug!("Terminal bell closed");
        }
    }
}
